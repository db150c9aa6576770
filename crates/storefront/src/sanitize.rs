//! Input sanitization for user-supplied text.
//!
//! Every piece of free text that reaches search or the session (queries,
//! product IDs) passes through [`sanitize_input`] first.

use std::sync::LazyLock;

use regex::Regex;

/// `<script>` and `<style>` elements including their content. An unclosed
/// element swallows the rest of the input.
static EXECUTABLE_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style)\b[^>]*>.*?(?:</(?:script|style)\s*>|\z)")
        .expect("Invalid regex")
});

/// HTML comments, closed or not.
static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?(?:-->|\z)").expect("Invalid regex"));

/// Any remaining opening or closing tag.
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[A-Za-z!][^>]*>").expect("Invalid regex"));

/// Strip markup from user input and trim surrounding whitespace.
///
/// Script and style blocks are removed together with their content; other
/// tags are removed but their text is kept.
///
/// # Example
///
/// ```rust
/// use verovista_storefront::sanitize::sanitize_input;
///
/// assert_eq!(sanitize_input("  <b>red</b> shoe "), "red shoe");
/// assert_eq!(sanitize_input("<script>alert(1)</script>hat"), "hat");
/// ```
#[must_use]
pub fn sanitize_input(text: &str) -> String {
    let without_blocks = EXECUTABLE_BLOCK_RE.replace_all(text, "");
    let without_comments = COMMENT_RE.replace_all(&without_blocks, "");
    let without_tags = TAG_RE.replace_all(&without_comments, "");
    without_tags.trim().to_string()
}
