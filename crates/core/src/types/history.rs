//! Bounded most-recently-viewed product history.
//!
//! The history lives in the user's session and is never persisted anywhere
//! else. It resets when the session ends.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// Maximum number of product IDs kept per session.
pub const HISTORY_LIMIT: usize = 30;

/// Product IDs a user has viewed, most recent first.
///
/// IDs are unique and the list never grows beyond [`HISTORY_LIMIT`]. Every
/// mutation sets a dirty flag so the session carrier knows to write the
/// history back; the flag itself is not serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ProductId>", into = "Vec<ProductId>")]
pub struct ViewHistory {
    entries: VecDeque<ProductId>,
    dirty: bool,
}

impl ViewHistory {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move `id` to the front, dropping any older occurrence and evicting
    /// the oldest entries beyond [`HISTORY_LIMIT`].
    ///
    /// Callers are expected to have checked that `id` names a real product;
    /// see [`Catalog::record_view`](crate::Catalog::record_view).
    pub fn record(&mut self, id: ProductId) {
        if let Some(index) = self.entries.iter().position(|entry| entry == &id) {
            self.entries.remove(index);
        }
        self.entries.push_front(id);
        self.entries.truncate(HISTORY_LIMIT);
        self.dirty = true;
    }

    /// Iterate over the stored IDs, most recent first.
    pub fn ids(&self) -> impl Iterator<Item = &ProductId> {
        self.entries.iter()
    }

    /// Position of `id` in the history (0 is most recent).
    #[must_use]
    pub fn position(&self, id: &ProductId) -> Option<usize> {
        self.entries.iter().position(|entry| entry == id)
    }

    /// Number of stored IDs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if the history changed since it was loaded or last
    /// marked clean.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag after the history has been written back.
    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }
}

impl From<Vec<ProductId>> for ViewHistory {
    /// Rebuild a history from stored IDs, dropping repeats and anything past
    /// the limit. The result starts clean.
    fn from(ids: Vec<ProductId>) -> Self {
        let mut entries: VecDeque<ProductId> = VecDeque::with_capacity(ids.len().min(HISTORY_LIMIT));
        for id in ids {
            if entries.len() == HISTORY_LIMIT {
                break;
            }
            if !entries.contains(&id) {
                entries.push_back(id);
            }
        }
        Self {
            entries,
            dirty: false,
        }
    }
}

impl From<ViewHistory> for Vec<ProductId> {
    fn from(history: ViewHistory) -> Self {
        history.entries.into()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ids(history: &ViewHistory) -> Vec<&str> {
        history.ids().map(ProductId::as_str).collect()
    }

    #[test]
    fn test_record_puts_newest_first() {
        let mut history = ViewHistory::new();
        history.record("a".into());
        history.record("b".into());
        assert_eq!(ids(&history), vec!["b", "a"]);
    }

    #[test]
    fn test_record_moves_existing_to_front() {
        let mut history = ViewHistory::new();
        history.record("b".into());
        history.record("a".into());
        history.record("b".into());
        assert_eq!(ids(&history), vec!["b", "a"]);
    }

    #[test]
    fn test_record_twice_keeps_single_entry() {
        let mut history = ViewHistory::new();
        history.record("a".into());
        history.record("a".into());
        assert_eq!(ids(&history), vec!["a"]);
    }

    #[test]
    fn test_limit_evicts_least_recent() {
        let mut history = ViewHistory::new();
        for i in 0..=HISTORY_LIMIT {
            history.record(ProductId::new(format!("p{i}")));
        }
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history.position(&ProductId::new("p0")), None);
        assert_eq!(
            history.position(&ProductId::new(format!("p{HISTORY_LIMIT}"))),
            Some(0)
        );
        assert_eq!(history.position(&ProductId::new("p1")), Some(HISTORY_LIMIT - 1));
    }

    #[test]
    fn test_dirty_flag() {
        let mut history = ViewHistory::new();
        assert!(!history.is_dirty());
        history.record("a".into());
        assert!(history.is_dirty());
        history.mark_clean();
        assert!(!history.is_dirty());
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let mut history = ViewHistory::new();
        history.record("a".into());
        history.record("b".into());
        assert_eq!(serde_json::to_string(&history).unwrap(), r#"["b","a"]"#);
    }

    #[test]
    fn test_deserialize_normalizes_and_starts_clean() {
        let mut stored: Vec<String> = vec!["x".to_string(), "y".to_string(), "x".to_string()];
        stored.extend((0..40).map(|i| format!("q{i}")));
        let json = serde_json::to_string(&stored).unwrap();

        let history: ViewHistory = serde_json::from_str(&json).unwrap();
        assert!(!history.is_dirty());
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(ids(&history)[..3], ["x", "y", "q0"]);
    }
}
