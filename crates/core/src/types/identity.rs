//! Authenticated identity held in the session.

use serde::{Deserialize, Serialize};

/// Session-stored identity of the logged-in user.
///
/// Copied from the identity provider's ID-token claims. Every field is
/// untrusted display data: nothing here is used for search or history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// User's email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Full display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Given (first) name.
    #[serde(default)]
    pub given_name: Option<String>,
    /// Avatar URL.
    #[serde(default)]
    pub picture: Option<String>,
    /// Whether the provider has verified the email address.
    #[serde(default)]
    pub email_verified: bool,
}

impl Identity {
    /// Name to greet the user with, falling back to `"User"`.
    #[must_use]
    pub fn greeting_name(&self) -> &str {
        self.given_name
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("User")
    }
}
