//! Session-related types.
//!
//! Handlers never poke at the raw `tower_sessions::Session` for user data.
//! They load a [`UserSession`], pass it by reference into catalog operations,
//! and call [`UserSession::save`], which writes back only what changed.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;
use verovista_core::{Identity, ViewHistory};

use crate::error::AppError;

/// Session keys.
pub mod keys {
    /// Key for the logged-in user's identity.
    pub const USER: &str = "user";

    /// Key for the viewed-product history.
    pub const HISTORY: &str = "history";

    /// Key for OAuth state (CSRF protection).
    pub const OAUTH_STATE: &str = "oauth_state";

    /// Key for OAuth nonce (`OpenID` Connect replay protection).
    pub const OAUTH_NONCE: &str = "oauth_nonce";
}

/// Per-request view of the user's session state.
///
/// Loaded once per request. Mutations stay in memory until [`Self::save`].
#[derive(Debug, Clone)]
pub struct UserSession {
    session: Session,
    user: Option<Identity>,
    history: ViewHistory,
}

impl UserSession {
    /// Load the user and history from the session store.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read or holds data of
    /// the wrong shape.
    pub async fn load(session: Session) -> Result<Self, tower_sessions::session::Error> {
        let user = session.get::<Identity>(keys::USER).await?;
        let history = session
            .get::<ViewHistory>(keys::HISTORY)
            .await?
            .unwrap_or_default();

        Ok(Self {
            session,
            user,
            history,
        })
    }

    /// The logged-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&Identity> {
        self.user.as_ref()
    }

    /// The viewed-product history.
    #[must_use]
    pub const fn history(&self) -> &ViewHistory {
        &self.history
    }

    /// Mutable access to the history for catalog operations.
    pub const fn history_mut(&mut self) -> &mut ViewHistory {
        &mut self.history
    }

    /// Store a freshly authenticated identity.
    ///
    /// Rotates the session ID to prevent fixation and makes sure a history
    /// entry exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn login(&mut self, identity: Identity) -> Result<(), tower_sessions::session::Error> {
        self.session.cycle_id().await?;
        self.session.insert(keys::USER, &identity).await?;
        if self
            .session
            .get::<ViewHistory>(keys::HISTORY)
            .await?
            .is_none()
        {
            self.session.insert(keys::HISTORY, &self.history).await?;
        }
        self.user = Some(identity);
        Ok(())
    }

    /// Write the history back if it changed.
    ///
    /// Returns `true` if anything was written. Concurrent requests on the same
    /// session each write their own copy; the last write wins.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn save(&mut self) -> Result<bool, tower_sessions::session::Error> {
        if !self.history.is_dirty() {
            return Ok(false);
        }
        self.session.insert(keys::HISTORY, &self.history).await?;
        self.history.mark_clean();
        Ok(true)
    }

    /// Drop everything in the session (logout).
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot delete the session.
    pub async fn clear(&mut self) -> Result<(), tower_sessions::session::Error> {
        self.session.flush().await?;
        self.user = None;
        self.history = ViewHistory::new();
        Ok(())
    }
}

impl<S> FromRequestParts<S> for UserSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        Ok(Self::load(session).await?)
    }
}
