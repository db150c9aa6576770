//! Session middleware configuration.
//!
//! Sessions live in a moka cache behind a signed cookie. Each entry is
//! evicted once its record's expiry date passes, and the cache is capped, so
//! abandoned sessions (every anonymous `/login` creates one) do not pile up.
//! Nothing survives a restart.

use secrecy::ExposeSecret;
use thiserror::Error;
use tower_sessions::cookie::Key;
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_moka_store::MokaStore;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "vv_session";

/// Session expiry time in seconds (1 hour of inactivity).
pub const SESSION_EXPIRY_SECONDS: i64 = 60 * 60;

/// Most sessions held at once; the least recently used go first.
pub const MAX_SESSIONS: u64 = 100_000;

/// The session secret cannot be used as a cookie signing key.
#[derive(Debug, Error)]
#[error("invalid session signing key: {0}")]
pub struct SessionKeyError(String);

/// Create the in-memory session store.
#[must_use]
pub fn create_session_store() -> MokaStore {
    MokaStore::new(Some(MAX_SESSIONS))
}

/// Create the session layer over `store`.
///
/// # Errors
///
/// Returns an error if the configured session secret is too short to sign
/// cookies with.
pub fn create_session_layer(
    store: MokaStore,
    config: &StorefrontConfig,
) -> Result<SessionManagerLayer<MokaStore, SignedCookie>, SessionKeyError> {
    let key = Key::try_from(config.session_secret.expose_secret().as_bytes())
        .map_err(|e| SessionKeyError(e.to_string()))?;

    Ok(SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key))
}
