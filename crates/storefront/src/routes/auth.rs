//! Google sign-in route handlers.
//!
//! - Login: stores a CSRF state and `OpenID` nonce, then redirects to Google
//! - Callback: checks the state, exchanges the code and stores the identity
//! - Logout: drops the whole session
//!
//! Failures never surface as error pages; the user is sent home with an
//! `error` code in the query string.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use rand::Rng;
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::models::{UserSession, session_keys};
use crate::state::AppState;

/// Length of generated state and nonce values.
const OAUTH_TOKEN_LENGTH: usize = 32;

/// Query parameters from the OAuth callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code to exchange for tokens.
    pub code: Option<String>,
    /// State parameter for CSRF protection.
    pub state: Option<String>,
    /// Error code if authorization failed.
    pub error: Option<String>,
    /// Error description.
    pub error_description: Option<String>,
}

/// Generate a cryptographically secure random string.
fn generate_random_string(length: usize) -> String {
    rand::rng()
        .sample_iter(rand::distr::Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

fn redirect_home_with_error(code: &str) -> Response {
    Redirect::to(&format!("/?error={code}")).into_response()
}

fn callback_uri(state: &AppState) -> String {
    format!("{}/login/authorized", state.config().base_url)
}

/// Start Google sign-in.
///
/// # Route
///
/// `GET /login`
pub async fn login(State(state): State<AppState>, session: Session) -> Response {
    let Some(identity) = state.identity() else {
        tracing::info!("Login requested but Google sign-in is not configured");
        return redirect_home_with_error("login_disabled");
    };

    let oauth_state = generate_random_string(OAUTH_TOKEN_LENGTH);
    let nonce = generate_random_string(OAUTH_TOKEN_LENGTH);

    if let Err(e) = session.insert(session_keys::OAUTH_STATE, &oauth_state).await {
        tracing::error!("Failed to store OAuth state in session: {}", e);
        return redirect_home_with_error("session");
    }
    if let Err(e) = session.insert(session_keys::OAUTH_NONCE, &nonce).await {
        tracing::error!("Failed to store OAuth nonce in session: {}", e);
        return redirect_home_with_error("session");
    }

    let auth_url = identity.authorization_url(&callback_uri(&state), &oauth_state, &nonce);
    Redirect::to(&auth_url).into_response()
}

/// Handle the OAuth callback.
///
/// # Route
///
/// `GET /login/authorized`
pub async fn authorized(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let Some(identity_client) = state.identity() else {
        return redirect_home_with_error("login_disabled");
    };

    if let Some(error) = query.error {
        let description = query.error_description.unwrap_or_default();
        tracing::warn!("OAuth error from provider: {} - {}", error, description);
        return redirect_home_with_error("access_denied");
    }

    let Some(code) = query.code else {
        tracing::warn!("OAuth callback missing code");
        return redirect_home_with_error("missing_code");
    };

    let stored_state: Option<String> = session
        .remove(session_keys::OAUTH_STATE)
        .await
        .ok()
        .flatten();
    let stored_nonce: Option<String> = session
        .remove(session_keys::OAUTH_NONCE)
        .await
        .ok()
        .flatten();

    if query.state.is_none() || stored_state != query.state {
        tracing::warn!("OAuth state mismatch");
        return redirect_home_with_error("invalid_state");
    }
    let Some(nonce) = stored_nonce else {
        tracing::warn!("OAuth nonce missing from session");
        return redirect_home_with_error("invalid_state");
    };

    let identity = match identity_client
        .exchange_code(&code, &callback_uri(&state), &nonce)
        .await
    {
        Ok(identity) => identity,
        Err(e) => {
            tracing::error!("Failed to complete Google sign-in: {}", e);
            return redirect_home_with_error("auth_failed");
        }
    };

    let mut user_session = match UserSession::load(session).await {
        Ok(user_session) => user_session,
        Err(e) => {
            tracing::error!("Failed to load session after sign-in: {}", e);
            return redirect_home_with_error("session");
        }
    };

    let email = identity.email.clone();
    if let Err(e) = user_session.login(identity).await {
        tracing::error!("Failed to store identity in session: {}", e);
        return redirect_home_with_error("session");
    }

    set_sentry_user(email.as_deref());
    add_breadcrumb("auth", "User signed in", None);
    tracing::info!("User signed in");

    Redirect::to("/profile").into_response()
}

/// Log out and clear the session.
///
/// # Route
///
/// `GET /logout`
pub async fn logout(mut user_session: UserSession) -> Response {
    if let Err(e) = user_session.clear().await {
        tracing::error!("Failed to clear session on logout: {}", e);
    }
    clear_sentry_user();

    Redirect::to("/").into_response()
}
