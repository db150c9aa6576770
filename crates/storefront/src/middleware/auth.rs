//! Authentication guard and extractors.
//!
//! Whether a request may proceed is decided by [`authorize`], a plain
//! function over the session's identity. [`RequireAuth`] composes it into an
//! extractor so routes opt in by naming it in their signature.

use axum::{
    Json,
    extract::{FromRequestParts, OriginalUri},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;
use verovista_core::Identity;

use crate::error::AppError;
use crate::models::UserSession;

/// Outcome of checking a session for a logged-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    /// A user is logged in.
    Authenticated(Identity),
    /// Nobody is logged in.
    Anonymous,
}

/// Decide whether the session belongs to a logged-in user.
#[must_use]
pub fn authorize(user: Option<&Identity>) -> Authorization {
    user.cloned()
        .map_or(Authorization::Anonymous, Authorization::Authenticated)
}

/// Extractor that requires a logged-in user.
///
/// Gives the handler the identity together with the loaded session so
/// history operations can run against it.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(auth: RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", auth.identity.greeting_name())
/// }
/// ```
pub struct RequireAuth {
    pub identity: Identity,
    pub session: UserSession,
}

/// Error returned when authentication is required but nobody is logged in.
pub enum AuthRejection {
    /// Redirect to login (for page requests).
    RedirectToLogin,
    /// JSON 401 response (for API requests).
    Unauthorized,
    /// The session could not be loaded.
    Session(AppError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Please log in to access this page." })),
            )
                .into_response(),
            Self::Session(err) => err.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = UserSession::from_request_parts(parts, state)
            .await
            .map_err(AuthRejection::Session)?;

        match authorize(session.user()) {
            Authorization::Authenticated(identity) => Ok(Self { identity, session }),
            Authorization::Anonymous => {
                let path = parts
                    .extensions
                    .get::<OriginalUri>()
                    .map_or_else(|| parts.uri.path(), |uri| uri.0.path());
                if path.starts_with("/api/") {
                    Err(AuthRejection::Unauthorized)
                } else {
                    Err(AuthRejection::RedirectToLogin)
                }
            }
        }
    }
}

/// Extractor that optionally gets the logged-in user.
///
/// Unlike `RequireAuth`, this does not reject anonymous requests.
pub struct OptionalAuth(pub Option<Identity>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = UserSession::from_request_parts(parts, state).await?;
        Ok(Self(session.user().cloned()))
    }
}
