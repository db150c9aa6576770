//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Trending products
//! GET  /health                 - Liveness check
//!
//! # Catalog
//! GET  /search?query=          - Full search (empty query redirects home)
//! GET  /search-ajax?query=     - As-you-type search
//! GET  /product/{product_id}   - Product detail
//!
//! # Auth
//! GET  /login                  - Redirect to Google sign-in
//! GET  /login/authorized       - OAuth callback
//! GET  /logout                 - Clear the session
//!
//! # Account (requires auth)
//! GET  /profile                - Signed-in identity
//! GET  /history                - Viewed products, most recent first
//!
//! # API
//! POST /api/add-to-history     - Record a product view (requires auth)
//! GET  /api/health             - Health report
//! ```

pub mod account;
pub mod api;
pub mod auth;
pub mod home;
pub mod products;
pub mod search;

use axum::{
    Json, Router,
    body::Body,
    http::{Request, StatusCode},
    middleware::from_fn,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::middleware::{
    self, auth_rate_limiter, default_rate_limiter, history_rate_limiter, request_id_middleware,
    search_ajax_rate_limiter, search_page_rate_limiter, security_headers_middleware,
    session::SessionKeyError,
};
use crate::state::AppState;

/// Create the search routes router (rate limited per endpoint).
pub fn search_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/search",
            get(search::search_page).layer(search_page_rate_limiter()),
        )
        .route(
            "/search-ajax",
            get(search::search_ajax).layer(search_ajax_rate_limiter()),
        )
}

/// Create the sign-in routes router (sign-in start and callback share a limit).
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login))
        .route("/login/authorized", get(auth::authorized))
        .route_layer(auth_rate_limiter())
        .route("/logout", get(auth::logout))
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/add-to-history",
            post(api::history::add_to_history).layer(history_rate_limiter()),
        )
        .route("/health", get(api::health::health))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/product/{product_id}", get(products::show))
        .route("/profile", get(account::profile))
        .route("/history", get(account::history))
        .merge(search_routes())
        .merge(auth_routes())
        .nest("/api", api_routes())
}

/// Build the full application: routes, sessions and the middleware stack.
///
/// Every route except the liveness check sits behind the app-wide limit.
/// Sentry layers are added by the binary so tests can run without them.
///
/// # Errors
///
/// Returns an error if the session secret cannot be used as a signing key.
pub fn app(state: AppState) -> Result<Router, SessionKeyError> {
    let session_layer =
        middleware::create_session_layer(middleware::create_session_store(), state.config())?;

    Ok(Router::new()
        .route("/health", get(health))
        .merge(routes().layer(default_rate_limiter()))
        .fallback(not_found)
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
async fn health() -> &'static str {
    "ok"
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Not found" })),
    )
}
