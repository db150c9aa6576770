//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (CSP, frame options, etc.)
//! 5. Session layer (tower-sessions, moka store, signed cookie)
//! 6. App-wide rate limit (governor, all routes but `/health`)
//! 7. Per-route rate limits (search, sign-in, history)

pub mod auth;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{Authorization, OptionalAuth, RequireAuth, authorize};
pub use rate_limit::{
    auth_rate_limiter, default_rate_limiter, history_rate_limiter, search_ajax_rate_limiter,
    search_page_rate_limiter,
};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::{SESSION_COOKIE_NAME, create_session_layer, create_session_store};
