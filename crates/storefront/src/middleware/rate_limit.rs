//! Rate limiting middleware using governor and `tower_governor`.
//!
//! Provides rate limiters keyed by client IP:
//! - `default_rate_limiter`: every page and API route (~50/hour)
//! - `search_page_rate_limiter`: full search (~10/min)
//! - `search_ajax_rate_limiter`: as-you-type search (~15/min)
//! - `auth_rate_limiter`: sign-in start and callback (~10/min)
//! - `history_rate_limiter`: recording product views (~30/min)
//!
//! Rejections are JSON: `{"error": "Rate limit exceeded. Please try again later."}`.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::Json;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use serde_json::json;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

// =============================================================================
// Client IP Key Extractor
// =============================================================================

/// Key extractor that prefers proxy headers, then the socket peer address.
///
/// Requests with no usable address share a single bucket keyed on the
/// unspecified address.
#[derive(Clone, Copy)]
pub struct ClientIpKeyExtractor;

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        let headers = req.headers();

        // Try X-Forwarded-For (first IP in the chain)
        if let Some(ip) = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
        {
            return Ok(ip);
        }

        // Try X-Real-IP
        if let Some(ip) = headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
        {
            return Ok(ip);
        }

        // Socket peer, when served with connect info
        if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
            return Ok(addr.ip());
        }

        Ok(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
    }
}

// =============================================================================
// Rate Limiter Configuration
// =============================================================================

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Body of every 429 response.
pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Please try again later.";

/// Render a limiter rejection as JSON, keeping the status and the
/// `retry-after`/`x-ratelimit-*` headers governor attaches.
fn rate_limited_response(error: GovernorError) -> Response {
    let (parts, _) = error.into_response().into_parts();
    let message = if parts.status == StatusCode::TOO_MANY_REQUESTS {
        RATE_LIMIT_MESSAGE
    } else {
        tracing::error!("Rate limiter failed: {}", parts.status);
        "Server error"
    };

    let mut response = (parts.status, Json(json!({ "error": message }))).into_response();
    response.headers_mut().extend(parts.headers);
    response
}

/// Build a limiter that replenishes one request every `period_ms` and allows
/// bursts of `burst`.
fn rate_limiter(period_ms: u64, burst: u32) -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor)
        .per_millisecond(period_ms)
        .burst_size(burst)
        .finish()
        .expect("rate limiter config with non-zero period and burst is valid");
    GovernorLayer::new(Arc::new(config)).error_handler(rate_limited_response)
}

/// App-wide limit: bursts of 50, refilled at ~50 requests per hour per IP.
///
/// # Panics
///
/// This function will not panic; the period and burst are non-zero constants.
#[must_use]
pub fn default_rate_limiter() -> RateLimiterLayer {
    rate_limiter(72_000, 50)
}

/// Full search page: ~10 requests per minute per IP.
///
/// # Panics
///
/// This function will not panic; the period and burst are non-zero constants.
#[must_use]
pub fn search_page_rate_limiter() -> RateLimiterLayer {
    rate_limiter(6_000, 10)
}

/// As-you-type search endpoint: ~15 requests per minute per IP.
///
/// # Panics
///
/// This function will not panic; the period and burst are non-zero constants.
#[must_use]
pub fn search_ajax_rate_limiter() -> RateLimiterLayer {
    rate_limiter(4_000, 15)
}

/// Sign-in start and OAuth callback: ~10 requests per minute per IP.
///
/// # Panics
///
/// This function will not panic; the period and burst are non-zero constants.
#[must_use]
pub fn auth_rate_limiter() -> RateLimiterLayer {
    rate_limiter(6_000, 5)
}

/// Record-view endpoint: ~30 requests per minute per IP.
///
/// # Panics
///
/// This function will not panic; the period and burst are non-zero constants.
#[must_use]
pub fn history_rate_limiter() -> RateLimiterLayer {
    rate_limiter(2_000, 30)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{Router, body::Body, routing::get};
    use tower::ServiceExt;
    use tower_governor::key_extractor::KeyExtractor;

    use super::*;

    fn request(headers: &[(&str, &str)]) -> Request<()> {
        let mut builder = Request::builder().uri("/search");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).expect("valid request")
    }

    #[test]
    fn test_forwarded_for_takes_first_hop() {
        let req = request(&[("x-forwarded-for", "203.0.113.7, 10.0.0.1")]);
        let ip = ClientIpKeyExtractor.extract(&req).expect("key");
        assert_eq!(ip, "203.0.113.7".parse::<IpAddr>().expect("ip"));
    }

    #[test]
    fn test_real_ip_fallback() {
        let req = request(&[("x-real-ip", "198.51.100.2")]);
        let ip = ClientIpKeyExtractor.extract(&req).expect("key");
        assert_eq!(ip, "198.51.100.2".parse::<IpAddr>().expect("ip"));
    }

    #[test]
    fn test_connect_info_fallback() {
        let mut req = request(&[]);
        let peer: SocketAddr = "192.0.2.9:4444".parse().expect("addr");
        req.extensions_mut().insert(ConnectInfo(peer));
        let ip = ClientIpKeyExtractor.extract(&req).expect("key");
        assert_eq!(ip, peer.ip());
    }

    #[test]
    fn test_unknown_client_shares_bucket() {
        let ip = ClientIpKeyExtractor.extract(&request(&[])).expect("key");
        assert_eq!(ip, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    }

    async fn get_with_ip(app: Router, ip: &str) -> Response {
        app.oneshot(
            Request::builder()
                .uri("/")
                .header("x-real-ip", ip)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_rejection_is_json() {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(rate_limiter(60_000, 1));

        let first = get_with_ip(app.clone(), "203.0.113.1").await;
        assert_eq!(first.status(), StatusCode::OK);

        let second = get_with_ip(app.clone(), "203.0.113.1").await;
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(second.headers().get("retry-after").is_some());
        assert_eq!(
            second.headers().get("content-type").unwrap(),
            "application/json"
        );
        let bytes = axum::body::to_bytes(second.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "error": RATE_LIMIT_MESSAGE }));

        // Other clients keep their own bucket
        let other = get_with_ip(app, "203.0.113.2").await;
        assert_eq!(other.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_default_limit_allows_burst_of_fifty() {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(default_rate_limiter());

        for _ in 0..50 {
            let response = get_with_ip(app.clone(), "198.51.100.7").await;
            assert_eq!(response.status(), StatusCode::OK);
        }
        let response = get_with_ip(app, "198.51.100.7").await;
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
