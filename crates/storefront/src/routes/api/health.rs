//! Health report.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::AppState;

/// Health report body.
#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub products_loaded: usize,
    pub google_auth: bool,
}

/// Report service status, catalog size and whether sign-in is configured.
///
/// # Route
///
/// `GET /api/health`
pub async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "healthy",
        timestamp: Utc::now(),
        products_loaded: state.catalog().len(),
        google_auth: state.config().login_enabled(),
    })
}
