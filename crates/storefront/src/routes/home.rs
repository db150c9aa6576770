//! Home page route handler.

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use verovista_core::Identity;

use crate::middleware::OptionalAuth;
use crate::routes::products::{ProductView, views};
use crate::sanitize::sanitize_input;
use crate::state::AppState;

/// Query parameters accepted by the home page.
#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    /// Error code set by a failed login redirect.
    pub error: Option<String>,
}

/// Home page body.
#[derive(Debug, Serialize)]
pub struct HomePage<'a> {
    pub trending_products: Vec<ProductView<'a>>,
    pub user: Option<Identity>,
    pub login_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Home page with trending products.
///
/// # Route
///
/// `GET /`
#[instrument(skip(state, user))]
pub async fn home(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<HomeQuery>,
) -> Response {
    Json(HomePage {
        trending_products: views(state.catalog().trending()),
        user,
        login_enabled: state.config().login_enabled(),
        error: query
            .error
            .as_deref()
            .map(sanitize_input)
            .filter(|e| !e.is_empty()),
    })
    .into_response()
}
