//! Signed-in user pages.
//!
//! Both routes sit behind [`RequireAuth`]; anonymous visitors are sent to
//! `/login`.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::instrument;
use verovista_core::Identity;

use crate::middleware::RequireAuth;
use crate::routes::products::{ProductView, views};
use crate::state::AppState;

/// Profile body.
#[derive(Debug, Serialize)]
pub struct Profile<'a> {
    pub user: &'a Identity,
    pub greeting: &'a str,
    pub history_count: usize,
}

/// History body.
#[derive(Debug, Serialize)]
pub struct History<'a> {
    pub products: Vec<ProductView<'a>>,
    pub count: usize,
}

/// Profile of the signed-in user.
///
/// # Route
///
/// `GET /profile`
#[instrument(skip_all)]
pub async fn profile(auth: RequireAuth) -> Response {
    Json(Profile {
        user: &auth.identity,
        greeting: auth.identity.greeting_name(),
        history_count: auth.session.history().len(),
    })
    .into_response()
}

/// Products the signed-in user has viewed, most recent first.
///
/// Ids that no longer resolve to a product are left out.
///
/// # Route
///
/// `GET /history`
#[instrument(skip_all)]
pub async fn history(State(state): State<AppState>, auth: RequireAuth) -> Response {
    let products = views(state.catalog().resolve_history(auth.session.history()));

    Json(History {
        count: products.len(),
        products,
    })
    .into_response()
}
