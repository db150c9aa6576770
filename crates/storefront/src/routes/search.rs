//! Search route handlers.
//!
//! Both endpoints sanitize the query and run a case-insensitive substring
//! match over the catalog. Results keep catalog order.

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::routes::products::{ProductView, views};
use crate::sanitize::sanitize_input;
use crate::state::AppState;

/// Search query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
}

/// Search response body.
#[derive(Debug, Serialize)]
pub struct SearchResults<'a> {
    pub products: Vec<ProductView<'a>>,
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

impl<'a> SearchResults<'a> {
    fn found(products: Vec<ProductView<'a>>, query: String) -> Self {
        Self {
            count: Some(products.len()),
            products,
            query,
            error: None,
        }
    }

    const fn no_query() -> Self {
        Self {
            products: Vec::new(),
            query: String::new(),
            count: None,
            error: Some("No query provided"),
        }
    }
}

/// Full search.
///
/// An empty query sends the user back to the home page.
///
/// # Route
///
/// `GET /search?query=...`
#[instrument(skip(state))]
pub async fn search_page(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Response {
    let query = sanitize_input(&params.query);
    if query.is_empty() {
        return Redirect::to("/").into_response();
    }

    let products = views(state.catalog().find_matching(&query));
    tracing::debug!(count = products.len(), "search");
    Json(SearchResults::found(products, query)).into_response()
}

/// As-you-type search.
///
/// # Route
///
/// `GET /search-ajax?query=...`
#[instrument(skip(state))]
pub async fn search_ajax(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Response {
    let query = sanitize_input(&params.query);
    if query.is_empty() {
        return Json(SearchResults::no_query()).into_response();
    }

    let products = views(state.catalog().find_matching(&query));
    Json(SearchResults::found(products, query)).into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_no_query_shape() {
        let value = serde_json::to_value(SearchResults::no_query()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "products": [], "query": "", "error": "No query provided" })
        );
    }

    #[test]
    fn test_found_counts_products() {
        let value = serde_json::to_value(SearchResults::found(Vec::new(), "hat".into())).unwrap();
        assert_eq!(value["count"], 0);
        assert_eq!(value["query"], "hat");
        assert!(value.get("error").is_none());
    }
}
