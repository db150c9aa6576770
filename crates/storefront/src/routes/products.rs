//! Product route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::instrument;
use verovista_core::{Product, ProductId};

use crate::error::{AppError, Result};
use crate::sanitize::sanitize_input;
use crate::state::AppState;

/// A product as sent to clients, with a link to its detail endpoint.
///
/// Catalog attributes are flattened alongside, so a product's own `url`
/// attribute passes through untouched.
#[derive(Debug, Serialize)]
pub struct ProductView<'a> {
    #[serde(flatten)]
    pub product: &'a Product,
    pub detail_url: String,
}

impl<'a> From<&'a Product> for ProductView<'a> {
    fn from(product: &'a Product) -> Self {
        Self {
            detail_url: detail_url(&product.product_id),
            product,
        }
    }
}

/// Path of the detail endpoint for a product.
#[must_use]
pub fn detail_url(id: &ProductId) -> String {
    format!("/product/{}", urlencoding::encode(id.as_str()))
}

/// Convert catalog results into client views.
#[must_use]
pub fn views<'a>(products: impl IntoIterator<Item = &'a Product>) -> Vec<ProductView<'a>> {
    products.into_iter().map(ProductView::from).collect()
}

/// Product detail.
///
/// # Route
///
/// `GET /product/{product_id}`
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<Product>> {
    let id = ProductId::new(sanitize_input(&product_id));

    state
        .catalog()
        .get_by_id(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
}
