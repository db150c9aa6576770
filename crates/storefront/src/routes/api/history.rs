//! Recording product views.

use axum::{Json, body::Bytes, extract::State};
use serde_json::{Value, json};
use tracing::instrument;
use verovista_core::ProductId;

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::sanitize::sanitize_input;
use crate::state::AppState;

/// Pull the product id out of a request body.
///
/// The body must be a non-empty JSON object. String and numeric ids are
/// accepted; anything else counts as missing.
fn product_id_from_body(body: &[u8]) -> Result<ProductId> {
    let data = serde_json::from_slice::<Value>(body)
        .ok()
        .filter(|v| v.as_object().is_some_and(|o| !o.is_empty()))
        .ok_or_else(|| AppError::BadRequest("No data provided".to_string()))?;

    let raw = match data.get("product_id") {
        Some(Value::String(s)) => sanitize_input(s),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };

    if raw.is_empty() {
        return Err(AppError::BadRequest("Product ID is required".to_string()));
    }
    Ok(ProductId::new(raw))
}

/// Move a product to the front of the signed-in user's history.
///
/// # Route
///
/// `POST /api/add-to-history` with body `{"product_id": "..."}`
#[instrument(skip_all)]
pub async fn add_to_history(
    State(state): State<AppState>,
    auth: RequireAuth,
    body: Bytes,
) -> Result<Json<Value>> {
    let product_id = product_id_from_body(&body)?;
    let mut session = auth.session;

    state
        .catalog()
        .record_view(session.history_mut(), &product_id)?;
    session.save().await?;

    tracing::debug!(product_id = %product_id, "recorded view");
    Ok(Json(json!({ "success": true, "message": "Added to history" })))
}
