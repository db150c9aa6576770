//! Product records as loaded from the static data source.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::ProductId;

/// Tag in `query_terms` that marks a product for the home page.
pub const TRENDING_TERM: &str = "trending";

/// A catalog product.
///
/// Only the searchable fields are typed. Everything else in the source record
/// (`image_url`, `offers`, ratings, ...) is kept in `attributes` and written
/// back out unchanged, so display data round-trips without the core knowing
/// its shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product ID.
    pub product_id: ProductId,
    /// Product name.
    #[serde(default)]
    pub name: String,
    /// Brand or manufacturer.
    #[serde(default)]
    pub brand: String,
    /// Category label.
    #[serde(default)]
    pub category: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Lowercase tags used for auxiliary matching (e.g. `"trending"`).
    #[serde(default)]
    pub query_terms: Vec<String>,
    /// Opaque pass-through display attributes.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Product {
    /// Create a product with only an ID and a name.
    #[must_use]
    pub fn new(product_id: impl Into<ProductId>, name: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            brand: String::new(),
            category: String::new(),
            description: String::new(),
            query_terms: Vec::new(),
            attributes: Map::new(),
        }
    }

    /// Lowercased text that search queries are matched against.
    ///
    /// Name, brand, category, description and the query terms joined by single
    /// spaces, in that order.
    #[must_use]
    pub fn searchable_text(&self) -> String {
        let terms = self.query_terms.join(" ");
        [
            self.name.as_str(),
            self.brand.as_str(),
            self.category.as_str(),
            self.description.as_str(),
            terms.as_str(),
        ]
        .join(" ")
        .to_lowercase()
    }

    /// Returns `true` if the product carries the trending tag.
    #[must_use]
    pub fn is_trending(&self) -> bool {
        self.query_terms.iter().any(|term| term == TRENDING_TERM)
    }
}
