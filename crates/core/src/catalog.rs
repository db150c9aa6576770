//! The product catalog: point lookups, keyword search and view history.
//!
//! A [`Catalog`] is built once from the static data source and never changes
//! afterwards, so it can be shared across request handlers without locking.
//!
//! # Example
//!
//! ```rust
//! use verovista_core::{Catalog, Product, ProductId, ViewHistory};
//!
//! let catalog = Catalog::from_products(vec![
//!     Product::new("A", "Red Shoe"),
//!     Product::new("B", "Blue Hat"),
//! ]);
//!
//! let hits: Vec<_> = catalog.find_matching("red").iter().map(|p| p.product_id.as_str()).collect();
//! assert_eq!(hits, ["A"]);
//!
//! let mut history = ViewHistory::new();
//! catalog.record_view(&mut history, &ProductId::new("B")).unwrap();
//! catalog.record_view(&mut history, &ProductId::new("A")).unwrap();
//! catalog.record_view(&mut history, &ProductId::new("B")).unwrap();
//! let ids: Vec<_> = history.ids().map(ProductId::as_str).collect();
//! assert_eq!(ids, ["B", "A"]);
//! ```

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use thiserror::Error;

use crate::types::{Product, ProductId, ViewHistory};

/// Errors raised by catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The data source is not a valid JSON list of products.
    #[error("malformed catalog data: {0}")]
    Parse(#[from] serde_json::Error),

    /// No product with the given ID exists.
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),
}

/// Immutable, in-memory product catalog.
#[derive(Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
    /// Lowercased searchable text, parallel to `products`.
    haystacks: Vec<String>,
    by_id: HashMap<ProductId, usize>,
    duplicates_dropped: usize,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a catalog from products in source order.
    ///
    /// Product IDs must be unique. When an ID repeats, the first record is
    /// kept and later ones are dropped; see [`Self::duplicates_dropped`].
    #[must_use]
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Self {
        let mut catalog = Self::default();
        for product in products {
            match catalog.by_id.entry(product.product_id.clone()) {
                Entry::Occupied(_) => catalog.duplicates_dropped += 1,
                Entry::Vacant(slot) => {
                    slot.insert(catalog.products.len());
                    catalog.haystacks.push(product.searchable_text());
                    catalog.products.push(product);
                }
            }
        }
        catalog
    }

    /// Parse a catalog from a JSON array of product records.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] if the input is not a JSON array of
    /// objects each carrying a string `product_id`.
    pub fn from_json(source: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(source)?;
        Ok(Self::from_products(products))
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Returns `true` if the catalog holds no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// All products in source order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// How many records were discarded for repeating an earlier ID.
    #[must_use]
    pub const fn duplicates_dropped(&self) -> usize {
        self.duplicates_dropped
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn get_by_id(&self, id: &ProductId) -> Option<&Product> {
        self.by_id
            .get(id)
            .and_then(|&index| self.products.get(index))
    }

    /// Returns `true` if a product with this ID exists.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Products tagged as trending, in source order.
    #[must_use]
    pub fn trending(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.is_trending()).collect()
    }

    /// Case-insensitive substring search.
    ///
    /// The query is expected to be sanitized and trimmed already. An empty
    /// query matches nothing. Results keep catalog order; there is no
    /// ranking.
    #[must_use]
    pub fn find_matching(&self, query: &str) -> Vec<&Product> {
        if query.is_empty() {
            return Vec::new();
        }

        let needle = query.to_lowercase();
        self.products
            .iter()
            .zip(&self.haystacks)
            .filter(|(_, haystack)| haystack.contains(&needle))
            .map(|(product, _)| product)
            .collect()
    }

    /// Record that the session's user viewed `id`.
    ///
    /// The ID moves to the front of `history`, older duplicates are removed
    /// and the list is capped. The history is marked dirty on success.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ProductNotFound`] if `id` is not in the
    /// catalog. The history is left untouched in that case.
    pub fn record_view(&self, history: &mut ViewHistory, id: &ProductId) -> Result<(), CatalogError> {
        if !self.contains(id) {
            return Err(CatalogError::ProductNotFound(id.clone()));
        }
        history.record(id.clone());
        Ok(())
    }

    /// Resolve a history to products, most recent first.
    ///
    /// IDs that no longer exist in the catalog are skipped.
    #[must_use]
    pub fn resolve_history(&self, history: &ViewHistory) -> Vec<&Product> {
        history.ids().filter_map(|id| self.get_by_id(id)).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        Catalog::from_products(vec![
            Product::new("A", "Red Shoe"),
            Product::new("B", "Blue Hat"),
        ])
    }

    fn ids<'a>(products: &[&'a Product]) -> Vec<&'a str> {
        products.iter().map(|p| p.product_id.as_str()).collect()
    }

    #[test]
    fn test_find_matching_scenario() {
        let catalog = sample();
        assert_eq!(ids(&catalog.find_matching("red")), vec!["A"]);
        assert!(catalog.find_matching("").is_empty());
    }

    #[test]
    fn test_find_matching_is_case_insensitive() {
        let catalog = sample();
        assert_eq!(ids(&catalog.find_matching("BLUE h")), vec!["B"]);
    }

    #[test]
    fn test_find_matching_searches_all_fields_in_order() {
        let mut shoe = Product::new("A", "Runner");
        shoe.brand = "Acme".to_string();
        let mut hat = Product::new("B", "Cap");
        hat.description = "Made by acme".to_string();
        let mut scarf = Product::new("C", "Scarf");
        scarf.query_terms = vec!["acme-collab".to_string()];
        let mut sock = Product::new("D", "Sock");
        sock.category = "Hosiery".to_string();

        let catalog = Catalog::from_products(vec![shoe, hat, scarf, sock]);
        assert_eq!(ids(&catalog.find_matching("acme")), vec!["A", "B", "C"]);
        assert_eq!(ids(&catalog.find_matching("hosiery")), vec!["D"]);
    }

    #[test]
    fn test_find_matching_no_hits() {
        assert!(sample().find_matching("umbrella").is_empty());
    }

    #[test]
    fn test_get_by_id() {
        let catalog = sample();
        assert_eq!(
            catalog.get_by_id(&ProductId::new("B")).map(|p| p.name.as_str()),
            Some("Blue Hat")
        );
        assert!(catalog.get_by_id(&ProductId::new("Z")).is_none());
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let catalog = Catalog::from_products(vec![
            Product::new("A", "First"),
            Product::new("A", "Second"),
            Product::new("B", "Other"),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.duplicates_dropped(), 1);
        assert_eq!(
            catalog.get_by_id(&ProductId::new("A")).map(|p| p.name.as_str()),
            Some("First")
        );
        assert!(catalog.find_matching("second").is_empty());
    }

    #[test]
    fn test_from_json() {
        let catalog = Catalog::from_json(
            r#"[
                {"product_id": "A", "name": "Red Shoe", "query_terms": ["trending"]},
                {"product_id": "B", "name": "Blue Hat", "price": 12}
            ]"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(ids(&catalog.trending()), vec!["A"]);
    }

    #[test]
    fn test_from_json_malformed() {
        assert!(matches!(
            Catalog::from_json("{not json"),
            Err(CatalogError::Parse(_))
        ));
        assert!(matches!(
            Catalog::from_json(r#"[{"name": "no id"}]"#),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_record_view_scenario() {
        let catalog = sample();
        let mut history = ViewHistory::new();
        for id in ["B", "A", "B"] {
            catalog.record_view(&mut history, &ProductId::new(id)).unwrap();
        }
        let stored: Vec<_> = history.ids().map(ProductId::as_str).collect();
        assert_eq!(stored, vec!["B", "A"]);
        assert!(history.is_dirty());
    }

    #[test]
    fn test_record_view_unknown_leaves_history_untouched() {
        let catalog = sample();
        let mut history = ViewHistory::new();
        catalog.record_view(&mut history, &ProductId::new("A")).unwrap();
        history.mark_clean();
        let before = history.clone();

        let err = catalog
            .record_view(&mut history, &ProductId::new("Z"))
            .unwrap_err();
        assert!(matches!(err, CatalogError::ProductNotFound(ref id) if id.as_str() == "Z"));
        assert_eq!(history, before);
        assert!(!history.is_dirty());
    }

    #[test]
    fn test_resolve_history_skips_missing_ids() {
        let catalog = sample();
        let history = ViewHistory::from(vec![
            ProductId::new("B"),
            ProductId::new("gone"),
            ProductId::new("A"),
        ]);
        assert_eq!(ids(&catalog.resolve_history(&history)), vec!["B", "A"]);
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::empty();
        assert!(catalog.is_empty());
        assert!(catalog.find_matching("anything").is_empty());
        assert!(catalog.trending().is_empty());
    }
}
