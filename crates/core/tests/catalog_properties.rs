//! Property tests for catalog search and view history.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use verovista_core::{Catalog, HISTORY_LIMIT, Product, ProductId, ViewHistory};

fn product_strategy() -> impl Strategy<Value = Product> {
    (
        "[a-zA-Z ]{0,12}",
        "[a-zA-Z ]{0,8}",
        "[a-zA-Z ]{0,8}",
        "[a-zA-Z .]{0,24}",
        prop::collection::vec("[a-z]{1,8}", 0..4),
    )
        .prop_map(|(name, brand, category, description, query_terms)| {
            let mut product = Product::new("", name);
            product.brand = brand;
            product.category = category;
            product.description = description;
            product.query_terms = query_terms;
            product
        })
}

fn catalog_strategy() -> impl Strategy<Value = Catalog> {
    prop::collection::vec(product_strategy(), 1..12).prop_map(|products| {
        Catalog::from_products(products.into_iter().enumerate().map(|(i, mut p)| {
            p.product_id = ProductId::new(format!("p{i}"));
            p
        }))
    })
}

proptest! {
    /// An empty query never matches anything.
    #[test]
    fn prop_empty_query_matches_nothing(catalog in catalog_strategy()) {
        prop_assert!(catalog.find_matching("").is_empty());
    }

    /// Any substring of a searchable field or query term, in any case, finds
    /// its product.
    #[test]
    fn prop_field_substring_finds_product(
        catalog in catalog_strategy(),
        pick in any::<prop::sample::Index>(),
        field in 0usize..5,
        term in any::<prop::sample::Index>(),
        start in any::<prop::sample::Index>(),
        len in 1usize..6,
        upper in any::<bool>(),
    ) {
        let product = pick.get(catalog.products());
        let text = match field {
            0 => &product.name,
            1 => &product.brand,
            2 => &product.category,
            3 => &product.description,
            _ => {
                prop_assume!(!product.query_terms.is_empty());
                term.get(&product.query_terms)
            }
        };
        prop_assume!(!text.is_empty());

        let from = start.index(text.len());
        let to = (from + len).min(text.len());
        let needle = &text[from..to];
        prop_assume!(!needle.is_empty());
        let query = if upper { needle.to_uppercase() } else { needle.to_lowercase() };

        let hits = catalog.find_matching(&query);
        prop_assert!(hits.iter().any(|p| p.product_id == product.product_id));
    }

    /// Results keep catalog order.
    #[test]
    fn prop_results_in_catalog_order(catalog in catalog_strategy(), query in "[a-z]{1,2}") {
        let positions: Vec<usize> = catalog
            .find_matching(&query)
            .iter()
            .filter_map(|hit| catalog.products().iter().position(|p| p.product_id == hit.product_id))
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    /// History stays bounded, unique, and has the last recorded ID in front.
    #[test]
    fn prop_history_bounded_and_unique(views in prop::collection::vec(0usize..50, 1..120)) {
        let catalog = Catalog::from_products((0..50).map(|i| Product::new(format!("p{i}"), "x")));
        let mut history = ViewHistory::new();

        for view in &views {
            catalog.record_view(&mut history, &ProductId::new(format!("p{view}"))).unwrap();
            prop_assert!(history.len() <= HISTORY_LIMIT);
        }

        let stored: Vec<&ProductId> = history.ids().collect();
        let mut deduped = stored.clone();
        deduped.sort();
        deduped.dedup();
        prop_assert_eq!(deduped.len(), stored.len());

        let last = ProductId::new(format!("p{}", views[views.len() - 1]));
        prop_assert_eq!(history.position(&last), Some(0));
    }

    /// Recording the same ID twice in a row is the same as recording it once.
    #[test]
    fn prop_record_view_idempotent(
        views in prop::collection::vec(0usize..10, 0..20),
        repeat in 0usize..10,
    ) {
        let catalog = Catalog::from_products((0..10).map(|i| Product::new(format!("p{i}"), "x")));
        let mut once = ViewHistory::new();
        for view in &views {
            catalog.record_view(&mut once, &ProductId::new(format!("p{view}"))).unwrap();
        }
        let mut twice = once.clone();
        let id = ProductId::new(format!("p{repeat}"));

        catalog.record_view(&mut once, &id).unwrap();
        catalog.record_view(&mut twice, &id).unwrap();
        catalog.record_view(&mut twice, &id).unwrap();

        prop_assert_eq!(once, twice);
    }

    /// Resolving a history never yields more products than stored IDs and
    /// only yields products that exist.
    #[test]
    fn prop_resolve_history_drops_unknown(
        catalog in catalog_strategy(),
        stored in prop::collection::vec("p[0-9]{1,2}", 0..40),
    ) {
        let history = ViewHistory::from(stored.into_iter().map(ProductId::new).collect::<Vec<_>>());
        let resolved = catalog.resolve_history(&history);
        prop_assert!(resolved.len() <= history.len());
        for product in resolved {
            prop_assert!(catalog.contains(&product.product_id));
        }
    }
}

#[test]
fn test_thirty_first_view_evicts_oldest() {
    let catalog = Catalog::from_products((0..=HISTORY_LIMIT).map(|i| Product::new(format!("p{i}"), "x")));
    let mut history = ViewHistory::new();
    for i in 0..=HISTORY_LIMIT {
        catalog
            .record_view(&mut history, &ProductId::new(format!("p{i}")))
            .unwrap();
    }
    assert_eq!(history.len(), HISTORY_LIMIT);
    assert!(history.position(&ProductId::new("p0")).is_none());
}
