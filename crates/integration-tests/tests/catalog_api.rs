//! Catalog endpoints: home, search, product detail, health.

use serde_json::Value;
use verovista_integration_tests::TestApp;

fn ids(products: &Value) -> Vec<&str> {
    products
        .as_array()
        .expect("products array")
        .iter()
        .filter_map(|p| p["product_id"].as_str())
        .collect()
}

#[tokio::test]
async fn test_home_lists_trending_products() {
    let app = TestApp::spawn().await;
    let body = app.get_json("/", 200).await;

    assert_eq!(ids(&body["trending_products"]), ["p1", "p3"]);
    assert_eq!(body["trending_products"][0]["detail_url"], "/product/p1");
    assert!(body["user"].is_null());
    assert_eq!(body["login_enabled"], false);
}

#[tokio::test]
async fn test_search_is_case_insensitive_substring() {
    let app = TestApp::spawn().await;
    let body = app.get_json("/search?query=STRIDE", 200).await;

    assert_eq!(ids(&body["products"]), ["p1", "p3"]);
    assert_eq!(body["query"], "STRIDE");
    assert_eq!(body["count"], 2);
}

#[tokio::test]
async fn test_search_matches_query_terms() {
    let app = TestApp::spawn().await;
    let body = app.get_json("/search-ajax?query=hat", 200).await;

    assert_eq!(ids(&body["products"]), ["p2"]);
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn test_search_sanitizes_markup() {
    let app = TestApp::spawn().await;
    let body = app
        .get_json("/search-ajax?query=%3Cscript%3Ealert(1)%3C%2Fscript%3E%3Cb%3Ehat%3C%2Fb%3E", 200)
        .await;

    assert_eq!(body["query"], "hat");
    assert_eq!(ids(&body["products"]), ["p2"]);
}

#[tokio::test]
async fn test_search_page_empty_query_redirects_home() {
    let app = TestApp::spawn().await;
    assert_eq!(app.redirect_location("/search?query=").await, "/");
    assert_eq!(app.redirect_location("/search?query=%20%20").await, "/");
}

#[tokio::test]
async fn test_search_ajax_empty_query() {
    let app = TestApp::spawn().await;
    let body = app.get_json("/search-ajax?query=", 200).await;

    assert_eq!(
        body,
        serde_json::json!({ "products": [], "query": "", "error": "No query provided" })
    );
}

#[tokio::test]
async fn test_search_without_matches() {
    let app = TestApp::spawn().await;
    let body = app.get_json("/search-ajax?query=submarine", 200).await;

    assert_eq!(body["count"], 0);
    assert!(ids(&body["products"]).is_empty());
}

#[tokio::test]
async fn test_product_detail_passes_attributes_through() {
    let app = TestApp::spawn().await;
    let body = app.get_json("/product/p1", 200).await;

    assert_eq!(body["name"], "Red Running Shoe");
    assert_eq!(body["image_url"], "https://img.example/p1.jpg");
}

#[tokio::test]
async fn test_unknown_product_is_404() {
    let app = TestApp::spawn().await;
    let body = app.get_json("/product/nope", 404).await;
    assert_eq!(body["error"], "Product not found");
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = TestApp::spawn().await;
    let body = app.get_json("/no/such/page", 404).await;
    assert_eq!(body["error"], "Not found");
}

#[tokio::test]
async fn test_api_health() {
    let app = TestApp::spawn().await;
    let body = app.get_json("/api/health", 200).await;

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["products_loaded"], 3);
    assert_eq!(body["google_auth"], false);
    assert!(body["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn test_liveness() {
    let app = TestApp::spawn().await;
    let response = app
        .client
        .get(app.url("/health"))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.expect("body"), "ok");
}
