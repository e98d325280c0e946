use std::sync::Arc;

use axum::{
    body::Bytes,
    http::{HeaderName, HeaderValue, StatusCode},
};
use axum_test::TestServer;
use serde_json::{json, Value};

use storefront_recs::{
    config::Config,
    error::CatalogError,
    models::{ApiProduct, CatalogSnapshot},
    routes::{create_router, AppState},
    services::{
        providers::{storefront::flatten_products, CatalogProvider},
        recommendations::{FixedSource, RandomSource},
    },
};

/// Serves a fixed catalog built through the real flattening rules
struct StaticCatalog {
    products: Value,
}

#[async_trait::async_trait]
impl CatalogProvider for StaticCatalog {
    async fn fetch_catalog(&self, limit: usize) -> Result<CatalogSnapshot, CatalogError> {
        let products: Vec<ApiProduct> = serde_json::from_value(self.products.clone())
            .map_err(|e| CatalogError::GraphQl(e.to_string()))?;
        Ok(flatten_products(products.into_iter().take(limit)))
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

struct FailingCatalog;

#[async_trait::async_trait]
impl CatalogProvider for FailingCatalog {
    async fn fetch_catalog(&self, _limit: usize) -> Result<CatalogSnapshot, CatalogError> {
        Err(CatalogError::Status {
            status: 503,
            body: "maintenance".to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

struct PanickingCatalog;

#[async_trait::async_trait]
impl CatalogProvider for PanickingCatalog {
    async fn fetch_catalog(&self, _limit: usize) -> Result<CatalogSnapshot, CatalogError> {
        panic!("catalog provider bug");
    }

    fn name(&self) -> &'static str {
        "panicking"
    }
}

fn fixed_noise() -> Box<dyn RandomSource + Send> {
    Box::new(FixedSource::new(0.5))
}

fn product(id: u32, category: &str, price: &str, variants: usize) -> Value {
    let edges: Vec<Value> = (0..variants)
        .map(|v| json!({"node": {"id": format!("gid://shopify/ProductVariant/{}{}", id, v)}}))
        .collect();

    json!({
        "id": format!("gid://shopify/Product/{}", id),
        "title": format!("{} {}", category, id),
        "productType": category,
        "featuredImage": {"url": format!("https://cdn.example.com/{}.png", id)},
        "priceRange": {"maxVariantPrice": {"amount": price}},
        "variants": {"edges": edges}
    })
}

fn wardrobe() -> Value {
    json!([
        product(1, "Jackets", "150.00", 1),
        product(2, "Shirts", "45.00", 1),
        product(3, "T-Shirts", "25.00", 2),
        product(4, "Sweaters", "70.00", 1),
        product(5, "Pants", "90.00", 1),
        product(6, "Jackets", "95.00", 1),
        product(7, "Jackets", "900.00", 0),
        product(8, "", "30.00", 1),
    ])
}

fn server_with(provider: Arc<dyn CatalogProvider>) -> TestServer {
    let config = Config::from_vars(Vec::new()).unwrap();
    let state = AppState::new(&config, provider).with_random_source(fixed_noise);
    TestServer::new(create_router(state)).unwrap()
}

fn create_test_server() -> TestServer {
    server_with(Arc::new(StaticCatalog {
        products: wardrobe(),
    }))
}

fn recommended_ids(body: &Value) -> Vec<String> {
    body["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_json(&json!({"status": "ok"}));
}

#[tokio::test]
async fn test_recommendations_for_jacket() {
    let server = create_test_server();

    let response = server
        .post("/get-recommendations")
        .json(&json!({"currentProductId": "1", "history": []}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();

    // 6 is the other jacket; 4 and 2 complement jackets
    assert_eq!(recommended_ids(&body), vec!["6", "4", "2"]);
    assert_eq!(
        body["message"],
        "Recommendations based on preferred category: Jackets from live Shopify data."
    );

    let first = &body["recommendations"][0];
    assert_eq!(first["defaultVariantId"], "60");
    assert_eq!(first["category"], "Jackets");
    assert_eq!(first["price"], 95.0);
    assert_eq!(first["image"], "https://cdn.example.com/6.png");
}

#[tokio::test]
async fn test_product_without_variants_is_never_recommended() {
    let server = create_test_server();

    for current in ["1", "2", "5", "8"] {
        let response = server
            .post("/get-recommendations")
            .json(&json!({"currentProductId": current}))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        let ids = recommended_ids(&body);
        assert!(!ids.contains(&"7".to_string()));
        assert!(!ids.contains(&current.to_string()));
        assert!(ids.len() <= 3);
    }
}

#[tokio::test]
async fn test_click_history_shifts_preference_and_excludes_clicked() {
    let server = create_test_server();

    let response = server
        .post("/get-recommendations")
        .json(&json!({
            "currentProductId": "1",
            "history": [
                {"productId": "6", "type": "view"},
                {"productId": "6", "type": "view"},
                {"productId": "5", "type": "click"},
                {"productId": 3, "type": "view"},
                {"productId": "2"},
                "garbage"
            ]
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();

    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("preferred category: Pants"));
    let ids = recommended_ids(&body);
    assert!(!ids.contains(&"5".to_string()));
    assert!(!ids.contains(&"1".to_string()));
}

#[tokio::test]
async fn test_fixed_noise_gives_identical_responses() {
    let server = create_test_server();
    let request = json!({
        "currentProductId": "2",
        "history": [{"productId": "4", "type": "view"}]
    });

    let first: Value = server.post("/get-recommendations").json(&request).await.json();
    for _ in 0..5 {
        let again: Value = server.post("/get-recommendations").json(&request).await.json();
        assert_eq!(again, first);
    }
}

#[tokio::test]
async fn test_unknown_current_product_still_recommends() {
    let server = create_test_server();

    let response = server
        .post("/get-recommendations")
        .json(&json!({"currentProductId": "does-not-exist"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(recommended_ids(&body).len(), 3);
}

#[tokio::test]
async fn test_catalog_failure_degrades_to_empty() {
    let server = server_with(Arc::new(FailingCatalog));

    let response = server
        .post("/get-recommendations")
        .json(&json!({"currentProductId": "1", "history": []}))
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({
        "recommendations": [],
        "message": "Failed to load catalog."
    }));
}

#[tokio::test]
async fn test_missing_body_is_bad_request() {
    let server = create_test_server();

    let response = server.post("/get-recommendations").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_unparseable_body_is_bad_request() {
    let server = create_test_server();

    let response = server
        .post("/get-recommendations")
        .content_type("application/json")
        .bytes(Bytes::from_static(b"{\"currentProductId\": "))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .post("/get-recommendations")
        .json(&json!({"history": []}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .post("/get-recommendations")
        .json(&json!({"currentProductId": true}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_panic_becomes_internal_error() {
    let server = server_with(Arc::new(PanickingCatalog));

    let response = server
        .post("/get-recommendations")
        .add_header(
            HeaderName::from_static("origin"),
            HeaderValue::from_static("https://shop.example"),
        )
        .json(&json!({"currentProductId": "1"}))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&json!({"error": "Internal server error"}));
    // CORS headers must survive the panic path
    assert_eq!(response.header("access-control-allow-origin"), "*");
}

#[tokio::test]
async fn test_numeric_current_product_id_is_accepted() {
    let server = create_test_server();

    let numeric: Value = server
        .post("/get-recommendations")
        .json(&json!({"currentProductId": 1}))
        .await
        .json();
    let text: Value = server
        .post("/get-recommendations")
        .json(&json!({"currentProductId": "1"}))
        .await
        .json();

    assert_eq!(numeric, text);
    assert_eq!(recommended_ids(&numeric), vec!["6", "4", "2"]);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("widget-7"),
        )
        .await;

    assert_eq!(response.header("x-request-id"), "widget-7");

    let response = server.get("/health").await;
    assert!(!response.header("x-request-id").is_empty());
}
