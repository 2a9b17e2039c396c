//! Integration tests for the typed endpoint groups
//!
//! Each test runs the real reqwest transport against a wiremock server and
//! checks the path, query and body a call produces.

use std::sync::Arc;

use farmlink_common::MemoryTokenStore;
use farmlink_domain::{
    CartMergeStrategy, CartSyncItem, ConflictResolution, Config, CreateOrderData, ImageUpload, NotificationPreferences,
    ProductFilters, SalesPeriod,
};
use farmlink_infra::ApiClient;
use serde_json::{json, Value};
use wiremock::matchers::{
    body_json, body_partial_json, body_string_contains, header, header_regex, method, path,
    query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> ApiClient {
    let mut config = Config::default();
    config.api.base_url = format!("{}/api", server.uri());
    config.api.platform = "ios".into();
    ApiClient::builder()
        .config(config)
        .token_store(Arc::new(MemoryTokenStore::new()))
        .build()
        .expect("client should build")
}

fn ok_json(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

#[tokio::test]
async fn login_stores_tokens_and_authorizes_later_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "ana@farm.test", "password": "hunter22" })))
        .respond_with(ok_json(json!({
            "accessToken": "a1",
            "refreshToken": "r1",
            "user": { "id": "u1", "role": "CUSTOMER" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("Authorization", "Bearer a1"))
        .respond_with(ok_json(json!({ "id": "u1" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let session = client.auth().login::<Value>("ana@farm.test", "hunter22").await.unwrap();

    assert_eq!(session.access_token, "a1");
    assert_eq!(session.user["id"], "u1");
    assert_eq!(client.credentials().refresh_token().await.as_deref(), Some("r1"));

    let me: Value = client.auth().current_user().await.unwrap();
    assert_eq!(me["id"], "u1");
}

#[tokio::test]
async fn logout_clears_tokens_even_when_the_server_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client.set_token("a1").await;
    client.set_refresh_token("r1").await;

    let err = client.auth().logout().await.unwrap_err();

    assert_eq!(err.status_code(), 500);
    assert_eq!(err.message(), "An error occurred");
    assert!(!client.is_authenticated().await);
    assert_eq!(client.credentials().refresh_token().await, None);
}

#[tokio::test]
async fn client_identification_headers_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products/featured"))
        .and(header("x-client-type", "mobile"))
        .and(header("x-platform", "ios"))
        .and(header("x-app-version", "1.0.0"))
        .respond_with(ok_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let products: Vec<Value> = client.products().featured().await.unwrap();
    assert!(products.is_empty());
}

#[tokio::test]
async fn product_search_merges_filters_into_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products/search"))
        .and(query_param("q", "heirloom tomatoes"))
        .and(query_param("category", "vegetables"))
        .and(query_param("inStock", "true"))
        .respond_with(ok_json(json!({ "products": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let filters = ProductFilters {
        category: Some("vegetables".into()),
        in_stock: Some(true),
        ..ProductFilters::default()
    };
    let _: Value = client.products().search("heirloom tomatoes", Some(&filters)).await.unwrap();
}

#[tokio::test]
async fn ids_are_percent_encoded_as_one_segment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products/a%2Fb"))
        .respond_with(ok_json(json!({ "id": "a/b" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let product: Value = client.products().get("a/b").await.unwrap();
    assert_eq!(product["id"], "a/b");
}

#[tokio::test]
async fn nearby_farms_default_to_fifty_km() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/farms/nearby"))
        .and(query_param("lat", "45.5"))
        .and(query_param("lng", "-122.25"))
        .and(query_param("radius", "50"))
        .respond_with(ok_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let _: Value = client.farms().nearby(45.5, -122.25, None).await.unwrap();
}

#[tokio::test]
async fn cart_sync_sends_local_items_and_strategy() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/cart/sync"))
        .and(body_partial_json(json!({
            "localItems": [{ "productId": "p1", "quantity": 2 }],
            "strategy": { "conflictResolution": "max", "clearLocalAfterMerge": true }
        })))
        .respond_with(ok_json(json!({ "merged": 1 })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let items = [CartSyncItem { product_id: "p1".into(), quantity: 2, farm_id: None }];
    let strategy = CartMergeStrategy {
        conflict_resolution: ConflictResolution::Max,
        clear_local_after_merge: true,
    };
    let result: Value = client.cart().sync(&items, Some(strategy)).await.unwrap();
    assert_eq!(result["merged"], 1);
}

#[tokio::test]
async fn payment_intent_defaults_to_usd() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/checkout/create-payment-intent"))
        .and(body_json(json!({ "amount": 2500, "currency": "usd" })))
        .respond_with(ok_json(json!({ "clientSecret": "pi_secret" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let intent: Value = client.payments().create_payment_intent(2500, None, None).await.unwrap();
    assert_eq!(intent["clientSecret"], "pi_secret");
}

#[tokio::test]
async fn analytics_queries_carry_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/analytics/products/top"))
        .and(query_param("limit", "10"))
        .respond_with(ok_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/analytics/sales"))
        .and(query_param("period", "week"))
        .respond_with(ok_json(json!({ "total": 0 })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let _: Value = client.analytics().top_products(None).await.unwrap();
    let _: Value = client.analytics().sales_summary(SalesPeriod::Week).await.unwrap();
}

#[tokio::test]
async fn push_token_is_tagged_with_configured_platform() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/notifications/push-token"))
        .and(body_json(json!({ "token": "ExponentPushToken[x]", "platform": "ios" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client.notifications().update_push_token::<()>("ExponentPushToken[x]").await.unwrap();
}

#[tokio::test]
async fn notification_preferences_decode_into_model() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/notifications/preferences"))
        .respond_with(ok_json(json!({
            "orderUpdates": true,
            "newProducts": false,
            "promotions": false,
            "farmNews": true,
            "emailNotifications": true,
            "pushNotifications": true
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let preferences: NotificationPreferences = client.notifications().preferences().await.unwrap();
    assert!(preferences.order_updates);
    assert!(!preferences.promotions);
}

#[tokio::test]
async fn image_upload_is_multipart_with_default_folder() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains("name=\"folder\""))
        .and(body_string_contains("products"))
        .and(body_string_contains("filename=\"basket.png\""))
        .and(body_string_contains("image/png"))
        .and(body_string_contains("PNGDATA"))
        .respond_with(ok_json(json!({ "url": "https://cdn.test/basket.png" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let image = ImageUpload::new("/tmp/photos/basket.png", b"PNGDATA".to_vec());
    let uploaded: Value = client.upload().image(&image, None).await.unwrap();
    assert_eq!(uploaded["url"], "https://cdn.test/basket.png");
}

#[tokio::test]
async fn server_errors_are_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "Validation failed",
            "errors": ["items must not be empty"]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let data = CreateOrderData {
        items: Vec::new(),
        shipping_address_id: "addr_1".into(),
        payment_method_id: "pm_1".into(),
        notes: None,
    };
    let err = client.orders().create::<Value>(&data).await.unwrap_err();

    let body = err.body();
    assert_eq!(body.status_code, 400);
    assert_eq!(body.message, "Validation failed");
    assert_eq!(body.errors, vec!["items must not be empty".to_string()]);
}
