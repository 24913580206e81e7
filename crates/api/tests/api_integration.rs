//! Integration tests for the API server.

use std::sync::OnceLock;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            metrics_exporter_prometheus::PrometheusBuilder::new()
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup() -> axum::Router {
    let state = api::create_default_state();
    api::create_app(state, get_metrics_handle())
}

async fn post_json(app: &axum::Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn get_json(app: &axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

/// Seeds a customer (10,000 USD limit) and a product (100 USD, 10 in stock)
/// and returns their ids.
async fn seed(app: &axum::Router) -> (String, String) {
    let (status, customer) = post_json(
        app,
        "/customers",
        serde_json::json!({
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "credit_limit_cents": 1_000_000,
            "currency": "USD"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, product) = post_json(
        app,
        "/products",
        serde_json::json!({
            "name": "Widget",
            "description": "A widget",
            "price_cents": 10_000,
            "currency": "USD",
            "stock": 10,
            "sku": "SKU-1"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    (
        customer["id"].as_str().unwrap().to_string(),
        product["id"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn health_check() {
    let app = setup();
    let (status, json) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn fault_discipline_full_lifecycle() {
    let app = setup();
    let (customer_id, product_id) = seed(&app).await;

    let (status, order) = post_json(
        &app,
        "/orders",
        serde_json::json!({
            "customer_id": customer_id,
            "currency": "USD",
            "shipping_address": "1 Example Street"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["status"], "Pending");
    let order_id = order["id"].as_str().unwrap();

    let (status, order) = post_json(
        &app,
        &format!("/orders/{order_id}/items"),
        serde_json::json!({ "product_id": product_id, "quantity": 2 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["total_cents"], 20_000);

    let (status, order) = post_json(
        &app,
        &format!("/orders/{order_id}/submit"),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["status"], "Submitted");

    let (status, order) = post_json(
        &app,
        &format!("/orders/{order_id}/pay"),
        serde_json::json!({ "amount_cents": 20_000, "currency": "USD" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["status"], "Approved");

    let (status, order) = post_json(
        &app,
        &format!("/orders/{order_id}/ship"),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["status"], "Shipped");
    assert!(order["shipped_at"].as_str().is_some());

    // credit was debited by the order total
    let (_, customer) = get_json(&app, &format!("/customers/{customer_id}")).await;
    assert_eq!(customer["available_credit_cents"], 980_000);

    // stock was reserved at add-item time
    let (_, product) = get_json(&app, &format!("/products/{product_id}")).await;
    assert_eq!(product["stock"], 8);
}

#[tokio::test]
async fn outcome_discipline_place_and_cancel_roundtrip() {
    let app = setup();
    let (customer_id, product_id) = seed(&app).await;

    let (status, order) = post_json(
        &app,
        "/outcome/orders",
        serde_json::json!({
            "customer_id": customer_id,
            "currency": "USD",
            "shipping_address": "1 Example Street"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let order_id = order["id"].as_str().unwrap();

    let (status, _) = post_json(
        &app,
        &format!("/outcome/orders/{order_id}/items"),
        serde_json::json!({ "product_id": product_id, "quantity": 2 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post_json(
        &app,
        &format!("/outcome/orders/{order_id}/submit"),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, order) = post_json(
        &app,
        &format!("/outcome/orders/{order_id}/cancel"),
        serde_json::json!({ "reason": "changed mind" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["status"], "Cancelled");

    let (_, customer) = get_json(&app, &format!("/customers/{customer_id}")).await;
    assert_eq!(customer["available_credit_cents"], 1_000_000);

    let (_, product) = get_json(&app, &format!("/products/{product_id}")).await;
    assert_eq!(product["stock"], 10);
}

#[tokio::test]
async fn both_disciplines_render_the_same_problem_details() {
    let app = setup();
    let (customer_id, product_id) = seed(&app).await;

    // one pending order per discipline
    let mut order_ids = Vec::new();
    for uri in ["/orders", "/outcome/orders"] {
        let (_, order) = post_json(
            &app,
            uri,
            serde_json::json!({
                "customer_id": customer_id,
                "currency": "USD",
                "shipping_address": "1 Example Street"
            }),
        )
        .await;
        order_ids.push(order["id"].as_str().unwrap().to_string());
    }

    // zero quantity violates validation identically on both sides
    let (fault_status, fault_body) = post_json(
        &app,
        &format!("/orders/{}/items", order_ids[0]),
        serde_json::json!({ "product_id": product_id, "quantity": 0 }),
    )
    .await;
    let (outcome_status, outcome_body) = post_json(
        &app,
        &format!("/outcome/orders/{}/items", order_ids[1]),
        serde_json::json!({ "product_id": product_id, "quantity": 0 }),
    )
    .await;

    assert_eq!(fault_status, StatusCode::BAD_REQUEST);
    assert_eq!(outcome_status, StatusCode::BAD_REQUEST);
    assert_eq!(fault_body["code"], outcome_body["code"]);
    assert_eq!(fault_body["title"], outcome_body["title"]);
    assert_eq!(fault_body["status"], outcome_body["status"]);
    assert_eq!(fault_body["type"], outcome_body["type"]);
}

#[tokio::test]
async fn missing_order_renders_not_found_problem() {
    let app = setup();
    seed(&app).await;
    let fake_id = uuid::Uuid::new_v4();

    let (status, body) = get_json(&app, &format!("/orders/{fake_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "general.not_found");
    assert_eq!(body["title"], "NotFound");
    assert_eq!(body["status"], 404);
    assert_eq!(body["entity"], serde_json::Value::Null); // fault path carries no extensions

    let (status, body) = get_json(&app, &format!("/outcome/orders/{fake_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "general.not_found");
    // outcome path flattens the error metadata into the body
    assert_eq!(body["entity"], "Order");
}

#[tokio::test]
async fn invalid_id_format_is_bad_request() {
    let app = setup();

    let (status, body) = get_json(&app, "/orders/not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["title"], "Validation");
}

#[tokio::test]
async fn unknown_currency_is_rejected() {
    let app = setup();
    let (customer_id, _) = seed(&app).await;

    let (status, body) = post_json(
        &app,
        "/orders",
        serde_json::json!({
            "customer_id": customer_id,
            "currency": "XXX",
            "shipping_address": "1 Example Street"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "money.unknown_currency");
}

#[tokio::test]
async fn insufficient_stock_is_unprocessable() {
    let app = setup();
    let (customer_id, product_id) = seed(&app).await;

    let (_, order) = post_json(
        &app,
        "/orders",
        serde_json::json!({
            "customer_id": customer_id,
            "currency": "USD",
            "shipping_address": "1 Example Street"
        }),
    )
    .await;
    let order_id = order["id"].as_str().unwrap();

    let (status, body) = post_json(
        &app,
        &format!("/orders/{order_id}/items"),
        serde_json::json!({ "product_id": product_id, "quantity": 999 }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "product.insufficient_stock");
}

#[tokio::test]
async fn end_to_end_place_route() {
    let app = setup();
    let (customer_id, product_id) = seed(&app).await;

    let (status, order) = post_json(
        &app,
        "/outcome/orders/place",
        serde_json::json!({
            "customer_id": customer_id,
            "currency": "USD",
            "shipping_address": "1 Example Street",
            "items": [{ "product_id": product_id, "quantity": 2 }],
            "payment_cents": 20_000
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["status"], "Shipped");
    assert_eq!(order["total_cents"], 20_000);
}
