//! HTTP boundary for the dual-discipline order demo.
//!
//! Exposes the same order operations twice — `/orders/...` backed by the
//! fault workflow and `/outcome/orders/...` backed by the outcome workflow
//! — and renders every failure from either side as an RFC 7807 problem
//! details body, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod problem;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use repository::{InMemoryCustomers, InMemoryOrders, InMemoryProducts};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use workflow::{FaultOrderWorkflow, OutcomeOrderWorkflow};

pub use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/customers", post(routes::customers::create))
        .route("/customers/{id}", get(routes::customers::get))
        .route("/products", post(routes::products::create))
        .route("/products/{id}", get(routes::products::get))
        .route("/orders", post(routes::orders::create))
        .route("/orders/place", post(routes::orders::place))
        .route("/orders/{id}", get(routes::orders::get))
        .route("/orders/{id}/items", post(routes::orders::add_item))
        .route("/orders/{id}/submit", post(routes::orders::submit))
        .route("/orders/{id}/pay", post(routes::orders::pay))
        .route("/orders/{id}/ship", post(routes::orders::ship))
        .route("/orders/{id}/cancel", post(routes::orders::cancel))
        .route("/outcome/orders", post(routes::orders::outcome_create))
        .route("/outcome/orders/place", post(routes::orders::outcome_place))
        .route("/outcome/orders/{id}", get(routes::orders::outcome_get))
        .route(
            "/outcome/orders/{id}/items",
            post(routes::orders::outcome_add_item),
        )
        .route(
            "/outcome/orders/{id}/submit",
            post(routes::orders::outcome_submit),
        )
        .route("/outcome/orders/{id}/pay", post(routes::orders::outcome_pay))
        .route(
            "/outcome/orders/{id}/ship",
            post(routes::orders::outcome_ship),
        )
        .route(
            "/outcome/orders/{id}/cancel",
            post(routes::orders::outcome_cancel),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state over fresh in-memory repositories.
///
/// Both workflow services share the same repositories, so an order created
/// through one discipline is visible to the other.
pub fn create_default_state() -> Arc<AppState> {
    let customers = InMemoryCustomers::new();
    let products = InMemoryProducts::new();
    let orders = InMemoryOrders::new();

    Arc::new(AppState {
        fault_orders: FaultOrderWorkflow::new(
            customers.clone(),
            products.clone(),
            orders.clone(),
        ),
        outcome_orders: OutcomeOrderWorkflow::new(
            customers.clone(),
            products.clone(),
            orders.clone(),
        ),
        customers,
        products,
    })
}
