//! Order endpoints, exposed once per error discipline.
//!
//! The `/orders/...` routes drive the fault workflow and the
//! `/outcome/orders/...` routes drive the outcome workflow. Both converge
//! on the same problem-details rendering, which is the point of the demo.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::{CustomerId, OrderId, ProductId};
use domain::{Currency, Money, Order};
use repository::{InMemoryCustomers, InMemoryOrders, InMemoryProducts};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use workflow::{FaultOrderWorkflow, OutcomeOrderWorkflow};

use super::parse_id;
use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub fault_orders: FaultOrderWorkflow<InMemoryCustomers, InMemoryProducts, InMemoryOrders>,
    pub outcome_orders: OutcomeOrderWorkflow<InMemoryCustomers, InMemoryProducts, InMemoryOrders>,
    pub customers: InMemoryCustomers,
    pub products: InMemoryProducts,
}

// -- Request types --

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: Uuid,
    pub currency: String,
    pub shipping_address: String,
}

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: Uuid,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub amount_cents: i64,
    pub currency: String,
}

#[derive(Debug, Deserialize)]
pub struct CancelRequest {
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub customer_id: Uuid,
    pub currency: String,
    pub shipping_address: String,
    pub items: Vec<AddItemRequest>,
    pub payment_cents: i64,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub customer_id: String,
    pub status: String,
    pub items: Vec<OrderItemResponse>,
    pub total_cents: i64,
    pub currency: String,
    pub shipping_address: String,
    pub shipped_at: Option<String>,
}

#[derive(Serialize)]
pub struct OrderItemResponse {
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id().to_string(),
            customer_id: order.customer_id().to_string(),
            status: order.status().to_string(),
            items: order
                .items()
                .iter()
                .map(|item| OrderItemResponse {
                    product_id: item.product_id.to_string(),
                    product_name: item.product_name.clone(),
                    quantity: item.quantity,
                    unit_price_cents: item.unit_price.cents(),
                })
                .collect(),
            total_cents: order.total_amount().cents(),
            currency: order.currency().to_string(),
            shipping_address: order.shipping_address().to_string(),
            shipped_at: order.shipped_at().map(|t| t.to_rfc3339()),
        }
    }
}

fn payment_from(req: &PaymentRequest) -> Result<Money, ApiError> {
    let currency = Currency::parse(&req.currency).map_err(ApiError::Fault)?;
    Money::new(req.amount_cents, currency).map_err(ApiError::Fault)
}

// -- Fault-discipline handlers --

/// POST /orders — create a pending order.
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let currency = Currency::parse(&req.currency)?;
    let order = state
        .fault_orders
        .create_order(
            CustomerId::from_uuid(req.customer_id),
            currency,
            &req.shipping_address,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(OrderResponse::from(&order))))
}

/// GET /orders/{id} — load an order.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = OrderId::from_uuid(parse_id(&id)?);
    let order = state.fault_orders.get_order(order_id).await?;
    Ok(Json(OrderResponse::from(&order)))
}

/// POST /orders/{id}/items — reserve stock and add a line.
#[tracing::instrument(skip(state, req))]
pub async fn add_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = OrderId::from_uuid(parse_id(&id)?);
    let order = state
        .fault_orders
        .add_item(order_id, ProductId::from_uuid(req.product_id), req.quantity)
        .await?;
    Ok(Json(OrderResponse::from(&order)))
}

/// POST /orders/{id}/submit — submit the order, debiting credit.
#[tracing::instrument(skip(state))]
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = OrderId::from_uuid(parse_id(&id)?);
    let order = state.fault_orders.submit_order(order_id).await?;
    Ok(Json(OrderResponse::from(&order)))
}

/// POST /orders/{id}/pay — approve against a payment.
#[tracing::instrument(skip(state, req))]
pub async fn pay(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<PaymentRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = OrderId::from_uuid(parse_id(&id)?);
    let payment = payment_from(&req)?;
    let order = state.fault_orders.process_payment(order_id, payment).await?;
    Ok(Json(OrderResponse::from(&order)))
}

/// POST /orders/{id}/ship — ship an approved order.
#[tracing::instrument(skip(state))]
pub async fn ship(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = OrderId::from_uuid(parse_id(&id)?);
    let order = state.fault_orders.ship_order(order_id).await?;
    Ok(Json(OrderResponse::from(&order)))
}

/// POST /orders/{id}/cancel — cancel, restoring credit and stock.
#[tracing::instrument(skip(state, req))]
pub async fn cancel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<CancelRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = OrderId::from_uuid(parse_id(&id)?);
    let order = state.fault_orders.cancel_order(order_id, &req.reason).await?;
    Ok(Json(OrderResponse::from(&order)))
}

/// POST /orders/place — run the whole lifecycle in one call.
#[tracing::instrument(skip(state, req))]
pub async fn place(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let currency = Currency::parse(&req.currency)?;
    let payment = Money::new(req.payment_cents, currency)?;
    let items = req
        .items
        .iter()
        .map(|item| (ProductId::from_uuid(item.product_id), item.quantity))
        .collect();

    let order = state
        .fault_orders
        .place_order(
            CustomerId::from_uuid(req.customer_id),
            currency,
            &req.shipping_address,
            items,
            payment,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(OrderResponse::from(&order))))
}

// -- Outcome-discipline handlers --

/// POST /outcome/orders — create a pending order.
#[tracing::instrument(skip(state, req))]
pub async fn outcome_create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let currency = Currency::try_parse(&req.currency)
        .into_result()
        .map_err(ApiError::Outcome)?;
    let order = state
        .outcome_orders
        .create_order(
            CustomerId::from_uuid(req.customer_id),
            currency,
            &req.shipping_address,
        )
        .await
        .into_result()
        .map_err(ApiError::Outcome)?;
    Ok((StatusCode::CREATED, Json(OrderResponse::from(&order))))
}

/// GET /outcome/orders/{id} — load an order.
#[tracing::instrument(skip(state))]
pub async fn outcome_get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = OrderId::from_uuid(parse_id(&id)?);
    let order = state
        .outcome_orders
        .get_order(order_id)
        .await
        .into_result()
        .map_err(ApiError::Outcome)?;
    Ok(Json(OrderResponse::from(&order)))
}

/// POST /outcome/orders/{id}/items — reserve stock and add a line.
#[tracing::instrument(skip(state, req))]
pub async fn outcome_add_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = OrderId::from_uuid(parse_id(&id)?);
    let order = state
        .outcome_orders
        .add_item(order_id, ProductId::from_uuid(req.product_id), req.quantity)
        .await
        .into_result()
        .map_err(ApiError::Outcome)?;
    Ok(Json(OrderResponse::from(&order)))
}

/// POST /outcome/orders/{id}/submit — submit the order, debiting credit.
#[tracing::instrument(skip(state))]
pub async fn outcome_submit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = OrderId::from_uuid(parse_id(&id)?);
    let order = state
        .outcome_orders
        .submit_order(order_id)
        .await
        .into_result()
        .map_err(ApiError::Outcome)?;
    Ok(Json(OrderResponse::from(&order)))
}

/// POST /outcome/orders/{id}/pay — approve against a payment.
#[tracing::instrument(skip(state, req))]
pub async fn outcome_pay(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<PaymentRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = OrderId::from_uuid(parse_id(&id)?);
    let currency = Currency::try_parse(&req.currency)
        .into_result()
        .map_err(ApiError::Outcome)?;
    let payment = Money::try_new(req.amount_cents, currency)
        .into_result()
        .map_err(ApiError::Outcome)?;
    let order = state
        .outcome_orders
        .process_payment(order_id, payment)
        .await
        .into_result()
        .map_err(ApiError::Outcome)?;
    Ok(Json(OrderResponse::from(&order)))
}

/// POST /outcome/orders/{id}/ship — ship an approved order.
#[tracing::instrument(skip(state))]
pub async fn outcome_ship(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = OrderId::from_uuid(parse_id(&id)?);
    let order = state
        .outcome_orders
        .ship_order(order_id)
        .await
        .into_result()
        .map_err(ApiError::Outcome)?;
    Ok(Json(OrderResponse::from(&order)))
}

/// POST /outcome/orders/{id}/cancel — cancel, restoring credit and stock.
#[tracing::instrument(skip(state, req))]
pub async fn outcome_cancel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<CancelRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = OrderId::from_uuid(parse_id(&id)?);
    let order = state
        .outcome_orders
        .cancel_order(order_id, &req.reason)
        .await
        .into_result()
        .map_err(ApiError::Outcome)?;
    Ok(Json(OrderResponse::from(&order)))
}

/// POST /outcome/orders/place — the whole lifecycle as one bind chain.
#[tracing::instrument(skip(state, req))]
pub async fn outcome_place(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let currency = Currency::try_parse(&req.currency)
        .into_result()
        .map_err(ApiError::Outcome)?;
    let payment = Money::try_new(req.payment_cents, currency)
        .into_result()
        .map_err(ApiError::Outcome)?;
    let items = req
        .items
        .iter()
        .map(|item| (ProductId::from_uuid(item.product_id), item.quantity))
        .collect();

    let order = state
        .outcome_orders
        .place_order(
            CustomerId::from_uuid(req.customer_id),
            currency,
            &req.shipping_address,
            items,
            payment,
        )
        .await
        .into_result()
        .map_err(ApiError::Outcome)?;
    Ok((StatusCode::CREATED, Json(OrderResponse::from(&order))))
}
