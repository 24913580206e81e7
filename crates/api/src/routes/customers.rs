//! Customer endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::CustomerId;
use domain::{Currency, Customer, Email, Money};
use repository::CustomerRepository;
use serde::{Deserialize, Serialize};

use super::orders::AppState;
use super::parse_id;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub email: String,
    pub credit_limit_cents: i64,
    pub currency: String,
}

#[derive(Serialize)]
pub struct CustomerResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub credit_limit_cents: i64,
    pub available_credit_cents: i64,
    pub currency: String,
    pub status: String,
    pub version: u64,
}

impl From<&Customer> for CustomerResponse {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id().to_string(),
            name: customer.name().to_string(),
            email: customer.email().to_string(),
            credit_limit_cents: customer.credit_limit().cents(),
            available_credit_cents: customer.available_credit().cents(),
            currency: customer.credit_limit().currency().to_string(),
            status: customer.status().to_string(),
            version: customer.version(),
        }
    }
}

/// POST /customers — register a customer with a credit limit.
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerResponse>), ApiError> {
    let currency = Currency::parse(&req.currency)?;
    let credit_limit = Money::new(req.credit_limit_cents, currency)?;
    let email = Email::parse(&req.email)?;

    let customer = Customer::create(req.name, email, credit_limit)?;
    state.customers.save(customer.clone()).await?;

    Ok((StatusCode::CREATED, Json(CustomerResponse::from(&customer))))
}

/// GET /customers/{id} — load a customer.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let customer_id = CustomerId::from_uuid(parse_id(&id)?);
    let customer = state.customers.get(customer_id).await?;
    Ok(Json(CustomerResponse::from(&customer)))
}
