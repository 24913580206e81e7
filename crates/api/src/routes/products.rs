//! Product endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::ProductId;
use domain::{Currency, Money, Product};
use repository::ProductRepository;
use serde::{Deserialize, Serialize};

use super::orders::AppState;
use super::parse_id;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub currency: String,
    pub stock: u32,
    pub sku: String,
}

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub currency: String,
    pub stock: u32,
    pub sku: String,
    pub active: bool,
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id().to_string(),
            name: product.name().to_string(),
            description: product.description().to_string(),
            price_cents: product.price().cents(),
            currency: product.price().currency().to_string(),
            stock: product.stock(),
            sku: product.sku().to_string(),
            active: product.is_active(),
        }
    }
}

/// POST /products — register a product with initial stock.
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let currency = Currency::parse(&req.currency)?;
    let price = Money::new(req.price_cents, currency)?;

    let product = Product::create(req.name, req.description, price, req.stock, req.sku)?;
    state.products.save(product.clone()).await?;

    Ok((StatusCode::CREATED, Json(ProductResponse::from(&product))))
}

/// GET /products/{id} — load a product.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product_id = ProductId::from_uuid(parse_id(&id)?);
    let product = state.products.get(product_id).await?;
    Ok(Json(ProductResponse::from(&product)))
}
