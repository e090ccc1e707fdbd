//! # Product Resource

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::debug;

use sklad_core::{CoreError, Money, Product};
use sklad_db::Database;

use crate::error::ApiError;
use crate::routes::total_count_headers;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    /// Derived stock: sum of remaining consignment quantities.
    pub quantity: i64,
    /// Formatted money string.
    pub cost_price: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductPayload {
    pub name: String,
    /// Money display string, e.g. `"50.00"`.
    pub cost_price: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

async fn response_for(db: &Database, product: Product) -> Result<ProductResponse, ApiError> {
    let quantity = db.products().quantity(product.id).await?;
    Ok(ProductResponse {
        id: product.id,
        name: product.name,
        quantity,
        cost_price: Money::format_price(product.cost_price),
    })
}

async fn list_products(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let repo = state.db.products();
    let products = repo.list().await?;
    let count = repo.count().await?;

    let mut responses = Vec::with_capacity(products.len());
    for product in products {
        responses.push(response_for(&state.db, product).await?);
    }

    Ok((total_count_headers(count), Json(responses)))
}

async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    debug!(name = %payload.name, "create_product");

    let cost = Money::from_string(&payload.cost_price).map_err(CoreError::from)?;
    let product = state
        .db
        .products()
        .insert(&payload.name, cost.minor_units())
        .await?;

    let response = response_for(&state.db, product).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state
        .db
        .products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", id))?;

    Ok(Json(response_for(&state.db, product).await?))
}

async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<ProductResponse>, ApiError> {
    debug!(id = %id, "update_product");

    let cost = Money::from_string(&payload.cost_price).map_err(CoreError::from)?;
    state
        .db
        .products()
        .update(id, &payload.name, cost.minor_units())
        .await?;

    let quantity = state.db.products().quantity(id).await?;
    Ok(Json(ProductResponse {
        id,
        name: payload.name,
        quantity,
        cost_price: Money::format_price(cost.minor_units()),
    }))
}

async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<i64>, ApiError> {
    debug!(id = %id, "delete_product");

    state.db.products().delete(id).await?;
    Ok(Json(id))
}
