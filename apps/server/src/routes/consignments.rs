//! # Consignment Resource
//!
//! Read-only: consignments come into existence through income invoices and
//! are depleted by the write-off algorithm, never edited directly.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use sklad_core::{Consignment, Money};

use crate::error::ApiError;
use crate::routes::total_count_headers;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct ConsignmentResponse {
    pub id: i64,
    pub consignment_number: i64,
    pub arrival_date: DateTime<Utc>,
    pub product_id: i64,
    pub quantity: i64,
    pub current_quantity: i64,
    pub depreciated: bool,
    /// Formatted money string.
    pub total_price: String,
}

impl From<Consignment> for ConsignmentResponse {
    fn from(c: Consignment) -> Self {
        ConsignmentResponse {
            id: c.id,
            consignment_number: c.consignment_number,
            arrival_date: c.arrival_date,
            product_id: c.product_id,
            quantity: c.quantity,
            current_quantity: c.current_quantity,
            depreciated: c.depreciated,
            total_price: Money::format_price(c.total_price),
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_consignments))
}

async fn list_consignments(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let repo = state.db.consignments();
    let consignments = repo.list().await?;
    let count = repo.count().await?;

    let responses: Vec<ConsignmentResponse> = consignments
        .into_iter()
        .map(ConsignmentResponse::from)
        .collect();

    Ok((total_count_headers(count), Json(responses)))
}
