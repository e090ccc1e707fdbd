//! # Invoice Resource
//!
//! One generic resource serves both invoice kinds: the router is built per
//! [`InvoiceType`] and every handler closes over that tag. The mounting path
//! (`/sale_invoices`, `/income_invoices`) is the explicit type selector -
//! nothing is inferred from payload shape.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use sklad_core::{
    invoice_total_price, parse_timestamp, CoreError, InvoiceItemView, InvoiceType, Money,
};
use sklad_db::{Database, ItemPayload};

use crate::error::ApiError;
use crate::routes::total_count_headers;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceItemResponse {
    pub id: i64,
    pub invoice_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    /// Formatted money string.
    pub total_price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceResponse {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub items: Vec<InvoiceItemResponse>,
    /// Derived total: sum of item prices, formatted.
    pub total_price: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvoiceRequest {
    /// Wire timestamp.
    pub date: String,
    pub items: Vec<ItemPayload>,
}

/// Builds the invoice resource router for one kind.
pub fn router(kind: InvoiceType) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(move |state: State<AppState>| list_invoices(state, kind)).post(
                move |state: State<AppState>, body: Json<CreateInvoiceRequest>| {
                    create_invoice(state, kind, body)
                },
            ),
        )
        .route(
            "/{id}",
            get(move |state: State<AppState>, path: Path<i64>| get_invoice(state, kind, path))
                .delete(move |state: State<AppState>, path: Path<i64>| {
                    delete_invoice(state, kind, path)
                }),
        )
        .route(
            "/items/{id}",
            delete(move |state: State<AppState>, path: Path<i64>| delete_item(state, kind, path)),
        )
}

fn item_response<I: InvoiceItemView>(item: &I) -> InvoiceItemResponse {
    InvoiceItemResponse {
        id: item.id(),
        invoice_id: item.invoice_id(),
        product_id: item.product_id(),
        quantity: item.quantity(),
        total_price: Money::format_price(item.total_price()),
        arrival_date: item.arrival_date(),
    }
}

fn invoice_response<I: InvoiceItemView>(
    id: i64,
    date: DateTime<Utc>,
    items: &[I],
) -> InvoiceResponse {
    InvoiceResponse {
        id,
        date,
        total_price: Money::format_price(invoice_total_price(items)),
        items: items.iter().map(item_response).collect(),
    }
}

async fn fetch_response(
    db: &Database,
    kind: InvoiceType,
    id: i64,
) -> Result<InvoiceResponse, ApiError> {
    let invoices = db.invoices();

    match kind {
        InvoiceType::Sale => {
            let invoice = invoices
                .get_sale(id)
                .await?
                .ok_or_else(|| ApiError::not_found("Invoice", id))?;
            let items = invoices.sale_items(id).await?;
            Ok(invoice_response(invoice.id, invoice.date, &items))
        }
        InvoiceType::Income => {
            let invoice = invoices
                .get_income(id)
                .await?
                .ok_or_else(|| ApiError::not_found("Invoice", id))?;
            let items = invoices.income_items(id).await?;
            Ok(invoice_response(invoice.id, invoice.date, &items))
        }
    }
}

async fn list_invoices(
    State(state): State<AppState>,
    kind: InvoiceType,
) -> Result<impl IntoResponse, ApiError> {
    let invoices = state.db.invoices();
    let count = invoices.count(kind).await?;

    let mut responses = Vec::new();
    match kind {
        InvoiceType::Sale => {
            for invoice in invoices.list_sale().await? {
                let items = invoices.sale_items(invoice.id).await?;
                responses.push(invoice_response(invoice.id, invoice.date, &items));
            }
        }
        InvoiceType::Income => {
            for invoice in invoices.list_income().await? {
                let items = invoices.income_items(invoice.id).await?;
                responses.push(invoice_response(invoice.id, invoice.date, &items));
            }
        }
    }

    Ok((total_count_headers(count), Json(responses)))
}

async fn create_invoice(
    State(state): State<AppState>,
    kind: InvoiceType,
    Json(request): Json<CreateInvoiceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    debug!(kind = %kind, items = request.items.len(), "create_invoice");

    let date = parse_timestamp(&request.date).map_err(CoreError::from)?;

    let controller = state.db.controller();
    let mut items = Vec::with_capacity(request.items.len());
    for payload in &request.items {
        items.push(controller.parse_item(kind, payload).await?);
    }

    let invoice_id = controller.create_invoice(kind, date, &items).await?;

    let response = fetch_response(&state.db, kind, invoice_id).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_invoice(
    State(state): State<AppState>,
    kind: InvoiceType,
    Path(id): Path<i64>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    Ok(Json(fetch_response(&state.db, kind, id).await?))
}

async fn delete_invoice(
    State(state): State<AppState>,
    kind: InvoiceType,
    Path(id): Path<i64>,
) -> Result<Json<i64>, ApiError> {
    debug!(kind = %kind, id = %id, "delete_invoice");

    state.db.invoices().delete(kind, id).await?;
    Ok(Json(id))
}

async fn delete_item(
    State(state): State<AppState>,
    kind: InvoiceType,
    Path(id): Path<i64>,
) -> Result<Json<i64>, ApiError> {
    debug!(kind = %kind, item_id = %id, "delete_invoice_item");

    state.db.invoices().delete_item(kind, id).await?;
    Ok(Json(id))
}
