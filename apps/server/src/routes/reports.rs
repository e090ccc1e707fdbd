//! # Report Resource
//!
//! `POST /report` generates a report document and returns the URL it can be
//! fetched from; `GET /reports/{filename}` serves the generated files.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use sklad_core::{parse_timestamp, CoreError, InvoiceItemView, InvoiceType};
use sklad_db::Database;

use crate::error::ApiError;
use crate::report::{
    periodical_document, stock_document, write_document, InvoiceBlock, ItemLine, ProductLine,
    ReportDocument,
};
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct ReportRequest {
    /// `"sale"`, `"income"` or `"product"`.
    pub report_type: String,
    /// Period start (sale/income reports).
    #[serde(default)]
    pub start_time: Option<String>,
    /// Period end (sale/income reports).
    #[serde(default)]
    pub end_time: Option<String>,
    /// Snapshot date (product report).
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportResponse {
    pub url: String,
}

pub async fn create_report(
    State(state): State<AppState>,
    Json(request): Json<ReportRequest>,
) -> Result<Json<ReportResponse>, ApiError> {
    let document = match request.report_type.as_str() {
        "product" => {
            let date = parse_required_time(request.date.as_deref(), "date")?;
            build_stock_report(&state.db, date).await?
        }
        other => {
            let kind: InvoiceType = other.parse().map_err(ApiError::from)?;
            let start = parse_required_time(request.start_time.as_deref(), "start_time")?;
            let end = parse_required_time(request.end_time.as_deref(), "end_time")?;
            build_periodical_report(&state.db, kind, start, end).await?
        }
    };

    let path = write_document(&state.reports_dir, &document)
        .map_err(|e| ApiError::internal(format!("Failed to write report: {e}")))?;

    info!(path = %path.display(), "Report generated");

    Ok(Json(ReportResponse {
        url: format!("/reports/{}", document.filename),
    }))
}

pub async fn get_report_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    // Serve only plain filenames from the reports directory.
    if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
        return Err(ApiError::validation("Invalid report filename"));
    }

    let path = state.reports_dir.join(&filename);
    let content = tokio::fs::read_to_string(&path)
        .await
        .map_err(|_| ApiError::new(crate::error::ErrorCode::NotFound, "Report not found"))?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        content,
    ))
}

fn parse_required_time(raw: Option<&str>, field: &str) -> Result<DateTime<Utc>, ApiError> {
    let raw = raw.ok_or_else(|| ApiError::validation(format!("{field} is required")))?;
    parse_timestamp(raw)
        .map_err(CoreError::from)
        .map_err(ApiError::from)
}

/// Product id -> name lookup used to resolve item lines.
async fn product_names(db: &Database) -> Result<HashMap<i64, String>, ApiError> {
    let products = db.products().list().await?;
    Ok(products.into_iter().map(|p| (p.id, p.name)).collect())
}

fn item_line<I: InvoiceItemView>(item: &I, names: &HashMap<i64, String>) -> ItemLine {
    ItemLine {
        product_name: names
            .get(&item.product_id())
            .cloned()
            .unwrap_or_else(|| format!("#{}", item.product_id())),
        total_price: item.total_price(),
        quantity: item.quantity(),
        arrival_date: item.arrival_date(),
    }
}

async fn build_periodical_report(
    db: &Database,
    kind: InvoiceType,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<ReportDocument, ApiError> {
    let names = product_names(db).await?;
    let invoices = db.invoices();

    let mut blocks = Vec::new();
    match kind {
        InvoiceType::Sale => {
            for invoice in invoices.sale_between(start, end).await? {
                let items = invoices.sale_items(invoice.id).await?;
                blocks.push(InvoiceBlock {
                    id: invoice.id,
                    date: invoice.date,
                    items: items.iter().map(|i| item_line(i, &names)).collect(),
                });
            }
        }
        InvoiceType::Income => {
            for invoice in invoices.income_between(start, end).await? {
                let items = invoices.income_items(invoice.id).await?;
                blocks.push(InvoiceBlock {
                    id: invoice.id,
                    date: invoice.date,
                    items: items.iter().map(|i| item_line(i, &names)).collect(),
                });
            }
        }
    }

    Ok(periodical_document(kind, start, end, &blocks))
}

async fn build_stock_report(
    db: &Database,
    date: DateTime<Utc>,
) -> Result<ReportDocument, ApiError> {
    let products = db.products().list().await?;

    let mut lines = Vec::with_capacity(products.len());
    for product in products {
        let current_quantity = db.products().quantity(product.id).await?;
        let date_quantity = db.invoices().quantity_on_date(product.id, date).await?;

        lines.push(ProductLine {
            name: product.name,
            current_quantity,
            date_quantity,
            cost_price: product.cost_price,
        });
    }

    Ok(stock_document(date, &lines))
}
