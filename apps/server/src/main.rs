//! # Sklad Server
//!
//! Entry point: config, logging, database, router.

mod config;
mod error;
mod report;
mod routes;
mod state;

use axum::routing::{get, post};
use axum::Router;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sklad_core::InvoiceType;
use sklad_db::{Database, DbConfig};

use crate::config::ServerConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("sklad_server=info,sklad_db=info")),
        )
        .init();

    let config = ServerConfig::load()?;

    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    std::fs::create_dir_all(&config.reports_dir)?;

    let state = AppState {
        db,
        reports_dir: config.reports_dir.clone(),
    };

    let router = Router::new()
        .route("/healthz", get(healthz))
        .nest("/products", routes::products::router())
        .nest("/consignments", routes::consignments::router())
        .nest("/sale_invoices", routes::invoices::router(InvoiceType::Sale))
        .nest(
            "/income_invoices",
            routes::invoices::router(InvoiceType::Income),
        )
        .route("/report", post(routes::reports::create_report))
        .route("/reports/{filename}", get(routes::reports::get_report_file))
        .with_state(state);

    info!("sklad server listening on {}", config.http_addr);
    let listener = tokio::net::TcpListener::bind(config.http_addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}
