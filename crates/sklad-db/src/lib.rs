//! # sklad-db: SQLite Storage for the Sklad Ledger
//!
//! This crate owns every database operation: the connection pool, the
//! embedded schema migrations, per-entity repositories, and the business
//! controller that wraps each invoice operation in one transaction.
//!
//! ## Layering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          sklad-db                                   │
//! │                                                                     │
//! │  Database (pool.rs)                                                 │
//! │    ├── ProductRepository      product CRUD + stock aggregate        │
//! │    ├── ConsignmentRepository  consignment listings                  │
//! │    ├── InvoiceRepository      invoice/item reads, deletes,          │
//! │    │                          quantity_on_date                      │
//! │    └── Controller             create_invoice: parse, validate,      │
//! │                               write off, persist - ONE transaction  │
//! │                                                                     │
//! │  Business rules come from sklad-core; this crate gives them their   │
//! │  atomicity boundary.                                                │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

pub mod controller;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use controller::{Controller, ItemPayload};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
