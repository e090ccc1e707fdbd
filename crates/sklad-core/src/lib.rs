//! # sklad-core: Pure Business Logic for Sklad
//!
//! This crate is the **heart** of the ledger. It contains the accounting
//! rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Sklad Architecture                            │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐ │
//! │  │                   HTTP Resources (axum)                       │ │
//! │  │   /products  /consignments  /sale_invoices  /report           │ │
//! │  └───────────────────────────────┬───────────────────────────────┘ │
//! │                                  │                                  │
//! │  ┌───────────────────────────────▼───────────────────────────────┐ │
//! │  │             ★ sklad-core (THIS CRATE) ★                       │ │
//! │  │                                                               │ │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────┐     │ │
//! │  │   │  types   │  │  money   │  │ writeoff │  │  error   │     │ │
//! │  │   │ Product  │  │  Money   │  │   FIFO   │  │  typed   │     │ │
//! │  │   │ Invoices │  │  ₴ i64   │  │ deplete  │  │  errors  │     │ │
//! │  │   └──────────┘  └──────────┘  └──────────┘  └──────────┘     │ │
//! │  │                                                               │ │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS          │ │
//! │  └───────────────────────────────┬───────────────────────────────┘ │
//! │                                  │                                  │
//! │  ┌───────────────────────────────▼───────────────────────────────┐ │
//! │  │                 sklad-db (Database Layer)                     │ │
//! │  │       SQLite queries, migrations, transactional controller    │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Persistent entities (Product, Consignment, invoices)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`writeoff`] - FIFO consignment write-off algorithm
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are minor units (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod types;
pub mod writeoff;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ParseError};
pub use money::Money;
pub use types::*;
pub use writeoff::{stock_total, write_off};
