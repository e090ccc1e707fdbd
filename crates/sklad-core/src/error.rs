//! # Error Types
//!
//! Domain-specific error types for sklad-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  sklad-core errors (this file)                                      │
//! │  ├── CoreError   - Business rule violations                         │
//! │  └── ParseError  - Malformed money / timestamp strings              │
//! │                                                                     │
//! │  sklad-db errors (separate crate)                                   │
//! │  └── DbError     - Database operation failures                      │
//! │                                                                     │
//! │  server errors (in app)                                             │
//! │  └── ApiError    - What HTTP clients see (status + message)         │
//! │                                                                     │
//! │  Flow: ParseError → CoreError → DbError → ApiError → client         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every failure aborts the enclosing store transaction; there is no retry
//! or partial-success path anywhere in the core.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent business rule violations raised by invoice creation and
/// item parsing. They should be caught at the boundary and translated to
/// user-facing responses.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found by id.
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// Requested sale quantity exceeds the product's current stock.
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: i64,
        available: i64,
        requested: i64,
    },

    /// An invoice must carry at least one item.
    #[error("Invoice must contain at least one item")]
    EmptyInvoice,

    /// The invoice type string did not name a known type.
    #[error("Unknown invoice type: {0}")]
    UnknownInvoiceType(String),

    /// An income item arrived without its arrival date.
    #[error("Income invoice item requires an arrival_date")]
    MissingArrivalDate,

    /// A sale item carried an arrival date it has no use for.
    #[error("Sale invoice item must not carry an arrival_date")]
    UnexpectedArrivalDate,

    /// Item quantity must be positive.
    #[error("Item quantity must be positive, got {0}")]
    NonPositiveQuantity(i64),

    /// Parsing error (wraps ParseError).
    #[error(transparent)]
    Parse(#[from] ParseError),
}

// =============================================================================
// Parse Error
// =============================================================================

/// Errors raised where text crosses into the domain (JSON input, report
/// arguments).
#[derive(Debug, Error)]
pub enum ParseError {
    /// Money string was malformed (no decimal point, or non-numeric parts).
    #[error("Malformed money string '{input}': {reason}")]
    Money { input: String, reason: String },

    /// Timestamp string did not match the wire format.
    #[error("Malformed timestamp '{0}'")]
    Timestamp(String),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product_id: 7,
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for product 7: available 3, requested 5"
        );

        assert_eq!(
            CoreError::EmptyInvoice.to_string(),
            "Invoice must contain at least one item"
        );
    }

    #[test]
    fn test_parse_converts_to_core_error() {
        let parse_err = ParseError::Timestamp("not-a-date".to_string());
        let core_err: CoreError = parse_err.into();
        assert!(matches!(core_err, CoreError::Parse(_)));
    }
}
