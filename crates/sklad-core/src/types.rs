//! # Domain Types
//!
//! Persistent entities of the ledger and the small pure helpers around them.
//!
//! ## Entity Relationships
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Product 1 ──── * Consignment * ──── 1 IncomeInvoiceItem           │
//! │     │                                        │                      │
//! │     │                                        * belongs to           │
//! │     ├── * SaleInvoiceItem ── * ── 1 SaleInvoice                    │
//! │     │                                        │                      │
//! │     └──────────────────────────── 1 IncomeInvoice                  │
//! │                                                                     │
//! │  Every income item owns exactly one consignment (the batch that    │
//! │  arrival created). Sale items never own consignments - they        │
//! │  consume them through the write-off algorithm.                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Derived figures (product stock, invoice totals) are computed by explicit
//! functions - either pure helpers here or aggregate queries in sklad-db -
//! never by live attributes on the entities.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, ParseError};
use crate::money::Money;

/// Timestamp format used on the wire (JSON requests and report arguments).
pub const WIRE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Parses a wire timestamp, e.g. `2026-03-01T12:00:00.000Z`.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, ParseError> {
    NaiveDateTime::parse_from_str(input, WIRE_TIME_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| ParseError::Timestamp(input.to_string()))
}

// =============================================================================
// Invoice Type
// =============================================================================

/// The two invoice kinds. This is the explicit tag that selects item parsing
/// and creation behavior - callers always name the kind, nothing is inferred
/// from payload shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceType {
    /// Incoming goods: creates one consignment per item.
    Income,
    /// Sale: consumes consignments through the write-off algorithm.
    Sale,
}

impl InvoiceType {
    /// Stable lowercase name, matching the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceType::Income => "income",
            InvoiceType::Sale => "sale",
        }
    }
}

impl FromStr for InvoiceType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(InvoiceType::Income),
            "sale" => Ok(InvoiceType::Sale),
            other => Err(CoreError::UnknownInvoiceType(other.to_string())),
        }
    }
}

impl fmt::Display for InvoiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product tracked by the ledger.
///
/// Stock is never stored on the product row: the current quantity is the sum
/// of `current_quantity` over the product's consignments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Cost price in minor units.
    pub cost_price: i64,
}

impl Product {
    /// Returns the cost price as a Money value.
    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_minor_units(self.cost_price)
    }
}

// =============================================================================
// Consignment
// =============================================================================

/// A batch of stock received in one income-invoice item.
///
/// Invariants, maintained by the write-off algorithm:
/// - `0 <= current_quantity <= quantity`
/// - `depreciated == (current_quantity == 0)` after every write-off
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Consignment {
    pub id: i64,
    /// Sequential per product, starting at 1 in arrival order.
    pub consignment_number: i64,
    pub arrival_date: DateTime<Utc>,
    pub product_id: i64,
    /// The income-invoice item this arrival came from (1:1).
    pub income_invoice_item_id: i64,
    /// Originally received quantity.
    pub quantity: i64,
    /// Remaining quantity; monotonically non-increasing.
    pub current_quantity: i64,
    pub depreciated: bool,
    /// Total price of the batch in minor units.
    pub total_price: i64,
}

// =============================================================================
// Invoices
// =============================================================================

/// An incoming-goods invoice. Items and their consignments are created with
/// it in one transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct IncomeInvoice {
    pub id: i64,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct IncomeInvoiceItem {
    pub id: i64,
    pub invoice_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub arrival_date: DateTime<Utc>,
    /// Total price in minor units.
    pub total_price: i64,
}

/// A sale invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleInvoice {
    pub id: i64,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleInvoiceItem {
    pub id: i64,
    pub invoice_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    /// Total price in minor units.
    pub total_price: i64,
}

/// Common read view over the two item kinds, used by invoice totals, the
/// HTTP responses and report formatting.
pub trait InvoiceItemView {
    fn id(&self) -> i64;
    fn invoice_id(&self) -> i64;
    fn product_id(&self) -> i64;
    fn quantity(&self) -> i64;
    /// Total price in minor units.
    fn total_price(&self) -> i64;
    /// Arrival date; present on income items only.
    fn arrival_date(&self) -> Option<DateTime<Utc>> {
        None
    }
}

impl InvoiceItemView for IncomeInvoiceItem {
    fn id(&self) -> i64 {
        self.id
    }

    fn invoice_id(&self) -> i64 {
        self.invoice_id
    }

    fn product_id(&self) -> i64 {
        self.product_id
    }

    fn quantity(&self) -> i64 {
        self.quantity
    }

    fn total_price(&self) -> i64 {
        self.total_price
    }

    fn arrival_date(&self) -> Option<DateTime<Utc>> {
        Some(self.arrival_date)
    }
}

impl InvoiceItemView for SaleInvoiceItem {
    fn id(&self) -> i64 {
        self.id
    }

    fn invoice_id(&self) -> i64 {
        self.invoice_id
    }

    fn product_id(&self) -> i64 {
        self.product_id
    }

    fn quantity(&self) -> i64 {
        self.quantity
    }

    fn total_price(&self) -> i64 {
        self.total_price
    }
}

/// Sum of item total prices in minor units - the derived invoice total.
pub fn invoice_total_price<I: InvoiceItemView>(items: &[I]) -> i64 {
    items.iter().map(|item| item.total_price()).sum()
}

// =============================================================================
// Parsed Item Input
// =============================================================================

/// An invoice item parsed from the wire and resolved against the store, ready
/// for invoice creation. The invoice kind decides whether `arrival_date` is
/// populated (income) or absent (sale).
#[derive(Debug, Clone)]
pub struct NewInvoiceItem {
    pub product_id: i64,
    pub quantity: i64,
    pub total_price: Money,
    pub arrival_date: Option<DateTime<Utc>>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp() {
        let ts = parse_timestamp("2026-03-01T12:30:45.000Z").unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-03-01T12:30:45+00:00");

        assert!(parse_timestamp("2026-03-01").is_err());
        assert!(parse_timestamp("not a date").is_err());
    }

    #[test]
    fn test_invoice_type_from_str() {
        assert_eq!("income".parse::<InvoiceType>().unwrap(), InvoiceType::Income);
        assert_eq!("sale".parse::<InvoiceType>().unwrap(), InvoiceType::Sale);

        let err = "transfer".parse::<InvoiceType>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownInvoiceType(_)));
    }

    #[test]
    fn test_invoice_type_wire_representation() {
        assert_eq!(
            serde_json::to_value(InvoiceType::Income).unwrap(),
            serde_json::json!("income")
        );
        let kind: InvoiceType = serde_json::from_value(serde_json::json!("sale")).unwrap();
        assert_eq!(kind, InvoiceType::Sale);
    }

    #[test]
    fn test_invoice_total_price() {
        let items = vec![
            SaleInvoiceItem {
                id: 1,
                invoice_id: 1,
                product_id: 1,
                quantity: 2,
                total_price: 1000,
            },
            SaleInvoiceItem {
                id: 2,
                invoice_id: 1,
                product_id: 2,
                quantity: 1,
                total_price: 250,
            },
        ];
        assert_eq!(invoice_total_price(&items), 1250);
    }
}
