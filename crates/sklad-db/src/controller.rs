//! # Business Controller
//!
//! Invoice creation orchestration: item parsing, stock validation, the
//! write-off, and persistence - every operation inside ONE transaction.
//!
//! ## Transaction Boundary
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  create_sale_invoice(date, items)                                   │
//! │                                                                     │
//! │  BEGIN ─────────────────────────────────────────────────┐           │
//! │    INSERT sale invoice                                  │           │
//! │    for each item:                                       │           │
//! │      load product consignments (arrival order)          │ one       │
//! │      stock check ── fails? ──► drop tx ──► ROLLBACK     │ atomic    │
//! │      write_off(consignments, quantity)                  │ unit      │
//! │      UPDATE touched consignments                        │           │
//! │      INSERT sale item                                   │           │
//! │  COMMIT ────────────────────────────────────────────────┘           │
//! │                                                                     │
//! │  Validation interleaves with mutation per item, so the transaction  │
//! │  wraps the ENTIRE loop: a failure on item N discards the write-offs │
//! │  items 1..N-1 already performed. Later items for the same product   │
//! │  read the consignment rows through the open transaction and see     │
//! │  earlier items' deductions.                                         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store handle is passed in explicitly; the controller holds no global
//! state and no locks beyond the transaction itself.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use crate::repository::consignment::CONSIGNMENT_COLUMNS;
use sklad_core::{
    parse_timestamp, stock_total, write_off, Consignment, CoreError, InvoiceType, Money,
    NewInvoiceItem,
};

// =============================================================================
// Wire Payload
// =============================================================================

/// An invoice item as it arrives in a JSON request. The invoice kind is NOT
/// inferred from this shape - the caller names it explicitly and
/// [`Controller::parse_item`] enforces the matching field set.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemPayload {
    pub product_id: i64,
    pub quantity: i64,
    /// Money display string, e.g. `"50.00"`.
    pub total_price: String,
    /// Wire timestamp; required for income items, rejected for sale items.
    #[serde(default)]
    pub arrival_date: Option<String>,
}

// =============================================================================
// Controller
// =============================================================================

/// The business controller: issues invoices and manages consignments.
#[derive(Debug, Clone)]
pub struct Controller {
    pool: SqlitePool,
}

impl Controller {
    /// Creates a new Controller over the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Controller { pool }
    }

    /// Parses a wire item into a [`NewInvoiceItem`] for the named invoice
    /// kind.
    ///
    /// Income items must carry an `arrival_date`; sale items must not.
    /// The money string is parsed into minor units and the product reference
    /// is resolved against the store.
    pub async fn parse_item(
        &self,
        kind: InvoiceType,
        payload: &ItemPayload,
    ) -> DbResult<NewInvoiceItem> {
        if payload.quantity <= 0 {
            return Err(CoreError::NonPositiveQuantity(payload.quantity).into());
        }

        let total_price = Money::from_string(&payload.total_price).map_err(CoreError::from)?;

        let arrival_date = match (kind, payload.arrival_date.as_deref()) {
            (InvoiceType::Income, Some(raw)) => {
                Some(parse_timestamp(raw).map_err(CoreError::from)?)
            }
            (InvoiceType::Income, None) => return Err(CoreError::MissingArrivalDate.into()),
            (InvoiceType::Sale, Some(_)) => return Err(CoreError::UnexpectedArrivalDate.into()),
            (InvoiceType::Sale, None) => None,
        };

        let exists: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE id = ?1)")
            .bind(payload.product_id)
            .fetch_one(&self.pool)
            .await?;
        if exists == 0 {
            return Err(CoreError::ProductNotFound(payload.product_id).into());
        }

        Ok(NewInvoiceItem {
            product_id: payload.product_id,
            quantity: payload.quantity,
            total_price,
            arrival_date,
        })
    }

    /// Creates a new invoice of the given kind with the given items.
    ///
    /// Fails with a validation error on an empty item list; otherwise
    /// dispatches to the kind-specific creation. Returns the new invoice id.
    pub async fn create_invoice(
        &self,
        kind: InvoiceType,
        date: DateTime<Utc>,
        items: &[NewInvoiceItem],
    ) -> DbResult<i64> {
        if items.is_empty() {
            return Err(CoreError::EmptyInvoice.into());
        }

        match kind {
            InvoiceType::Income => self.create_income_invoice(date, items).await,
            InvoiceType::Sale => self.create_sale_invoice(date, items).await,
        }
    }

    /// Creates a sale invoice, writing the sold quantities off the products'
    /// consignments in arrival order.
    ///
    /// Either every item is validated, written off and persisted, or the
    /// whole transaction is discarded - there is no partial-success mode.
    pub async fn create_sale_invoice(
        &self,
        date: DateTime<Utc>,
        items: &[NewInvoiceItem],
    ) -> DbResult<i64> {
        let mut tx = self.pool.begin().await?;

        let invoice_id = sqlx::query("INSERT INTO sale_invoices (date) VALUES (?1)")
            .bind(date)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

        let select_consignments = format!(
            "SELECT {CONSIGNMENT_COLUMNS} FROM consignments \
             WHERE product_id = ?1 ORDER BY consignment_number"
        );

        for item in items {
            let mut consignments = sqlx::query_as::<_, Consignment>(&select_consignments)
                .bind(item.product_id)
                .fetch_all(&mut *tx)
                .await?;

            let available = stock_total(&consignments);
            if item.quantity > available {
                // Dropping the transaction rolls back everything, including
                // write-offs already applied for earlier items.
                return Err(CoreError::InsufficientStock {
                    product_id: item.product_id,
                    available,
                    requested: item.quantity,
                }
                .into());
            }

            let before: Vec<(i64, bool)> = consignments
                .iter()
                .map(|c| (c.current_quantity, c.depreciated))
                .collect();

            write_off(&mut consignments, item.quantity);

            for (consignment, (prev_quantity, prev_depreciated)) in
                consignments.iter().zip(before)
            {
                if consignment.current_quantity == prev_quantity
                    && consignment.depreciated == prev_depreciated
                {
                    continue;
                }

                debug!(
                    consignment_id = consignment.id,
                    current_quantity = consignment.current_quantity,
                    depreciated = consignment.depreciated,
                    "Writing off consignment"
                );

                sqlx::query(
                    "UPDATE consignments SET current_quantity = ?2, depreciated = ?3 \
                     WHERE id = ?1",
                )
                .bind(consignment.id)
                .bind(consignment.current_quantity)
                .bind(consignment.depreciated)
                .execute(&mut *tx)
                .await?;
            }

            sqlx::query(
                "INSERT INTO sale_invoice_items (invoice_id, product_id, quantity, total_price) \
                 VALUES (?1, ?2, ?3, ?4)",
            )
            .bind(invoice_id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.total_price.minor_units())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(invoice_id, items = items.len(), "Sale invoice created");
        Ok(invoice_id)
    }

    /// Creates an income invoice and one consignment per item.
    ///
    /// Each consignment is numbered `previous per-product max + 1` (1 if the
    /// product has none yet), starts fully available
    /// (`current_quantity = quantity`) and is linked 1:1 to its item. The
    /// UNIQUE(product_id, consignment_number) constraint turns a numbering
    /// race between concurrent writers into an error.
    pub async fn create_income_invoice(
        &self,
        date: DateTime<Utc>,
        items: &[NewInvoiceItem],
    ) -> DbResult<i64> {
        let mut tx = self.pool.begin().await?;

        let invoice_id = sqlx::query("INSERT INTO income_invoices (date) VALUES (?1)")
            .bind(date)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

        for item in items {
            let arrival_date = item.arrival_date.ok_or(CoreError::MissingArrivalDate)?;

            let last_number: Option<i64> = sqlx::query_scalar(
                "SELECT MAX(consignment_number) FROM consignments WHERE product_id = ?1",
            )
            .bind(item.product_id)
            .fetch_one(&mut *tx)
            .await?;
            let consignment_number = last_number.unwrap_or(0) + 1;

            let item_id = sqlx::query(
                "INSERT INTO income_invoice_items \
                 (invoice_id, product_id, quantity, arrival_date, total_price) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(invoice_id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(arrival_date)
            .bind(item.total_price.minor_units())
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

            debug!(
                product_id = item.product_id,
                consignment_number, "Creating consignment"
            );

            sqlx::query(
                "INSERT INTO consignments \
                 (consignment_number, arrival_date, product_id, income_invoice_item_id, \
                  quantity, current_quantity, depreciated, total_price) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5, 0, ?6)",
            )
            .bind(consignment_number)
            .bind(arrival_date)
            .bind(item.product_id)
            .bind(item_id)
            .bind(item.quantity)
            .bind(item.total_price.minor_units())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(invoice_id, items = items.len(), "Income invoice created");
        Ok(invoice_id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use sklad_core::Product;

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn add_product(db: &Database, name: &str) -> Product {
        db.products().insert(name, 5000).await.unwrap()
    }

    fn date(raw: &str) -> DateTime<Utc> {
        parse_timestamp(raw).unwrap()
    }

    fn income_item(product_id: i64, quantity: i64, arrival: &str) -> NewInvoiceItem {
        NewInvoiceItem {
            product_id,
            quantity,
            total_price: Money::from_string("100.00").unwrap(),
            arrival_date: Some(date(arrival)),
        }
    }

    fn sale_item(product_id: i64, quantity: i64) -> NewInvoiceItem {
        NewInvoiceItem {
            product_id,
            quantity,
            total_price: Money::from_string("150.00").unwrap(),
            arrival_date: None,
        }
    }

    #[tokio::test]
    async fn test_empty_invoice_rejected_store_untouched() {
        let db = setup().await;
        let controller = db.controller();

        let err = controller
            .create_invoice(InvoiceType::Sale, date("2026-01-05T10:00:00.000Z"), &[])
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Domain(CoreError::EmptyInvoice)));
        assert_eq!(db.invoices().count(InvoiceType::Sale).await.unwrap(), 0);
        assert_eq!(db.invoices().count(InvoiceType::Income).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_income_invoice_assigns_sequential_consignment_numbers() {
        let db = setup().await;
        let controller = db.controller();
        let product = add_product(&db, "Wheel").await;

        // First income invoice: no prior consignments -> number 1.
        controller
            .create_invoice(
                InvoiceType::Income,
                date("2026-01-05T10:00:00.000Z"),
                &[income_item(product.id, 3, "2026-01-04T08:00:00.000Z")],
            )
            .await
            .unwrap();

        // Second income invoice for the same product -> number 2.
        controller
            .create_invoice(
                InvoiceType::Income,
                date("2026-01-10T10:00:00.000Z"),
                &[income_item(product.id, 5, "2026-01-09T08:00:00.000Z")],
            )
            .await
            .unwrap();

        let consignments = db.consignments().list_for_product(product.id).await.unwrap();
        assert_eq!(consignments.len(), 2);
        assert_eq!(consignments[0].consignment_number, 1);
        assert_eq!(consignments[1].consignment_number, 2);

        // Fully available, linked 1:1 to their items.
        for c in &consignments {
            assert_eq!(c.current_quantity, c.quantity);
            assert!(!c.depreciated);
        }
        assert_ne!(
            consignments[0].income_invoice_item_id,
            consignments[1].income_invoice_item_id
        );

        assert_eq!(db.products().quantity(product.id).await.unwrap(), 8);
    }

    #[tokio::test]
    async fn test_income_items_for_same_product_in_one_invoice() {
        let db = setup().await;
        let controller = db.controller();
        let product = add_product(&db, "Engine").await;

        controller
            .create_invoice(
                InvoiceType::Income,
                date("2026-01-05T10:00:00.000Z"),
                &[
                    income_item(product.id, 2, "2026-01-04T08:00:00.000Z"),
                    income_item(product.id, 4, "2026-01-04T09:00:00.000Z"),
                ],
            )
            .await
            .unwrap();

        let consignments = db.consignments().list_for_product(product.id).await.unwrap();
        let numbers: Vec<i64> = consignments.iter().map(|c| c.consignment_number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_sale_write_off_spans_consignments() {
        let db = setup().await;
        let controller = db.controller();
        let product = add_product(&db, "Wheel").await;

        // C1(current=3, number=1), C2(current=5, number=2).
        controller
            .create_invoice(
                InvoiceType::Income,
                date("2026-01-05T10:00:00.000Z"),
                &[income_item(product.id, 3, "2026-01-04T08:00:00.000Z")],
            )
            .await
            .unwrap();
        controller
            .create_invoice(
                InvoiceType::Income,
                date("2026-01-10T10:00:00.000Z"),
                &[income_item(product.id, 5, "2026-01-09T08:00:00.000Z")],
            )
            .await
            .unwrap();

        // Sell 5: C1 fully depleted, C2 down to 3.
        controller
            .create_invoice(
                InvoiceType::Sale,
                date("2026-01-15T10:00:00.000Z"),
                &[sale_item(product.id, 5)],
            )
            .await
            .unwrap();

        let consignments = db.consignments().list_for_product(product.id).await.unwrap();
        assert_eq!(consignments[0].current_quantity, 0);
        assert!(consignments[0].depreciated);
        assert_eq!(consignments[1].current_quantity, 3);
        assert!(!consignments[1].depreciated);

        assert_eq!(db.products().quantity(product.id).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_insufficient_stock_leaves_store_unchanged() {
        let db = setup().await;
        let controller = db.controller();
        let product = add_product(&db, "Wheel").await;

        controller
            .create_invoice(
                InvoiceType::Income,
                date("2026-01-05T10:00:00.000Z"),
                &[income_item(product.id, 3, "2026-01-04T08:00:00.000Z")],
            )
            .await
            .unwrap();

        let err = controller
            .create_invoice(
                InvoiceType::Sale,
                date("2026-01-15T10:00:00.000Z"),
                &[sale_item(product.id, 5)],
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::Domain(CoreError::InsufficientStock {
                available: 3,
                requested: 5,
                ..
            })
        ));

        // No partial mutation survives.
        let consignments = db.consignments().list_for_product(product.id).await.unwrap();
        assert_eq!(consignments[0].current_quantity, 3);
        assert!(!consignments[0].depreciated);
        assert_eq!(db.invoices().count(InvoiceType::Sale).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failing_item_rolls_back_earlier_write_offs() {
        let db = setup().await;
        let controller = db.controller();
        let first = add_product(&db, "Wheel").await;
        let second = add_product(&db, "Engine").await;

        controller
            .create_invoice(
                InvoiceType::Income,
                date("2026-01-05T10:00:00.000Z"),
                &[
                    income_item(first.id, 5, "2026-01-04T08:00:00.000Z"),
                    income_item(second.id, 1, "2026-01-04T09:00:00.000Z"),
                ],
            )
            .await
            .unwrap();

        // First item would succeed; the second fails validation after the
        // first already mutated its consignments in the transaction.
        let err = controller
            .create_invoice(
                InvoiceType::Sale,
                date("2026-01-15T10:00:00.000Z"),
                &[sale_item(first.id, 2), sale_item(second.id, 5)],
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::Domain(CoreError::InsufficientStock { .. })
        ));
        assert_eq!(db.products().quantity(first.id).await.unwrap(), 5);
        assert_eq!(db.products().quantity(second.id).await.unwrap(), 1);
        assert_eq!(db.invoices().count(InvoiceType::Sale).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_later_sale_items_see_earlier_deductions() {
        let db = setup().await;
        let controller = db.controller();
        let product = add_product(&db, "Wheel").await;

        controller
            .create_invoice(
                InvoiceType::Income,
                date("2026-01-05T10:00:00.000Z"),
                &[income_item(product.id, 5, "2026-01-04T08:00:00.000Z")],
            )
            .await
            .unwrap();

        // 3 + 2 exactly exhausts the stock.
        controller
            .create_invoice(
                InvoiceType::Sale,
                date("2026-01-15T10:00:00.000Z"),
                &[sale_item(product.id, 3), sale_item(product.id, 2)],
            )
            .await
            .unwrap();
        assert_eq!(db.products().quantity(product.id).await.unwrap(), 0);

        // 3 + 3 must fail on the second item.
        let db = setup().await;
        let controller = db.controller();
        let product = add_product(&db, "Wheel").await;
        controller
            .create_invoice(
                InvoiceType::Income,
                date("2026-01-05T10:00:00.000Z"),
                &[income_item(product.id, 5, "2026-01-04T08:00:00.000Z")],
            )
            .await
            .unwrap();

        let err = controller
            .create_invoice(
                InvoiceType::Sale,
                date("2026-01-15T10:00:00.000Z"),
                &[sale_item(product.id, 3), sale_item(product.id, 3)],
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::InsufficientStock {
                available: 2,
                requested: 3,
                ..
            })
        ));
        assert_eq!(db.products().quantity(product.id).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_quantity_on_date_reconstructs_history() {
        let db = setup().await;
        let controller = db.controller();
        let product = add_product(&db, "Wheel").await;

        controller
            .create_invoice(
                InvoiceType::Income,
                date("2026-02-01T10:00:00.000Z"),
                &[income_item(product.id, 5, "2026-02-01T08:00:00.000Z")],
            )
            .await
            .unwrap();
        controller
            .create_invoice(
                InvoiceType::Sale,
                date("2026-02-10T10:00:00.000Z"),
                &[sale_item(product.id, 2)],
            )
            .await
            .unwrap();
        controller
            .create_invoice(
                InvoiceType::Income,
                date("2026-02-20T10:00:00.000Z"),
                &[income_item(product.id, 4, "2026-02-19T08:00:00.000Z")],
            )
            .await
            .unwrap();

        let invoices = db.invoices();

        // Before any invoices.
        assert_eq!(
            invoices
                .quantity_on_date(product.id, date("2026-01-15T00:00:00.000Z"))
                .await
                .unwrap(),
            0
        );
        // After the first income.
        assert_eq!(
            invoices
                .quantity_on_date(product.id, date("2026-02-05T00:00:00.000Z"))
                .await
                .unwrap(),
            5
        );
        // After the sale.
        assert_eq!(
            invoices
                .quantity_on_date(product.id, date("2026-02-15T00:00:00.000Z"))
                .await
                .unwrap(),
            3
        );
        // After the second income.
        assert_eq!(
            invoices
                .quantity_on_date(product.id, date("2026-03-01T00:00:00.000Z"))
                .await
                .unwrap(),
            7
        );
    }

    #[tokio::test]
    async fn test_quantity_on_date_independent_of_write_offs() {
        let db = setup().await;
        let controller = db.controller();
        let product = add_product(&db, "Wheel").await;

        controller
            .create_invoice(
                InvoiceType::Income,
                date("2026-02-01T10:00:00.000Z"),
                &[income_item(product.id, 5, "2026-02-01T08:00:00.000Z")],
            )
            .await
            .unwrap();

        let as_of = date("2026-02-05T00:00:00.000Z");
        let before = db
            .invoices()
            .quantity_on_date(product.id, as_of)
            .await
            .unwrap();

        // A later sale mutates consignments but must not change history.
        controller
            .create_invoice(
                InvoiceType::Sale,
                date("2026-02-10T10:00:00.000Z"),
                &[sale_item(product.id, 5)],
            )
            .await
            .unwrap();

        let after = db
            .invoices()
            .quantity_on_date(product.id, as_of)
            .await
            .unwrap();
        assert_eq!(before, after);
        assert_eq!(after, 5);
    }

    #[tokio::test]
    async fn test_parse_item_enforces_kind_shape() {
        let db = setup().await;
        let controller = db.controller();
        let product = add_product(&db, "Wheel").await;

        let income_payload = ItemPayload {
            product_id: product.id,
            quantity: 3,
            total_price: "100.00".to_string(),
            arrival_date: Some("2026-01-04T08:00:00.000Z".to_string()),
        };

        let parsed = controller
            .parse_item(InvoiceType::Income, &income_payload)
            .await
            .unwrap();
        assert_eq!(parsed.total_price.minor_units(), 10000);
        assert!(parsed.arrival_date.is_some());

        // Income without arrival date.
        let mut missing = income_payload.clone();
        missing.arrival_date = None;
        let err = controller
            .parse_item(InvoiceType::Income, &missing)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::MissingArrivalDate)));

        // Sale with arrival date.
        let err = controller
            .parse_item(InvoiceType::Sale, &income_payload)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::UnexpectedArrivalDate)
        ));

        // Unresolvable product.
        let mut unknown = income_payload.clone();
        unknown.product_id = 999;
        let err = controller
            .parse_item(InvoiceType::Income, &unknown)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::ProductNotFound(999))
        ));

        // Malformed money string.
        let mut bad_money = income_payload;
        bad_money.total_price = "100".to_string();
        let err = controller
            .parse_item(InvoiceType::Income, &bad_money)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::Parse(_))));
    }

    #[tokio::test]
    async fn test_deleting_last_item_deletes_invoice() {
        let db = setup().await;
        let controller = db.controller();
        let product = add_product(&db, "Wheel").await;

        let invoice_id = controller
            .create_invoice(
                InvoiceType::Income,
                date("2026-01-05T10:00:00.000Z"),
                &[income_item(product.id, 3, "2026-01-04T08:00:00.000Z")],
            )
            .await
            .unwrap();

        let items = db.invoices().income_items(invoice_id).await.unwrap();
        assert_eq!(items.len(), 1);

        db.invoices()
            .delete_item(InvoiceType::Income, items[0].id)
            .await
            .unwrap();

        assert!(db.invoices().get_income(invoice_id).await.unwrap().is_none());
        assert_eq!(db.invoices().count(InvoiceType::Income).await.unwrap(), 0);
        // The item's consignment went with it by cascade.
        assert!(db
            .consignments()
            .list_for_product(product.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_deleting_product_cascades_and_cleans_up() {
        let db = setup().await;
        let controller = db.controller();
        let product = add_product(&db, "Wheel").await;

        controller
            .create_invoice(
                InvoiceType::Income,
                date("2026-01-05T10:00:00.000Z"),
                &[income_item(product.id, 3, "2026-01-04T08:00:00.000Z")],
            )
            .await
            .unwrap();
        controller
            .create_invoice(
                InvoiceType::Sale,
                date("2026-01-15T10:00:00.000Z"),
                &[sale_item(product.id, 1)],
            )
            .await
            .unwrap();

        db.products().delete(product.id).await.unwrap();

        assert_eq!(db.consignments().count().await.unwrap(), 0);
        // Both invoices lost their only item and were cleaned up.
        assert_eq!(db.invoices().count(InvoiceType::Income).await.unwrap(), 0);
        assert_eq!(db.invoices().count(InvoiceType::Sale).await.unwrap(), 0);
    }
}
