//! # Invoice Repository
//!
//! Reads and deletes for both invoice kinds, plus the point-in-time stock
//! query used by reporting.
//!
//! Sale and income invoices share their table shape, so one repository
//! serves both through a static table-name mapping keyed by [`InvoiceType`].
//! Creation is NOT here: new invoices only come into existence through the
//! controller's transactional operations.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{SqlitePool, Transaction};
use tracing::debug;

use crate::error::{DbError, DbResult};
use sklad_core::{IncomeInvoice, IncomeInvoiceItem, InvoiceType, SaleInvoice, SaleInvoiceItem};

/// Static table mapping: (invoice table, item table) for a kind.
const fn tables(kind: InvoiceType) -> (&'static str, &'static str) {
    match kind {
        InvoiceType::Income => ("income_invoices", "income_invoice_items"),
        InvoiceType::Sale => ("sale_invoices", "sale_invoice_items"),
    }
}

/// Deletes invoices (of both kinds) that no longer have any items.
///
/// Referential cleanup rule: deleting the last item of an invoice deletes
/// the now-empty invoice. Runs inside the caller's transaction, after item
/// deletes or product cascade deletes.
pub(crate) async fn delete_empty_invoices(tx: &mut Transaction<'_, sqlx::Sqlite>) -> DbResult<()> {
    for kind in [InvoiceType::Sale, InvoiceType::Income] {
        let (invoice_table, item_table) = tables(kind);
        let sql = format!(
            "DELETE FROM {invoice_table} \
             WHERE id NOT IN (SELECT DISTINCT invoice_id FROM {item_table})"
        );

        let result = sqlx::query(&sql).execute(&mut **tx).await?;
        if result.rows_affected() > 0 {
            debug!(
                kind = %kind,
                removed = result.rows_affected(),
                "Removed empty invoices"
            );
        }
    }

    Ok(())
}

/// Repository for invoice reads and deletes.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceRepository { pool }
    }

    // -------------------------------------------------------------------------
    // Generic (kind-mapped) operations
    // -------------------------------------------------------------------------

    /// Counts invoices of a kind (for the X-Total-Count list header).
    pub async fn count(&self, kind: InvoiceType) -> DbResult<i64> {
        let (invoice_table, _) = tables(kind);
        let sql = format!("SELECT COUNT(*) FROM {invoice_table}");

        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(count)
    }

    /// Deletes an invoice; its items (and, for income invoices, their
    /// consignments) go with it by cascade.
    pub async fn delete(&self, kind: InvoiceType, id: i64) -> DbResult<()> {
        debug!(kind = %kind, id = %id, "Deleting invoice");

        let (invoice_table, _) = tables(kind);
        let sql = format!("DELETE FROM {invoice_table} WHERE id = ?1");

        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Invoice", id));
        }

        Ok(())
    }

    /// Deletes a single invoice item. If that was the invoice's last item,
    /// the empty invoice is removed in the same transaction.
    pub async fn delete_item(&self, kind: InvoiceType, item_id: i64) -> DbResult<()> {
        debug!(kind = %kind, item_id = %item_id, "Deleting invoice item");

        let (_, item_table) = tables(kind);
        let sql = format!("DELETE FROM {item_table} WHERE id = ?1");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(&sql).bind(item_id).execute(&mut *tx).await?;
        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Invoice item", item_id));
        }

        delete_empty_invoices(&mut tx).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Shared header query for both kinds; the row shape (id, date) is
    /// identical, only the table differs.
    async fn fetch_headers<T>(
        &self,
        table: &'static str,
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> DbResult<Vec<T>>
    where
        T: for<'r> sqlx::FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let rows = match range {
            Some((start, end)) => {
                let sql = format!(
                    "SELECT id, date FROM {table} \
                     WHERE date BETWEEN ?1 AND ?2 ORDER BY date, id"
                );
                sqlx::query_as::<_, T>(&sql)
                    .bind(start)
                    .bind(end)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!("SELECT id, date FROM {table} ORDER BY id");
                sqlx::query_as::<_, T>(&sql).fetch_all(&self.pool).await?
            }
        };

        Ok(rows)
    }

    // -------------------------------------------------------------------------
    // Sale invoices
    // -------------------------------------------------------------------------

    /// Lists all sale invoices.
    pub async fn list_sale(&self) -> DbResult<Vec<SaleInvoice>> {
        self.fetch_headers("sale_invoices", None).await
    }

    /// Lists sale invoices within an inclusive date range.
    pub async fn sale_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<SaleInvoice>> {
        self.fetch_headers("sale_invoices", Some((start, end))).await
    }

    /// Gets a sale invoice by id.
    pub async fn get_sale(&self, id: i64) -> DbResult<Option<SaleInvoice>> {
        let invoice =
            sqlx::query_as::<_, SaleInvoice>("SELECT id, date FROM sale_invoices WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(invoice)
    }

    /// Gets the items of a sale invoice.
    pub async fn sale_items(&self, invoice_id: i64) -> DbResult<Vec<SaleInvoiceItem>> {
        let items = sqlx::query_as::<_, SaleInvoiceItem>(
            "SELECT id, invoice_id, product_id, quantity, total_price \
             FROM sale_invoice_items WHERE invoice_id = ?1 ORDER BY id",
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    // -------------------------------------------------------------------------
    // Income invoices
    // -------------------------------------------------------------------------

    /// Lists all income invoices.
    pub async fn list_income(&self) -> DbResult<Vec<IncomeInvoice>> {
        self.fetch_headers("income_invoices", None).await
    }

    /// Lists income invoices within an inclusive date range.
    pub async fn income_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<IncomeInvoice>> {
        self.fetch_headers("income_invoices", Some((start, end)))
            .await
    }

    /// Gets an income invoice by id.
    pub async fn get_income(&self, id: i64) -> DbResult<Option<IncomeInvoice>> {
        let invoice = sqlx::query_as::<_, IncomeInvoice>(
            "SELECT id, date FROM income_invoices WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    /// Gets the items of an income invoice.
    pub async fn income_items(&self, invoice_id: i64) -> DbResult<Vec<IncomeInvoiceItem>> {
        let items = sqlx::query_as::<_, IncomeInvoiceItem>(
            "SELECT id, invoice_id, product_id, quantity, arrival_date, total_price \
             FROM income_invoice_items WHERE invoice_id = ?1 ORDER BY id",
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    // -------------------------------------------------------------------------
    // Historical quantity
    // -------------------------------------------------------------------------

    /// Reconstructs a product's stock level as of `date` from invoice
    /// history: income item quantities minus sale item quantities over all
    /// invoices dated at or before `date`, clamped at zero.
    ///
    /// Deliberately independent of the live `current_quantity` fields - the
    /// answer stays correct after later write-offs mutate consignments.
    pub async fn quantity_on_date(&self, product_id: i64, date: DateTime<Utc>) -> DbResult<i64> {
        let total_income: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(item.quantity), 0) \
             FROM income_invoice_items item \
             JOIN income_invoices invoice ON invoice.id = item.invoice_id \
             WHERE item.product_id = ?1 AND invoice.date <= ?2",
        )
        .bind(product_id)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;

        let total_sales: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(item.quantity), 0) \
             FROM sale_invoice_items item \
             JOIN sale_invoices invoice ON invoice.id = item.invoice_id \
             WHERE item.product_id = ?1 AND invoice.date <= ?2",
        )
        .bind(product_id)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;

        Ok((total_income - total_sales).max(0))
    }
}
