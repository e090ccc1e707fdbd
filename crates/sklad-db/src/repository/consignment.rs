//! # Consignment Repository
//!
//! Read access to consignments. All consignment writes happen inside the
//! controller's invoice transactions.

use sqlx::SqlitePool;

use crate::error::DbResult;
use sklad_core::Consignment;

pub(crate) const CONSIGNMENT_COLUMNS: &str = "id, consignment_number, arrival_date, product_id, \
     income_invoice_item_id, quantity, current_quantity, depreciated, total_price";

/// Repository for consignment reads.
#[derive(Debug, Clone)]
pub struct ConsignmentRepository {
    pool: SqlitePool,
}

impl ConsignmentRepository {
    /// Creates a new ConsignmentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ConsignmentRepository { pool }
    }

    /// Lists all consignments in id order.
    pub async fn list(&self) -> DbResult<Vec<Consignment>> {
        let sql = format!("SELECT {CONSIGNMENT_COLUMNS} FROM consignments ORDER BY id");
        let consignments = sqlx::query_as::<_, Consignment>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(consignments)
    }

    /// Counts consignments (for the X-Total-Count list header).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM consignments")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Lists a product's consignments in arrival order (ascending
    /// consignment number).
    pub async fn list_for_product(&self, product_id: i64) -> DbResult<Vec<Consignment>> {
        let sql = format!(
            "SELECT {CONSIGNMENT_COLUMNS} FROM consignments \
             WHERE product_id = ?1 ORDER BY consignment_number"
        );
        let consignments = sqlx::query_as::<_, Consignment>(&sql)
            .bind(product_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(consignments)
    }
}
