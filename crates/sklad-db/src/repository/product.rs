//! # Product Repository
//!
//! Database operations for products.
//!
//! The product's stock is a derived figure: the sum of `current_quantity`
//! over its consignments. It is computed by [`ProductRepository::quantity`]
//! on read, never stored on the product row.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::invoice::delete_empty_invoices;
use sklad_core::Product;

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists all products in id order.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, cost_price FROM products ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Counts products (for the X-Total-Count list header).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Gets a product by its id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, cost_price FROM products WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product and returns it with its generated id.
    pub async fn insert(&self, name: &str, cost_price: i64) -> DbResult<Product> {
        debug!(name = %name, "Inserting product");

        let result = sqlx::query("INSERT INTO products (name, cost_price) VALUES (?1, ?2)")
            .bind(name)
            .bind(cost_price)
            .execute(&self.pool)
            .await?;

        Ok(Product {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            cost_price,
        })
    }

    /// Updates a product's name and cost price.
    pub async fn update(&self, id: i64, name: &str, cost_price: i64) -> DbResult<()> {
        debug!(id = %id, "Updating product");

        let result = sqlx::query("UPDATE products SET name = ?2, cost_price = ?3 WHERE id = ?1")
            .bind(id)
            .bind(name)
            .bind(cost_price)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Deletes a product.
    ///
    /// Cascades remove the product's consignments and invoice items; an
    /// invoice left with no items is removed by the cleanup pass in the same
    /// transaction.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        delete_empty_invoices(&mut tx).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Current stock of a product: SUM of remaining consignment quantities.
    pub async fn quantity(&self, product_id: i64) -> DbResult<i64> {
        let quantity: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(current_quantity), 0) FROM consignments WHERE product_id = ?1",
        )
        .bind(product_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(quantity)
    }
}
