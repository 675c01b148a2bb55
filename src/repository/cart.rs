//! Cart repository

use crate::domain::{CartItemRow, ACTIVE_CART_STATUS};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::PgPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Return the user's active cart id, creating the cart if needed.
    ///
    /// Must be atomic: concurrent callers for the same user get the same id.
    async fn get_or_create_active_cart(&self, user_id: i64) -> Result<i64>;
    /// Items of a cart joined with product name and price, ordered by item id
    async fn list_items(&self, cart_id: i64) -> Result<Vec<CartItemRow>>;
    /// Insert an item, or add `qty` to the existing item for the same product.
    ///
    /// A sum beyond `i32::MAX` is `InvalidQuantity` and leaves the item unchanged.
    async fn upsert_item(&self, cart_id: i64, product_id: i64, qty: i32) -> Result<i64>;
    /// Set an item's quantity; only rows of `cart_id` are touched. Returns rows affected.
    async fn update_item_qty(&self, cart_id: i64, item_id: i64, qty: i32) -> Result<u64>;
    /// Delete an item; only rows of `cart_id` are touched. Returns rows affected.
    async fn delete_item(&self, cart_id: i64, item_id: i64) -> Result<u64>;
}

pub struct CartRepositoryImpl {
    pool: PgPool,
}

impl CartRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartRepository for CartRepositoryImpl {
    async fn get_or_create_active_cart(&self, user_id: i64) -> Result<i64> {
        // The partial unique index on (user_id) WHERE status = 'active' serializes
        // concurrent first access; the no-op DO UPDATE makes RETURNING yield the winner.
        let row: (i64,) = sqlx::query_as(
            r#"
            INSERT INTO carts (user_id, status, created_at, updated_at)
            VALUES ($1, $2, NOW(), NOW())
            ON CONFLICT (user_id) WHERE status = 'active'
            DO UPDATE SET updated_at = carts.updated_at
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(ACTIVE_CART_STATUS)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0)
    }

    async fn list_items(&self, cart_id: i64) -> Result<Vec<CartItemRow>> {
        let rows = sqlx::query_as::<_, CartItemRow>(
            r#"
            SELECT ci.id, ci.product_id, p.name, ci.qty, p.price_cents
            FROM cart_items ci
            JOIN products p ON p.id = ci.product_id
            WHERE ci.cart_id = $1
            ORDER BY ci.id
            "#,
        )
        .bind(cart_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn upsert_item(&self, cart_id: i64, product_id: i64, qty: i32) -> Result<i64> {
        let row: (i64,) = sqlx::query_as(
            r#"
            INSERT INTO cart_items (cart_id, product_id, qty, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            ON CONFLICT (cart_id, product_id)
            DO UPDATE SET qty = cart_items.qty + EXCLUDED.qty, updated_at = NOW()
            RETURNING id
            "#,
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(qty)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if super::is_foreign_key_violation(&e) {
                AppError::NotFound("product_not_found".to_string())
            } else if super::is_numeric_out_of_range(&e) {
                AppError::InvalidQuantity
            } else {
                AppError::Database(e)
            }
        })?;

        Ok(row.0)
    }

    async fn update_item_qty(&self, cart_id: i64, item_id: i64, qty: i32) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE cart_items
            SET qty = $3, updated_at = NOW()
            WHERE id = $1 AND cart_id = $2
            "#,
        )
        .bind(item_id)
        .bind(cart_id)
        .bind(qty)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete_item(&self, cart_id: i64, item_id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND cart_id = $2")
            .bind(item_id)
            .bind(cart_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
