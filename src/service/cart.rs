//! Cart business logic

use crate::domain::CartView;
use crate::error::{AppError, Result};
use crate::repository::CartRepository;
use std::sync::Arc;

pub struct CartService<C: CartRepository> {
    cart_repo: Arc<C>,
}

impl<C: CartRepository> CartService<C> {
    pub fn new(cart_repo: Arc<C>) -> Self {
        Self { cart_repo }
    }

    /// Resolve (or create) the user's single active cart
    pub async fn get_or_create_active_cart(&self, user_id: i64) -> Result<i64> {
        self.cart_repo.get_or_create_active_cart(user_id).await
    }

    /// Current cart contents with totals computed at read time
    pub async fn get_view(&self, user_id: i64) -> Result<CartView> {
        let cart_id = self.get_or_create_active_cart(user_id).await?;
        let rows = self.cart_repo.list_items(cart_id).await?;
        Ok(CartView::from_rows(cart_id, rows))
    }

    /// Add `qty` of a product, incrementing an existing line
    pub async fn add_item(&self, user_id: i64, product_id: i64, qty: i32) -> Result<i64> {
        if qty <= 0 {
            return Err(AppError::InvalidQuantity);
        }
        if product_id <= 0 {
            return Err(AppError::BadRequest(
                "product_id_and_qty_required".to_string(),
            ));
        }

        let cart_id = self.get_or_create_active_cart(user_id).await?;
        let item_id = self.cart_repo.upsert_item(cart_id, product_id, qty).await?;
        tracing::debug!(user_id, cart_id, product_id, qty, item_id, "Cart item added");
        Ok(item_id)
    }

    /// Set the quantity of an item in the user's cart.
    ///
    /// Items outside the cart are left untouched and reported as zero rows.
    pub async fn update_item_qty(&self, user_id: i64, item_id: i64, qty: i32) -> Result<u64> {
        if qty <= 0 {
            return Err(AppError::InvalidQuantity);
        }

        let cart_id = self.get_or_create_active_cart(user_id).await?;
        let rows = self
            .cart_repo
            .update_item_qty(cart_id, item_id, qty)
            .await?;
        tracing::debug!(user_id, cart_id, item_id, qty, rows, "Cart item updated");
        Ok(rows)
    }

    /// Remove an item from the user's cart; idempotent
    pub async fn delete_item(&self, user_id: i64, item_id: i64) -> Result<u64> {
        let cart_id = self.get_or_create_active_cart(user_id).await?;
        let rows = self.cart_repo.delete_item(cart_id, item_id).await?;
        tracing::debug!(user_id, cart_id, item_id, rows, "Cart item deleted");
        Ok(rows)
    }
}
