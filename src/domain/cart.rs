//! Cart domain model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Status of the single cart a user may mutate
pub const ACTIVE_CART_STATUS: &str = "active";

/// Cart item row joined with current product data
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct CartItemRow {
    pub id: i64,
    pub product_id: i64,
    pub name: String,
    pub qty: i32,
    pub price_cents: i64,
}

/// Cart line as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartItem {
    pub id: i64,
    pub product_id: i64,
    pub name: String,
    pub qty: i32,
    pub price_cents: i64,
    pub line_total_cents: i64,
}

impl From<CartItemRow> for CartItem {
    fn from(row: CartItemRow) -> Self {
        let line_total_cents = i64::from(row.qty) * row.price_cents;
        Self {
            id: row.id,
            product_id: row.product_id,
            name: row.name,
            qty: row.qty,
            price_cents: row.price_cents,
            line_total_cents,
        }
    }
}

/// Derived cart view, recomputed on every read
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartView {
    pub cart_id: i64,
    pub items: Vec<CartItem>,
    pub total_cents: i64,
}

impl CartView {
    pub fn from_rows(cart_id: i64, rows: Vec<CartItemRow>) -> Self {
        let items: Vec<CartItem> = rows.into_iter().map(CartItem::from).collect();
        let total_cents = items.iter().map(|item| item.line_total_cents).sum();
        Self {
            cart_id,
            items,
            total_cents,
        }
    }
}

/// Request body for `POST /v1/cart/items`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddItemInput {
    #[serde(default)]
    pub product_id: i64,
    #[serde(default)]
    pub qty: i32,
}

/// Request body for `PATCH /v1/cart/items/{id}`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateQtyInput {
    #[serde(default)]
    pub qty: i32,
}
