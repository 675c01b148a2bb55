//! Cart handlers. All of them act on the caller's active cart only.

use crate::api::{decode_json, parse_item_id, StatusResponse};
use crate::domain::{AddItemInput, CartView, UpdateQtyInput};
use crate::error::{AppError, Result};
use crate::middleware::Identity;
use crate::state::HasServices;
use axum::{http::StatusCode, Json};

/// GET /v1/cart
pub async fn get_cart<S: HasServices>(state: &S, identity: Identity) -> Result<Json<CartView>> {
    let view = state.cart_service().get_view(identity.user_id).await?;
    Ok(Json(view))
}

/// POST /v1/cart/items
pub async fn add_item<S: HasServices>(
    state: &S,
    identity: Identity,
    body: &[u8],
) -> Result<(StatusCode, Json<StatusResponse>)> {
    let input: AddItemInput = decode_json(body)?;
    if input.product_id <= 0 || input.qty <= 0 {
        return Err(AppError::BadRequest(
            "product_id_and_qty_required".to_string(),
        ));
    }

    state
        .cart_service()
        .add_item(identity.user_id, input.product_id, input.qty)
        .await?;
    Ok((StatusCode::CREATED, Json(StatusResponse::ok())))
}

/// PATCH /v1/cart/items/{id}
pub async fn update_item<S: HasServices>(
    state: &S,
    identity: Identity,
    raw_item_id: &str,
    body: &[u8],
) -> Result<Json<StatusResponse>> {
    let item_id = parse_item_id(raw_item_id)?;
    let input: UpdateQtyInput = decode_json(body)?;

    state
        .cart_service()
        .update_item_qty(identity.user_id, item_id, input.qty)
        .await?;
    Ok(Json(StatusResponse::ok()))
}

/// DELETE /v1/cart/items/{id}
pub async fn delete_item<S: HasServices>(
    state: &S,
    identity: Identity,
    raw_item_id: &str,
) -> Result<Json<StatusResponse>> {
    let item_id = parse_item_id(raw_item_id)?;

    state
        .cart_service()
        .delete_item(identity.user_id, item_id)
        .await?;
    Ok(Json(StatusResponse::ok()))
}
