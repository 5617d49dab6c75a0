//! Cart endpoints

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{CartAdd, CartLine, CartUpdate};

use crate::auth::UserIdentity;
use crate::db::{RepoError, cart, products};
use crate::state::AppState;

use super::ApiResult;

/// GET /api/cart
pub async fn get_cart(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<Vec<CartLine>> {
    let lines = cart::lines_for_user(&state.pool, identity.user_id).await?;
    Ok(Json(lines))
}

/// POST /api/cart
pub async fn add_to_cart(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(req): Json<CartAdd>,
) -> ApiResult<ApiResponse<()>> {
    products::find_by_id(&state.pool, req.product_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;

    cart::add_item(&state.pool, identity.user_id, req.product_id, req.quantity).await?;
    Ok(Json(ApiResponse::ok()))
}

/// PUT /api/cart/{product_id}
///
/// A quantity of zero or less removes the line, as the storefront sends
/// decrements through this endpoint.
pub async fn update_cart_item(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(product_id): Path<i64>,
    Json(req): Json<CartUpdate>,
) -> ApiResult<ApiResponse<()>> {
    if req.quantity <= 0 {
        cart::remove_item(&state.pool, identity.user_id, product_id).await?;
        return Ok(Json(ApiResponse::ok()));
    }

    cart::set_quantity(&state.pool, identity.user_id, product_id, req.quantity)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::CartItemNotFound, msg),
            other => other.into(),
        })?;
    Ok(Json(ApiResponse::ok()))
}

/// DELETE /api/cart/{product_id}
pub async fn remove_from_cart(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(product_id): Path<i64>,
) -> ApiResult<ApiResponse<()>> {
    cart::remove_item(&state.pool, identity.user_id, product_id).await?;
    Ok(Json(ApiResponse::ok()))
}
