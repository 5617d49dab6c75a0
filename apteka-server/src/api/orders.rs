//! Order endpoints
//!
//! Creation validates the submitted line items and re-checks the client's
//! price breakdown before anything touches the stock ledger. Placement is
//! a single transaction in the store layer; afterwards a one-shot status
//! job is armed for the automatic Processing → Shipped advance.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{Order, OrderCreate, OrderStatus, PaymentInfo};
use shared::util::now_millis;

use crate::auth::UserIdentity;
use crate::db::{self, RepoError, orders, status_jobs};
use crate::state::AppState;

use super::ApiResult;

/// Tolerance when comparing client-submitted price fields (float cents)
const PRICE_EPSILON: f64 = 0.005;

/// Validate the submitted breakdown and produce insertable order data.
///
/// The client's `itemsPrice`/`totalPrice` are not trusted: both must agree
/// with the item subtotals within a cent.
fn validate_order(user_id: i64, req: &OrderCreate) -> Result<orders::NewOrder, AppError> {
    if req.items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }

    for item in &req.items {
        if item.product_id <= 0 || item.quantity <= 0 || item.price <= 0.0 {
            return Err(AppError::new(ErrorCode::OrderItemInvalid)
                .with_detail("productId", item.product_id));
        }
    }

    let items_sum: f64 = req
        .items
        .iter()
        .map(|i| i.quantity as f64 * i.price)
        .sum();
    let items_price = req.items_price.unwrap_or(items_sum);
    let tax_price = req.tax_price.unwrap_or(0.0);
    let shipping_price = req.shipping_price.unwrap_or(0.0);

    if (items_price - items_sum).abs() > PRICE_EPSILON {
        return Err(AppError::new(ErrorCode::OrderTotalMismatch)
            .with_detail("itemsPrice", items_price)
            .with_detail("expected", items_sum));
    }

    let expected_total = items_price + tax_price + shipping_price;
    if (req.total_price - expected_total).abs() > PRICE_EPSILON {
        return Err(AppError::new(ErrorCode::OrderTotalMismatch)
            .with_detail("totalPrice", req.total_price)
            .with_detail("expected", expected_total));
    }

    if req.payment_method.trim().is_empty() {
        return Err(AppError::validation("Payment method is required"));
    }

    Ok(orders::NewOrder {
        user_id,
        items: req.items.clone(),
        payment_info: PaymentInfo::pending(req.payment_method.trim()),
        items_price,
        tax_price,
        shipping_price,
        total_price: req.total_price,
    })
}

/// POST /api/orders
pub async fn create_order(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(req): Json<OrderCreate>,
) -> ApiResult<Order> {
    let data = validate_order(identity.user_id, &req)?;

    let order = orders::create(&state.pool, &data)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::ProductNotFound, msg),
            other => other.into(),
        })?;

    // Arm the one-shot automatic status advance. Best-effort: a failure
    // here must not fail the placed order.
    let due_at = now_millis() + state.status_advance_delay_ms;
    if let Err(e) = status_jobs::schedule(&state.pool, order.id, due_at).await {
        tracing::warn!(order_id = order.id, error = %e, "Failed to schedule status advance");
    }

    tracing::info!(order_id = order.id, user_id = identity.user_id, "Order created");
    Ok(Json(order))
}

/// GET /api/orders/me
pub async fn my_orders(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<Vec<Order>> {
    let orders = orders::find_by_user(&state.pool, identity.user_id).await?;
    Ok(Json(orders))
}

/// GET /api/orders/{id} (owner or admin only)
pub async fn get_order(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(id): Path<i64>,
) -> ApiResult<Order> {
    let order = orders::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    if !identity.is_admin && order.user_id != identity.user_id {
        return Err(AppError::permission_denied("No access to this order"));
    }

    Ok(Json(order))
}

/// Admin listing row: the order plus the owner's phone
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOrder {
    #[serde(flatten)]
    pub order: Order,
    pub user_phone: String,
}

/// GET /api/admin/orders
pub async fn all_orders(State(state): State<AppState>) -> ApiResult<Vec<AdminOrder>> {
    let orders = orders::find_all_with_user(&state.pool).await?;
    Ok(Json(
        orders
            .into_iter()
            .map(|(order, user_phone)| AdminOrder { order, user_phone })
            .collect(),
    ))
}

#[derive(Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

/// PUT /api/admin/orders/{id}
///
/// The status string is parsed into the closed [`OrderStatus`] set;
/// unrecognized values are rejected.
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<StatusUpdateRequest>,
) -> ApiResult<Order> {
    let status: OrderStatus = req.status.parse().map_err(|_| {
        AppError::new(ErrorCode::InvalidOrderStatus).with_detail("status", req.status.clone())
    })?;

    orders::update_status(&state.pool, id, status)
        .await
        .map_err(order_err)?;

    let order = orders::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    Ok(Json(order))
}

/// DELETE /api/admin/orders/{id}
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<ApiResponse<()>> {
    orders::delete(&state.pool, id).await.map_err(order_err)?;
    Ok(Json(ApiResponse::ok()))
}

fn order_err(e: db::RepoError) -> AppError {
    match e {
        db::RepoError::NotFound(msg) => AppError::with_message(ErrorCode::OrderNotFound, msg),
        other => other.into(),
    }
}
