//! Admin panel endpoints: dashboard stats and user management

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::UserPublic;

use crate::db::{self, RepoError};
use crate::state::AppState;

use super::ApiResult;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub users_count: i64,
    pub products_count: i64,
    pub total_orders: i64,
    pub total_revenue: f64,
}

/// GET /api/admin/stats
pub async fn stats(State(state): State<AppState>) -> ApiResult<AdminStats> {
    let users_count = db::users::count(&state.pool).await?;
    let products_count = db::products::count(&state.pool).await?;
    let (total_orders, total_revenue) = db::orders::stats(&state.pool).await?;

    Ok(Json(AdminStats {
        users_count,
        products_count,
        total_orders,
        total_revenue,
    }))
}

/// GET /api/admin/users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Vec<UserPublic>> {
    let users = db::users::find_all(&state.pool).await?;
    Ok(Json(users.iter().map(|u| u.public()).collect()))
}

/// DELETE /api/admin/users/{id}
///
/// Admin accounts cannot be deleted.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<ApiResponse<()>> {
    let user = db::users::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    if user.is_admin {
        return Err(AppError::new(ErrorCode::CannotDeleteAdmin));
    }

    db::users::delete(&state.pool, id)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::UserNotFound, msg),
            other => other.into(),
        })?;
    Ok(Json(ApiResponse::ok()))
}
