//! Product review endpoints

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{ReviewCreate, ReviewWithAuthor};

use crate::auth::UserIdentity;
use crate::db::{RepoError, products, reviews};
use crate::state::AppState;

use super::ApiResult;

/// GET /api/reviews/product/{product_id} (public)
pub async fn list_product_reviews(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> ApiResult<Vec<ReviewWithAuthor>> {
    let reviews = reviews::find_by_product(&state.pool, product_id).await?;
    Ok(Json(reviews))
}

/// POST /api/reviews/product/{product_id}
///
/// One review per user per product; returns the refreshed list so the
/// product page can re-render without a second request.
pub async fn create_review(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(product_id): Path<i64>,
    Json(req): Json<ReviewCreate>,
) -> ApiResult<Vec<ReviewWithAuthor>> {
    if !(1..=5).contains(&req.rating) {
        return Err(AppError::new(ErrorCode::InvalidRating).with_detail("rating", req.rating));
    }

    products::find_by_id(&state.pool, product_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;

    if reviews::find_by_user_and_product(&state.pool, identity.user_id, product_id)
        .await?
        .is_some()
    {
        return Err(AppError::new(ErrorCode::ReviewExists));
    }

    reviews::create(
        &state.pool,
        identity.user_id,
        product_id,
        req.rating,
        req.comment.as_deref(),
    )
    .await
    .map_err(|e| match e {
        RepoError::Duplicate(_) => AppError::new(ErrorCode::ReviewExists),
        other => other.into(),
    })?;

    let refreshed = reviews::find_by_product(&state.pool, product_id).await?;
    Ok(Json(refreshed))
}

/// DELETE /api/reviews/{review_id} (author or admin only)
pub async fn delete_review(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(review_id): Path<i64>,
) -> ApiResult<ApiResponse<()>> {
    let review = reviews::find_by_id(&state.pool, review_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ReviewNotFound))?;

    if !identity.is_admin && review.user_id != identity.user_id {
        return Err(AppError::permission_denied("No access to this review"));
    }

    reviews::delete(&state.pool, review_id)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::ReviewNotFound, msg),
            other => other.into(),
        })?;
    Ok(Json(ApiResponse::ok()))
}
