//! Profile endpoints

use axum::{Extension, Json, extract::State};
use serde::Deserialize;
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{GENDERS, UserProfile};

use crate::auth::UserIdentity;
use crate::db::{self, RepoError};
use crate::state::AppState;

use super::ApiResult;

/// GET /api/profile
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<UserProfile> {
    let user = db::users::find_by_id(&state.pool, identity.user_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(Json(user.profile()))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
}

/// PUT /api/profile: partial update, omitted fields keep their value
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(req): Json<ProfileUpdateRequest>,
) -> ApiResult<UserProfile> {
    if let Some(gender) = req.gender.as_deref()
        && !GENDERS.contains(&gender)
    {
        return Err(AppError::new(ErrorCode::InvalidGender).with_detail("gender", gender));
    }

    db::users::update_profile(
        &state.pool,
        identity.user_id,
        req.first_name.as_deref(),
        req.last_name.as_deref(),
        req.gender.as_deref(),
    )
    .await
    .map_err(user_err)?;

    let user = db::users::find_by_id(&state.pool, identity.user_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(Json(user.profile()))
}

/// DELETE /api/profile removes the account
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<ApiResponse<()>> {
    db::users::delete(&state.pool, identity.user_id)
        .await
        .map_err(user_err)?;
    Ok(Json(ApiResponse::ok()))
}

fn user_err(e: RepoError) -> AppError {
    match e {
        RepoError::NotFound(msg) => AppError::with_message(ErrorCode::UserNotFound, msg),
        other => other.into(),
    }
}
