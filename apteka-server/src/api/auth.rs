//! Authentication endpoints: register, login, logout

use axum::{Json, extract::State};
use serde::Deserialize;
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::UserPublic;

use crate::db;
use crate::state::AppState;
use crate::util::{hash_password, verify_password};

use super::ApiResult;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub phone: String,
    pub password: String,
}

#[derive(serde::Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserPublic,
}

/// POST /api/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<AuthResponse> {
    let phone = req.phone.trim();
    if phone.is_empty() || req.password.is_empty() {
        return Err(AppError::validation("Phone and password are required"));
    }

    let password_hash =
        hash_password(&req.password).map_err(|e| AppError::internal(format!("Hashing failed: {e}")))?;

    let user = db::users::create(&state.pool, phone, &password_hash)
        .await
        .map_err(|e| match e {
            db::RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::PhoneExists, msg),
            other => other.into(),
        })?;

    let token = crate::auth::create_token(&user, &state.jwt_secret).map_err(|e| {
        tracing::error!("JWT creation failed: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    Ok(Json(AuthResponse {
        token,
        user: user.public(),
    }))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<AuthResponse> {
    let user = db::users::find_by_phone(&state.pool, req.phone.trim())
        .await
        .map_err(AppError::from)?
        .ok_or_else(AppError::invalid_credentials)?;

    if !verify_password(&req.password, &user.password) {
        return Err(AppError::invalid_credentials());
    }

    let token = crate::auth::create_token(&user, &state.jwt_secret).map_err(|e| {
        tracing::error!("JWT creation failed: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    Ok(Json(AuthResponse {
        token,
        user: user.public(),
    }))
}

/// POST /api/logout
///
/// Token-based auth is stateless; the client discards its token.
pub async fn logout() -> Json<ApiResponse<()>> {
    Json(ApiResponse::ok())
}
