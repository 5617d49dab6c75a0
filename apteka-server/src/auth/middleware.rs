//! Authentication middleware
//!
//! `auth_middleware` verifies the bearer token and injects a
//! [`UserIdentity`] into request extensions; `require_admin` gates the
//! privileged route group on the admin flag.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::{AppError, ErrorCode};

use crate::db;
use crate::state::AppState;

/// Authenticated identity extracted from the JWT and re-checked against
/// the users table (a token for a deleted account is rejected)
#[derive(Debug, Clone)]
pub struct UserIdentity {
    pub user_id: i64,
    pub phone: String,
    pub is_admin: bool,
}

/// Middleware that extracts and verifies the user JWT from the
/// Authorization header
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(AppError::not_authenticated)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::invalid_token("Invalid Authorization format"))?;

    let claims = crate::auth::jwt::decode_token(token, &state.jwt_secret).map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::new(ErrorCode::TokenExpired)
            }
            _ => AppError::invalid_token("Invalid or expired token"),
        }
    })?;

    let user = db::users::find_by_id(&state.pool, claims.sub)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::invalid_token("User not found for this token"))?;

    let identity = UserIdentity {
        user_id: user.id,
        phone: user.phone,
        is_admin: user.is_admin,
    };

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// Middleware gating a route group on the admin flag. Must run after
/// [`auth_middleware`].
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    let identity = request
        .extensions()
        .get::<UserIdentity>()
        .ok_or_else(AppError::not_authenticated)?;

    if !identity.is_admin {
        return Err(AppError::new(ErrorCode::AdminRequired));
    }

    Ok(next.run(request).await)
}
