//! JWT claims for user authentication

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::models::User;

/// JWT claims carried by every authenticated request
#[derive(Debug, Serialize, Deserialize)]
pub struct UserClaims {
    /// User ID
    pub sub: i64,
    /// User phone
    pub phone: String,
    /// Admin flag
    pub is_admin: bool,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

const JWT_EXPIRY_HOURS: i64 = 24;

/// Create a JWT token for a user
pub fn create_token(user: &User, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = UserClaims {
        sub: user.id,
        phone: user.phone.clone(),
        is_admin: user.is_admin,
        exp: (now + chrono::Duration::hours(JWT_EXPIRY_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Decode and validate a token
pub fn decode_token(token: &str, secret: &str) -> Result<UserClaims, jsonwebtoken::errors::Error> {
    let data = jsonwebtoken::decode::<UserClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}
