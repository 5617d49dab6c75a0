//! User authentication: JWT issuance and axum middleware

pub mod jwt;
pub mod middleware;

pub use jwt::{UserClaims, create_token};
pub use middleware::{UserIdentity, auth_middleware, require_admin};
