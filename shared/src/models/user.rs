//! User account models

use serde::{Deserialize, Serialize};

/// Full user record, including the password hash. Never serialized with
/// the hash; use [`UserPublic`] or [`UserProfile`] on the wire.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub phone: String,
    /// Argon2 password hash
    pub password: String,
    pub is_admin: bool,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub profile_updated_at: Option<i64>,
}

impl User {
    /// Public projection (auth responses, admin listing)
    pub fn public(&self) -> UserPublic {
        UserPublic {
            id: self.id,
            phone: self.phone.clone(),
            is_admin: self.is_admin,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            gender: self.gender.clone(),
            profile_updated_at: self.profile_updated_at,
        }
    }

    /// Profile projection (`/api/profile`)
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            phone: self.phone.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            gender: self.gender.clone(),
            profile_updated_at: self.profile_updated_at,
        }
    }
}

/// User without credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPublic {
    pub id: i64,
    pub phone: String,
    pub is_admin: bool,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub profile_updated_at: Option<i64>,
}

/// Profile view owned by the user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub phone: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub profile_updated_at: Option<i64>,
}

/// Accepted gender values for profile updates
pub const GENDERS: &[&str] = &["male", "female", "other"];
