//! Product review models

use serde::{Deserialize, Serialize};

/// A review row: one per user per product, rating 1-5
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Review {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub rating: i64,
    pub comment: Option<String>,
    pub created_at: i64,
}

/// Review joined with the author's display name for product pages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewWithAuthor {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub rating: i64,
    pub comment: Option<String>,
    pub created_at: i64,
    pub user_name: String,
}

/// Create review payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCreate {
    pub rating: i64,
    pub comment: Option<String>,
}
