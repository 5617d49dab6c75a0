//! Product catalog models
//!
//! Pharmacy products carry a number of free-text regulatory fields
//! (composition, contraindications, storage conditions) alongside the
//! usual commerce fields. `stock` is a non-negative unit count, mutated
//! only by admin edits and order stock reservation.

use serde::{Deserialize, Serialize};

/// A catalog product as stored and served
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub price: f64,
    pub article: Option<String>,
    pub manufacturer: Option<String>,
    pub expiration_date: Option<String>,
    pub composition: Option<String>,
    pub contraindications: Option<String>,
    pub storage_conditions: Option<String>,
    pub recommendations: Option<String>,
    /// Comma-separated tag list
    pub tags: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    /// Available units, never negative
    pub stock: i64,
    pub category: Option<String>,
    pub instructions: Option<String>,
    pub created_at: i64,
}

/// Create product payload (admin)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub title: String,
    pub price: f64,
    pub article: Option<String>,
    pub manufacturer: Option<String>,
    pub expiration_date: Option<String>,
    pub composition: Option<String>,
    pub contraindications: Option<String>,
    pub storage_conditions: Option<String>,
    pub recommendations: Option<String>,
    pub tags: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    /// Defaults to 0 when omitted
    #[serde(default)]
    pub stock: Option<i64>,
    pub category: Option<String>,
    pub instructions: Option<String>,
}

/// Partial product update payload (admin); omitted fields keep their value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub title: Option<String>,
    pub price: Option<f64>,
    pub article: Option<String>,
    pub manufacturer: Option<String>,
    pub expiration_date: Option<String>,
    pub composition: Option<String>,
    pub contraindications: Option<String>,
    pub storage_conditions: Option<String>,
    pub recommendations: Option<String>,
    pub tags: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub stock: Option<i64>,
    pub category: Option<String>,
    pub instructions: Option<String>,
}
