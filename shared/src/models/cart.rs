//! Cart models

use serde::{Deserialize, Serialize};

/// A cart entry joined with its product data, keyed by product id
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CartLine {
    /// Product id
    pub id: i64,
    pub title: String,
    pub price: f64,
    pub image_url: Option<String>,
    pub quantity: i64,
}

/// Add-to-cart payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartAdd {
    pub product_id: i64,
    pub quantity: i64,
}

/// Update-quantity payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartUpdate {
    pub quantity: i64,
}
