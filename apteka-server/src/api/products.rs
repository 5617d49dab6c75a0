//! Product catalog endpoints

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{Product, ProductCreate, ProductUpdate};

use crate::db::products::{self, PriceRange, ProductFilter};
use crate::state::AppState;

use super::ApiResult;

/// GET /api/products
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductsQuery {
    pub category: Option<String>,
    /// Comma-separated tag list, any-match
    pub tags: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total_products: i64,
    pub current_page: i64,
    pub total_pages: i64,
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> ApiResult<ProductPage> {
    let filter = ProductFilter {
        category: query.category.filter(|c| c.as_str() != "all"),
        tags: query
            .tags
            .as_deref()
            .map(|t| {
                t.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        min_price: query.min_price,
        max_price: query.max_price,
        search: query.search.filter(|s| !s.is_empty()),
    };

    let products = products::find_filtered(&state.pool, &filter).await?;

    let limit = query.limit.unwrap_or(12).clamp(1, 100);
    let page = query.page.unwrap_or(1).max(1);
    let total_products = products.len() as i64;
    let total_pages = (total_products as u64).div_ceil(limit as u64) as i64;

    let start = ((page - 1) * limit) as usize;
    let page_items: Vec<Product> = products
        .into_iter()
        .skip(start)
        .take(limit as usize)
        .collect();

    Ok(Json(ProductPage {
        products: page_items,
        total_products,
        current_page: page,
        total_pages,
    }))
}

/// GET /api/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Product> {
    let product = products::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    Ok(Json(product))
}

/// GET /api/products/tags/all
pub async fn list_tags(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    let tags = products::distinct_tags(&state.pool).await?;
    Ok(Json(tags))
}

/// GET /api/products/price-range
pub async fn price_range(State(state): State<AppState>) -> ApiResult<PriceRange> {
    let range = products::price_range(&state.pool).await?;
    Ok(Json(range))
}

/// GET /api/admin/products
pub async fn list_products_admin(State(state): State<AppState>) -> ApiResult<Vec<Product>> {
    let all = products::find_all(&state.pool).await?;
    Ok(Json(all))
}

/// POST /api/products
pub async fn create_product(
    State(state): State<AppState>,
    Json(data): Json<ProductCreate>,
) -> ApiResult<Product> {
    if data.title.trim().is_empty() || data.price <= 0.0 {
        return Err(AppError::validation("Title and price are required"));
    }

    let product = products::create(&state.pool, &data).await?;
    Ok(Json(product))
}

/// PUT /api/products/{id}
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(data): Json<ProductUpdate>,
) -> ApiResult<Product> {
    if data.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(AppError::validation("Title cannot be empty"));
    }
    if data.price.is_some_and(|p| p <= 0.0) {
        return Err(AppError::validation("Price must be positive"));
    }

    products::update(&state.pool, id, &data)
        .await
        .map_err(product_err)?;

    let product = products::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    Ok(Json(product))
}

/// DELETE /api/products/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<ApiResponse<()>> {
    products::delete(&state.pool, id).await.map_err(product_err)?;
    Ok(Json(ApiResponse::ok()))
}

fn product_err(e: crate::db::RepoError) -> AppError {
    match e {
        crate::db::RepoError::NotFound(msg) => {
            AppError::with_message(ErrorCode::ProductNotFound, msg)
        }
        other => other.into(),
    }
}
