//! Product repository, including the stock ledger

use shared::models::{Product, ProductCreate, ProductUpdate};
use shared::util::now_millis;
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

const PRODUCT_COLUMNS: &str = "id, title, price, article, manufacturer, expiration_date, \
     composition, contraindications, storage_conditions, recommendations, tags, image_url, \
     description, stock, category, instructions, created_at";

/// Catalog filters applied by the public product listing
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub search: Option<String>,
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"
    ))
    .fetch_all(pool)
    .await?;
    Ok(products)
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(product)
}

/// Filtered catalog listing. Category, price range and search run in SQL;
/// the comma-separated tag column is matched in Rust afterwards.
pub async fn find_filtered(pool: &SqlitePool, filter: &ProductFilter) -> RepoResult<Vec<Product>> {
    let search_pattern = filter
        .search
        .as_ref()
        .map(|s| format!("%{}%", s.to_lowercase()));

    let mut products = sqlx::query_as::<_, Product>(&format!(
        r#"
        SELECT {PRODUCT_COLUMNS} FROM products
        WHERE (?1 IS NULL OR category = ?1)
          AND (?2 IS NULL OR price >= ?2)
          AND (?3 IS NULL OR price <= ?3)
          AND (?4 IS NULL
               OR LOWER(title) LIKE ?4
               OR LOWER(COALESCE(description, '')) LIKE ?4)
        ORDER BY id
        "#
    ))
    .bind(&filter.category)
    .bind(filter.min_price)
    .bind(filter.max_price)
    .bind(&search_pattern)
    .fetch_all(pool)
    .await?;

    if !filter.tags.is_empty() {
        products.retain(|p| {
            p.tags
                .as_deref()
                .is_some_and(|tags| filter.tags.iter().any(|t| tags.contains(t.as_str())))
        });
    }

    Ok(products)
}

pub async fn create(pool: &SqlitePool, data: &ProductCreate) -> RepoResult<Product> {
    let now = now_millis();
    let stock = data.stock.unwrap_or(0);
    if stock < 0 {
        return Err(RepoError::Validation(format!(
            "Stock cannot be negative: {stock}"
        )));
    }

    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO products (
            title, price, article, manufacturer, expiration_date,
            composition, contraindications, storage_conditions,
            recommendations, tags, image_url, description,
            stock, category, instructions, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&data.title)
    .bind(data.price)
    .bind(&data.article)
    .bind(&data.manufacturer)
    .bind(&data.expiration_date)
    .bind(&data.composition)
    .bind(&data.contraindications)
    .bind(&data.storage_conditions)
    .bind(&data.recommendations)
    .bind(&data.tags)
    .bind(&data.image_url)
    .bind(&data.description)
    .bind(stock)
    .bind(&data.category)
    .bind(&data.instructions)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: &ProductUpdate) -> RepoResult<()> {
    if data.stock.is_some_and(|s| s < 0) {
        return Err(RepoError::Validation("Stock cannot be negative".into()));
    }

    let rows = sqlx::query(
        r#"
        UPDATE products SET
            title = COALESCE(?1, title),
            price = COALESCE(?2, price),
            article = COALESCE(?3, article),
            manufacturer = COALESCE(?4, manufacturer),
            expiration_date = COALESCE(?5, expiration_date),
            composition = COALESCE(?6, composition),
            contraindications = COALESCE(?7, contraindications),
            storage_conditions = COALESCE(?8, storage_conditions),
            recommendations = COALESCE(?9, recommendations),
            tags = COALESCE(?10, tags),
            image_url = COALESCE(?11, image_url),
            description = COALESCE(?12, description),
            stock = COALESCE(?13, stock),
            category = COALESCE(?14, category),
            instructions = COALESCE(?15, instructions)
        WHERE id = ?16
        "#,
    )
    .bind(&data.title)
    .bind(data.price)
    .bind(&data.article)
    .bind(&data.manufacturer)
    .bind(&data.expiration_date)
    .bind(&data.composition)
    .bind(&data.contraindications)
    .bind(&data.storage_conditions)
    .bind(&data.recommendations)
    .bind(&data.tags)
    .bind(&data.image_url)
    .bind(&data.description)
    .bind(data.stock)
    .bind(&data.category)
    .bind(&data.instructions)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM products WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    Ok(())
}

/// Distinct tags across the catalog, split out of the comma-separated column
pub async fn distinct_tags(pool: &SqlitePool) -> RepoResult<Vec<String>> {
    let rows: Vec<(String,)> =
        sqlx::query_as("SELECT DISTINCT tags FROM products WHERE tags IS NOT NULL AND tags != ''")
            .fetch_all(pool)
            .await?;

    let mut tags: Vec<String> = Vec::new();
    for (raw,) in rows {
        for tag in raw.split(',') {
            let tag = tag.trim();
            if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }
    }
    Ok(tags)
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    pub min_price: f64,
    pub max_price: f64,
}

pub async fn price_range(pool: &SqlitePool) -> RepoResult<PriceRange> {
    let row: (Option<f64>, Option<f64>) = sqlx::query_as(
        "SELECT MIN(price), MAX(price) FROM products WHERE price IS NOT NULL",
    )
    .fetch_one(pool)
    .await?;

    match row {
        (Some(min_price), Some(max_price)) => Ok(PriceRange {
            min_price,
            max_price,
        }),
        // Empty catalog: keep the original fallback bounds
        _ => Ok(PriceRange {
            min_price: 0.0,
            max_price: 1000.0,
        }),
    }
}

/// Atomically reserve `quantity` units of a product on the current
/// order-creation transaction, returning the new stock value.
///
/// Must run on the same transaction as the order insert so a failure on
/// any line item rolls back every prior decrement.
pub async fn reserve_stock(
    conn: &mut sqlx::SqliteConnection,
    product_id: i64,
    quantity: i64,
) -> RepoResult<i64> {
    if quantity <= 0 {
        return Err(RepoError::Validation(format!(
            "Quantity must be positive: {quantity}"
        )));
    }

    let row: Option<(i64,)> = sqlx::query_as("SELECT stock FROM products WHERE id = ?")
        .bind(product_id)
        .fetch_optional(&mut *conn)
        .await?;

    let Some((stock,)) = row else {
        return Err(RepoError::NotFound(format!(
            "Product {product_id} not found"
        )));
    };

    if stock < quantity {
        return Err(RepoError::InsufficientStock {
            product_id,
            requested: quantity,
            available: stock,
        });
    }

    let new_stock = stock - quantity;
    sqlx::query("UPDATE products SET stock = ? WHERE id = ?")
        .bind(new_stock)
        .bind(product_id)
        .execute(&mut *conn)
        .await?;

    Ok(new_stock)
}
