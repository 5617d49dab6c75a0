//! Cart repository

use shared::models::CartLine;
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

/// The user's cart joined with live product data
pub async fn lines_for_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<CartLine>> {
    let lines = sqlx::query_as::<_, CartLine>(
        r#"
        SELECT p.id AS id, p.title, p.price, p.image_url, ci.quantity
        FROM cart_items ci
        JOIN products p ON ci.product_id = p.id
        WHERE ci.user_id = ?
        ORDER BY ci.id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(lines)
}

/// Add a product to the cart; an existing row has its quantity incremented
pub async fn add_item(
    pool: &SqlitePool,
    user_id: i64,
    product_id: i64,
    quantity: i64,
) -> RepoResult<()> {
    if quantity <= 0 {
        return Err(RepoError::Validation(format!(
            "Quantity must be positive: {quantity}"
        )));
    }

    sqlx::query(
        r#"
        INSERT INTO cart_items (user_id, product_id, quantity)
        VALUES (?, ?, ?)
        ON CONFLICT (user_id, product_id)
        DO UPDATE SET quantity = quantity + excluded.quantity
        "#,
    )
    .bind(user_id)
    .bind(product_id)
    .bind(quantity)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn set_quantity(
    pool: &SqlitePool,
    user_id: i64,
    product_id: i64,
    quantity: i64,
) -> RepoResult<()> {
    let rows =
        sqlx::query("UPDATE cart_items SET quantity = ? WHERE user_id = ? AND product_id = ?")
            .bind(quantity)
            .bind(user_id)
            .bind(product_id)
            .execute(pool)
            .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Cart item for product {product_id} not found"
        )));
    }
    Ok(())
}

/// Remove a product from the cart (no-op when absent)
pub async fn remove_item(pool: &SqlitePool, user_id: i64, product_id: i64) -> RepoResult<()> {
    sqlx::query("DELETE FROM cart_items WHERE user_id = ? AND product_id = ?")
        .bind(user_id)
        .bind(product_id)
        .execute(pool)
        .await?;
    Ok(())
}
