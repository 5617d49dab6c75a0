//! Review repository

use shared::models::{Review, ReviewWithAuthor};
use shared::util::now_millis;
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

#[derive(sqlx::FromRow)]
struct ReviewAuthorRow {
    id: i64,
    user_id: i64,
    product_id: i64,
    rating: i64,
    comment: Option<String>,
    created_at: i64,
    first_name: Option<String>,
    last_name: Option<String>,
}

impl ReviewAuthorRow {
    fn into_view(self) -> ReviewWithAuthor {
        let name = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        );
        let name = name.trim().to_string();
        ReviewWithAuthor {
            id: self.id,
            user_id: self.user_id,
            product_id: self.product_id,
            rating: self.rating,
            comment: self.comment,
            created_at: self.created_at,
            user_name: if name.is_empty() {
                "Anonymous".to_string()
            } else {
                name
            },
        }
    }
}

pub async fn find_by_product(
    pool: &SqlitePool,
    product_id: i64,
) -> RepoResult<Vec<ReviewWithAuthor>> {
    let rows = sqlx::query_as::<_, ReviewAuthorRow>(
        r#"
        SELECT r.id, r.user_id, r.product_id, r.rating, r.comment, r.created_at,
               u.first_name, u.last_name
        FROM reviews r
        JOIN users u ON r.user_id = u.id
        WHERE r.product_id = ?
        ORDER BY r.created_at DESC, r.id DESC
        "#,
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(ReviewAuthorRow::into_view).collect())
}

pub async fn find_by_user_and_product(
    pool: &SqlitePool,
    user_id: i64,
    product_id: i64,
) -> RepoResult<Option<Review>> {
    let review = sqlx::query_as::<_, Review>(
        "SELECT id, user_id, product_id, rating, comment, created_at FROM reviews WHERE user_id = ? AND product_id = ?",
    )
    .bind(user_id)
    .bind(product_id)
    .fetch_optional(pool)
    .await?;
    Ok(review)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Review>> {
    let review = sqlx::query_as::<_, Review>(
        "SELECT id, user_id, product_id, rating, comment, created_at FROM reviews WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(review)
}

pub async fn create(
    pool: &SqlitePool,
    user_id: i64,
    product_id: i64,
    rating: i64,
    comment: Option<&str>,
) -> RepoResult<Review> {
    let now = now_millis();
    let result: Result<(i64,), sqlx::Error> = sqlx::query_as(
        "INSERT INTO reviews (user_id, product_id, rating, comment, created_at) VALUES (?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(user_id)
    .bind(product_id)
    .bind(rating)
    .bind(comment)
    .bind(now)
    .fetch_one(pool)
    .await;

    let (id,) = match result {
        Ok(row) => row,
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            return Err(RepoError::Duplicate(
                "You have already reviewed this product".into(),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Review {
        id,
        user_id,
        product_id,
        rating,
        comment: comment.map(str::to_string),
        created_at: now,
    })
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM reviews WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Review {id} not found")));
    }
    Ok(())
}
