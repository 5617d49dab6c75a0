//! User repository

use shared::models::User;
use shared::util::now_millis;
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

const USER_COLUMNS: &str =
    "id, phone, password, is_admin, first_name, last_name, gender, profile_updated_at";

pub async fn create(pool: &SqlitePool, phone: &str, password_hash: &str) -> RepoResult<User> {
    let now = now_millis();
    let result: Result<(i64,), sqlx::Error> = sqlx::query_as(
        "INSERT INTO users (phone, password, is_admin, profile_updated_at) VALUES (?, ?, 0, ?) RETURNING id",
    )
    .bind(phone)
    .bind(password_hash)
    .bind(now)
    .fetch_one(pool)
    .await;

    let (id,) = match result {
        Ok(row) => row,
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            return Err(RepoError::Duplicate(format!(
                "Phone {phone} already registered"
            )));
        }
        Err(e) => return Err(e.into()),
    };

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_phone(pool: &SqlitePool, phone: &str) -> RepoResult<Option<User>> {
    let user =
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE phone = ?"))
            .bind(phone)
            .fetch_optional(pool)
            .await?;
    Ok(user)
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<User>> {
    let users = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
        .fetch_all(pool)
        .await?;
    Ok(users)
}

/// Partial profile update; omitted fields keep their value
pub async fn update_profile(
    pool: &SqlitePool,
    id: i64,
    first_name: Option<&str>,
    last_name: Option<&str>,
    gender: Option<&str>,
) -> RepoResult<()> {
    let now = now_millis();
    let rows = sqlx::query(
        r#"
        UPDATE users SET
            first_name = COALESCE(?1, first_name),
            last_name = COALESCE(?2, last_name),
            gender = COALESCE(?3, gender),
            profile_updated_at = ?4
        WHERE id = ?5
        "#,
    )
    .bind(first_name)
    .bind(last_name)
    .bind(gender)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    Ok(())
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
