//! Persisted delayed status transitions
//!
//! Each row is a one-shot "advance this order at T" task. Pending rows
//! survive a restart; the status worker drains the due ones.

use shared::util::now_millis;
use sqlx::SqlitePool;

use super::RepoResult;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StatusJob {
    pub id: i64,
    pub order_id: i64,
    pub due_at: i64,
    pub created_at: i64,
}

/// Arm a one-shot status advance for an order
pub async fn schedule(pool: &SqlitePool, order_id: i64, due_at: i64) -> RepoResult<i64> {
    let now = now_millis();
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO order_status_jobs (order_id, due_at, created_at) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(order_id)
    .bind(due_at)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// Jobs whose due time has passed, oldest first
pub async fn find_due(pool: &SqlitePool, now: i64) -> RepoResult<Vec<StatusJob>> {
    let jobs = sqlx::query_as::<_, StatusJob>(
        "SELECT id, order_id, due_at, created_at FROM order_status_jobs WHERE due_at <= ? ORDER BY due_at, id",
    )
    .bind(now)
    .fetch_all(pool)
    .await?;
    Ok(jobs)
}

pub async fn remove(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    sqlx::query("DELETE FROM order_status_jobs WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn pending_count(pool: &SqlitePool) -> RepoResult<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM order_status_jobs")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
