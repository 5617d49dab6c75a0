//! Database access layer
//!
//! Repository functions over a SQLite connection pool. Every function takes
//! the pool (or a transaction handle) explicitly; there is no process-wide
//! database state.

pub mod cart;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod status_jobs;
pub mod users;

use shared::error::{AppError, ErrorCode};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error(
        "Insufficient stock for product {product_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: i64,
        requested: i64,
        available: i64,
    },

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::InsufficientStock {
                product_id,
                requested,
                available,
            } => AppError::new(ErrorCode::InsufficientStock)
                .with_detail("productId", product_id)
                .with_detail("requested", requested)
                .with_detail("available", available),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Validation(msg) => AppError::with_message(ErrorCode::ValidationFailed, msg),
            RepoError::Database(msg) => {
                tracing::error!(error = %msg, "Repository database error");
                AppError::new(ErrorCode::DatabaseError)
            }
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Open the single-file database with WAL mode and apply migrations
pub async fn connect(database_url: &str) -> RepoResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| RepoError::Database(format!("Invalid database URL: {e}")))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .pragma("foreign_keys", "ON")
        // Wait up to 5s on write contention instead of failing
        .busy_timeout(std::time::Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(|e| RepoError::Database(format!("Failed to open database: {e}")))?;

    tracing::info!("Database connection established (SQLite WAL, busy_timeout=5000ms)");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| RepoError::Database(format!("Failed to apply migrations: {e}")))?;
    tracing::info!("Database migrations applied");

    Ok(pool)
}
