//! Application state

use sqlx::SqlitePool;

use crate::config::Config;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool, passed explicitly to every repository call
    pub pool: SqlitePool,
    /// JWT secret for user authentication
    pub jwt_secret: String,
    /// Delay before the status worker advances a fresh order, in milliseconds
    pub status_advance_delay_ms: i64,
}

impl AppState {
    /// Create a new AppState: open the database and apply migrations
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = crate::db::connect(&config.database_url).await?;

        Ok(Self {
            pool,
            jwt_secret: config.jwt_secret.clone(),
            status_advance_delay_ms: (config.status_advance_delay_secs * 1000) as i64,
        })
    }
}
