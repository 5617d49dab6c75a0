//! Server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection URL (single-file database)
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// JWT signing secret
    pub jwt_secret: String,
    /// Environment: development | staging | production
    pub environment: String,
    /// Delay before an order is automatically advanced to its next status
    pub status_advance_delay_secs: u64,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:database.db".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            environment,
            status_advance_delay_secs: std::env::var("STATUS_ADVANCE_DELAY_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(20),
        })
    }
}
