//! apteka-server, the pharmacy storefront backend
//!
//! Long-running HTTP service:
//! - Serves the storefront REST API (catalog, cart, orders, reviews, accounts)
//! - Runs the status worker that advances fresh orders through fulfilment

use apteka_server::workers::StatusWorker;
use apteka_server::{AppState, Config, api};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "apteka_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting apteka-server (env: {})", config.environment);

    // Initialize application state (opens the database, runs migrations)
    let state = AppState::new(&config).await?;

    // Background status worker: picks up persisted status jobs, including
    // any left over from a previous run
    tokio::spawn(StatusWorker::new(state.pool.clone()).run());

    let app = api::create_router(state);

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("apteka-server listening on {http_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
