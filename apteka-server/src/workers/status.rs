//! Status worker: drains persisted order status jobs
//!
//! Each job advances one order a single step through the fulfilment
//! sequence. Best-effort: failures are logged and never surfaced to any
//! caller. Jobs live in the database, so transitions pending at shutdown
//! are picked up on the next run.

use shared::models::OrderStatus;
use shared::util::now_millis;
use sqlx::SqlitePool;
use std::time::Duration;

use crate::db::status_jobs::{self, StatusJob};
use crate::db::{RepoError, orders};

const POLL_INTERVAL_MS: u64 = 1000;

/// Worker polling `order_status_jobs` for due transitions
pub struct StatusWorker {
    pool: SqlitePool,
}

impl StatusWorker {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Run the worker loop
    pub async fn run(self) {
        match status_jobs::pending_count(&self.pool).await {
            Ok(0) => {}
            Ok(n) => tracing::info!(count = n, "Recovered pending status jobs"),
            Err(e) => tracing::error!(error = %e, "Failed to count pending status jobs"),
        }

        let mut interval = tokio::time::interval(Duration::from_millis(POLL_INTERVAL_MS));
        loop {
            interval.tick().await;
            self.process_due_jobs().await;
        }
    }

    /// Drain every job whose due time has passed
    pub async fn process_due_jobs(&self) {
        let due = match status_jobs::find_due(&self.pool, now_millis()).await {
            Ok(jobs) => jobs,
            Err(e) => {
                tracing::error!(error = %e, "Failed to query due status jobs");
                return;
            }
        };

        for job in due {
            self.process_job(&job).await;
        }
    }

    async fn process_job(&self, job: &StatusJob) {
        match orders::find_by_id(&self.pool, job.order_id).await {
            Ok(Some(order)) => {
                if order.order_status.is_terminal() {
                    tracing::debug!(
                        order_id = job.order_id,
                        status = %order.order_status,
                        "Order already terminal, dropping status job"
                    );
                } else {
                    let next = order.order_status.next().unwrap_or(OrderStatus::Shipped);
                    match orders::update_status(&self.pool, job.order_id, next).await {
                        Ok(()) => tracing::info!(
                            order_id = job.order_id,
                            from = %order.order_status,
                            to = %next,
                            "Advanced order status"
                        ),
                        Err(RepoError::NotFound(_)) => tracing::warn!(
                            order_id = job.order_id,
                            "Order disappeared before scheduled status advance"
                        ),
                        Err(e) => tracing::warn!(
                            order_id = job.order_id,
                            error = %e,
                            "Failed to advance order status"
                        ),
                    }
                }
            }
            Ok(None) => {
                tracing::warn!(
                    order_id = job.order_id,
                    "Order missing for scheduled status advance"
                );
            }
            Err(e) => {
                // Keep the job; the next poll retries it
                tracing::error!(
                    order_id = job.order_id,
                    error = %e,
                    "Failed to load order for status job"
                );
                return;
            }
        }

        if let Err(e) = status_jobs::remove(&self.pool, job.id).await {
            tracing::error!(job_id = job.id, error = %e, "Failed to remove status job");
        }
    }
}
