//! Periodic cleanup of expired sessions.
//!
//! Expiry is already enforced lazily at refresh time; this job only keeps
//! the session table from accumulating dead rows. Runs on a fixed interval
//! using `tokio::time::interval`.

use std::sync::Arc;
use std::time::Duration;

use agora_core::engine::AuthEngine;
use tokio_util::sync::CancellationToken;

/// Run the session sweep loop until `cancel` is triggered.
pub async fn run(engine: Arc<AuthEngine>, interval_secs: u64, cancel: CancellationToken) {
    tracing::info!(interval_secs, "Session sweep job started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Session sweep job stopping");
                break;
            }
            _ = interval.tick() => {
                match engine.sweep_expired_sessions().await {
                    Ok(deleted) => {
                        if deleted > 0 {
                            tracing::info!(deleted, "Session sweep: purged expired sessions");
                        } else {
                            tracing::debug!("Session sweep: nothing to purge");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Session sweep failed");
                    }
                }
            }
        }
    }
}
