//! Periodic purge of expired dashboard sessions.
//!
//! Expired sessions are already rejected on access; this job reclaims the
//! memory of sessions that are never presented again.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::session::SessionStore;

/// Run the session sweep loop until `cancel` is triggered.
pub async fn run(sessions: Arc<SessionStore>, interval: Duration, cancel: CancellationToken) {
    tracing::info!(interval_secs = interval.as_secs(), "Session sweeper started");

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Session sweeper stopping");
                break;
            }
            _ = ticker.tick() => {
                let purged = sessions.purge_expired(Utc::now()).await;
                if purged > 0 {
                    tracing::info!(purged, "Session sweeper: purged expired sessions");
                } else {
                    tracing::debug!("Session sweeper: nothing to purge");
                }
            }
        }
    }
}
