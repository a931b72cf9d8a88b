//! Expired Transient Purge Task
//!
//! Background task that periodically removes expired transients, so entries
//! nobody reads again do not linger in the options table.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::store::MemoryBackend;

/// Spawns a background task that periodically purges expired transients.
///
/// # Arguments
/// * `backend` - Shared backend to purge
/// * `purge_interval_secs` - Interval in seconds between purge runs
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let backend = Arc::new(MemoryBackend::new());
/// let purge_handle = spawn_purge_task(backend.clone(), 60);
/// // Later, during shutdown:
/// purge_handle.abort();
/// ```
pub fn spawn_purge_task(backend: Arc<MemoryBackend>, purge_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(purge_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting transient purge task with interval of {} seconds",
            purge_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            match backend.purge_expired() {
                Ok(0) => debug!("Transient purge: no expired entries found"),
                Ok(removed) => info!("Transient purge: removed {} expired entries", removed),
                Err(e) => warn!("Transient purge failed: {}", e),
            }
        }
    })
}
