//! Delayed background refetches triggered by mutations.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::error::ClientError;

/// Spawns refetches of dependent views after a fixed delay.
///
/// The mutation that schedules a refresh does not wait for it; views may show
/// the optimistic patch briefly before the server's copy lands. Call
/// [`Refresher::settle`] to wait for everything scheduled so far.
#[derive(Clone, Debug)]
pub struct Refresher {
    delay: Duration,
    pending: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl Refresher {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `refetch` on the tokio runtime after the configured delay. Failures
    /// are logged; the owning cache records its own error state.
    pub fn schedule<F>(&self, label: &'static str, refetch: F)
    where
        F: Future<Output = Result<(), ClientError>> + Send + 'static,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            match refetch.await {
                Ok(()) => tracing::debug!(%label, "background refetch done"),
                Err(err) => tracing::warn!(%label, error = %err, "background refetch failed"),
            }
        });

        if let Ok(mut pending) = self.pending.lock() {
            pending.retain(|h| !h.is_finished());
            pending.push(handle);
        }
    }

    /// Number of scheduled refetches that have not finished yet.
    pub fn in_flight(&self) -> usize {
        self.pending
            .lock()
            .map(|p| p.iter().filter(|h| !h.is_finished()).count())
            .unwrap_or(0)
    }

    /// Wait until every refetch scheduled so far (including ones scheduled by
    /// those refetches) has finished.
    pub async fn settle(&self) {
        loop {
            let batch: Vec<JoinHandle<()>> = match self.pending.lock() {
                Ok(mut pending) => pending.drain(..).collect(),
                Err(_) => return,
            };
            if batch.is_empty() {
                return;
            }
            for handle in batch {
                if let Err(err) = handle.await {
                    tracing::error!(error = %err, "background refetch panicked");
                }
            }
        }
    }
}
