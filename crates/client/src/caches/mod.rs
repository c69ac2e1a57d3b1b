//! Per-domain client caches: what a dashboard view observes.
//!
//! Every cache follows the same contract:
//! - `fetch_*` returns the cached snapshot while it is fresh, otherwise calls
//!   the backend, replaces the snapshot and stamps it;
//! - a successful mutation patches the cached collection locally and schedules
//!   a background refetch of the views it affects;
//! - a failed call leaves the snapshot untouched and records a user-facing
//!   message in [`Status::error`].
//!
//! Concurrent fetches of the same view are not coalesced.

use std::future::Future;

use tokio::sync::RwLock;

use crate::cache::{Clock, Freshness};
use crate::error::ClientError;

pub mod auth;
pub mod cart;
pub mod prediction;
pub mod reports;
pub mod store;
pub mod warehouse;

pub use auth::AuthCache;
pub use cart::{Cart, CheckoutReport};
pub use prediction::PredictionCache;
pub use reports::ReportCache;
pub use store::StoreCache;
pub use warehouse::WarehouseCache;

/// Loading flag and last error message of a cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    pub loading: bool,
    pub error: Option<String>,
}

pub(crate) trait HasStatus {
    fn status_mut(&mut self) -> &mut Status;
}

/// Whether a fetch may be answered from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Gate {
    IfStale,
    Always,
}

/// Freshness-gated fetch of the slot picked by `slot(state, key)`.
///
/// The lock is never held across the network call.
pub(crate) async fn gated<S, K, T, Fut>(
    state: &RwLock<S>,
    clock: &dyn Clock,
    gate: Gate,
    key: K,
    slot: fn(&mut S, K) -> &mut Freshness<T>,
    fetch: Fut,
) -> Result<T, ClientError>
where
    S: HasStatus,
    K: Copy,
    T: Clone,
    Fut: Future<Output = Result<T, ClientError>>,
{
    {
        let mut guard = state.write().await;
        if gate == Gate::IfStale {
            if let Some(value) = slot(&mut *guard, key).fresh(clock.now()) {
                return Ok(value.clone());
            }
        }
        guard.status_mut().loading = true;
    }

    let result = fetch.await;

    let mut guard = state.write().await;
    guard.status_mut().loading = false;
    match result {
        Ok(value) => {
            slot(&mut *guard, key).replace(value.clone(), clock.now());
            guard.status_mut().error = None;
            Ok(value)
        }
        Err(err) => {
            tracing::warn!(error = %err, "fetch failed; keeping cached snapshot");
            guard.status_mut().error = Some(err.user_message());
            Err(err)
        }
    }
}

/// Mark a mutation as in flight. Success resets the status, failure goes
/// through [`record_failure`].
pub(crate) async fn begin<S: HasStatus>(state: &RwLock<S>) {
    state.write().await.status_mut().loading = true;
}

/// Record a failed mutation without touching cached data.
pub(crate) async fn record_failure<S: HasStatus>(state: &RwLock<S>, action: &str, err: &ClientError) {
    tracing::warn!(%action, error = %err, "mutation failed");
    let mut guard = state.write().await;
    let status = guard.status_mut();
    status.loading = false;
    status.error = Some(err.user_message());
}
