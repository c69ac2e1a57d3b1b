//! One handle wiring every cache to a shared client, session and clock.

use std::sync::Arc;

use shelfline_auth::Session;

use crate::cache::{Clock, SystemClock};
use crate::caches::{AuthCache, Cart, PredictionCache, ReportCache, StoreCache, WarehouseCache};
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::http::ApiClient;
use crate::navigation::Navigator;
use crate::refresh::Refresher;

/// Everything a dashboard front end needs.
///
/// Dependent views are wired here: warehouse moves refresh store items, store
/// mutations refresh reports.
#[derive(Debug)]
pub struct Dashboard {
    pub api: ApiClient,
    pub auth: AuthCache,
    pub warehouse: Arc<WarehouseCache>,
    pub store: Arc<StoreCache>,
    pub reports: Arc<ReportCache>,
    pub predictions: PredictionCache,
    refresher: Refresher,
}

impl Dashboard {
    pub fn new(
        config: &ClientConfig,
        session: Arc<Session>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ClientError> {
        Self::with_clock(config, session, navigator, Arc::new(SystemClock))
    }

    pub fn with_clock(
        config: &ClientConfig,
        session: Arc<Session>,
        navigator: Arc<dyn Navigator>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ClientError> {
        let api = ApiClient::new(config, session, navigator)?;
        let refresher = Refresher::new(config.refetch_delay);
        let windows = &config.freshness;

        let reports = Arc::new(ReportCache::new(api.clone(), clock.clone(), windows.reports));
        let store = Arc::new(StoreCache::new(
            api.clone(),
            clock.clone(),
            refresher.clone(),
            reports.clone(),
            windows.store,
        ));
        let warehouse = Arc::new(WarehouseCache::new(
            api.clone(),
            clock.clone(),
            refresher.clone(),
            store.clone(),
            windows.warehouse,
        ));
        let predictions = PredictionCache::new(api.clone(), clock, windows.predictions);

        Ok(Self {
            auth: AuthCache::new(api.clone()),
            api,
            warehouse,
            store,
            reports,
            predictions,
            refresher,
        })
    }

    /// A fresh, empty point-of-sale cart.
    pub fn cart(&self) -> Cart {
        Cart::new()
    }

    /// Wait for all background refetches scheduled so far.
    pub async fn settle(&self) {
        self.refresher.settle().await;
    }
}
