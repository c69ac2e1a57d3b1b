//! `shelfline-client`: typed access to the inventory backend with
//! freshness-gated, optimistically patched client caches.
//!
//! The backend stays the authority for every number. The caches here only keep
//! the last snapshot per view, skip the network while that snapshot is younger
//! than its freshness window, and patch it locally after a mutation succeeds.

pub mod api;
pub mod cache;
pub mod caches;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod http;
pub mod navigation;
pub mod refresh;

pub use cache::{Clock, Freshness, Keyed, ManualClock, SystemClock};
pub use caches::{
    AuthCache, Cart, CheckoutReport, PredictionCache, ReportCache, Status, StoreCache,
    WarehouseCache,
};
pub use config::{ClientConfig, FreshnessWindows};
pub use dashboard::Dashboard;
pub use error::{ClientError, GENERIC_ERROR_MESSAGE};
pub use http::ApiClient;
pub use navigation::{Navigator, NoopNavigator, RecordingNavigator};
pub use refresh::Refresher;
