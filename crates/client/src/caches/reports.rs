//! Store report view.

use std::sync::Arc;

use tokio::sync::RwLock;

use shelfline_inventory::StoreReport;

use crate::cache::{Clock, Freshness};
use crate::caches::{Gate, HasStatus, Status, gated};
use crate::error::ClientError;
use crate::http::ApiClient;

#[derive(Debug)]
struct ReportState {
    report: Freshness<StoreReport>,
    status: Status,
}

impl HasStatus for ReportState {
    fn status_mut(&mut self) -> &mut Status {
        &mut self.status
    }
}

fn report_slot(state: &mut ReportState, _: ()) -> &mut Freshness<StoreReport> {
    &mut state.report
}

#[derive(Debug)]
pub struct ReportCache {
    api: ApiClient,
    clock: Arc<dyn Clock>,
    state: RwLock<ReportState>,
}

impl ReportCache {
    pub fn new(api: ApiClient, clock: Arc<dyn Clock>, window: std::time::Duration) -> Self {
        Self {
            api,
            clock,
            state: RwLock::new(ReportState {
                report: Freshness::new(window),
                status: Status::default(),
            }),
        }
    }

    /// `GET /store/reports`, gated by the reports window.
    pub async fn fetch(&self) -> Result<StoreReport, ClientError> {
        gated(
            &self.state,
            self.clock.as_ref(),
            Gate::IfStale,
            (),
            report_slot,
            self.api.store_report(),
        )
        .await
    }

    /// Fetch regardless of freshness.
    pub async fn refresh(&self) -> Result<StoreReport, ClientError> {
        gated(
            &self.state,
            self.clock.as_ref(),
            Gate::Always,
            (),
            report_slot,
            self.api.store_report(),
        )
        .await
    }

    pub async fn invalidate(&self) {
        self.state.write().await.report.invalidate();
    }

    /// Last report fetched, whatever its age.
    pub async fn cached(&self) -> Option<StoreReport> {
        self.state.read().await.report.get().cloned()
    }

    pub async fn status(&self) -> Status {
        self.state.read().await.status.clone()
    }
}
