//! Sales-floor view: active store items and the sales log.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tokio::sync::RwLock;

use shelfline_core::{DomainResult, StoreItemId};
use shelfline_inventory::{
    ApplyDiscount, Discount, RecordSale, RemoveFromStore, RemovedItem, Sale, StoreItem,
    apply_discount, apply_expiry, apply_removal, apply_sale,
};

use crate::api::NewStoreItem;
use crate::cache::{Clock, Freshness};
use crate::caches::reports::ReportCache;
use crate::caches::{Gate, HasStatus, Status, begin, gated, record_failure};
use crate::error::ClientError;
use crate::http::ApiClient;
use crate::refresh::Refresher;

#[derive(Debug)]
struct StoreState {
    items: Freshness<Vec<StoreItem>>,
    sales: Freshness<Vec<Sale>>,
    status: Status,
}

impl HasStatus for StoreState {
    fn status_mut(&mut self) -> &mut Status {
        &mut self.status
    }
}

fn items_slot(state: &mut StoreState, _: ()) -> &mut Freshness<Vec<StoreItem>> {
    &mut state.items
}

fn sales_slot(state: &mut StoreState, _: ()) -> &mut Freshness<Vec<Sale>> {
    &mut state.sales
}

/// Log a patch that could not find its record. The server accepted the
/// mutation, so the next refetch will reconcile.
fn note_patch<T>(action: &str, id: StoreItemId, patched: Option<DomainResult<T>>) {
    match patched {
        Some(Err(err)) => tracing::debug!(%action, %id, error = %err, "item not in cached snapshot"),
        None => tracing::debug!(%action, %id, "no snapshot to patch yet"),
        Some(Ok(_)) => {}
    }
}

#[derive(Debug)]
pub struct StoreCache {
    api: ApiClient,
    clock: Arc<dyn Clock>,
    refresher: Refresher,
    reports: Arc<ReportCache>,
    state: RwLock<StoreState>,
}

impl StoreCache {
    pub fn new(
        api: ApiClient,
        clock: Arc<dyn Clock>,
        refresher: Refresher,
        reports: Arc<ReportCache>,
        window: Duration,
    ) -> Self {
        Self {
            api,
            clock,
            refresher,
            reports,
            state: RwLock::new(StoreState {
                items: Freshness::new(window),
                sales: Freshness::new(window),
                status: Status::default(),
            }),
        }
    }

    /// Active store items, gated by the store window.
    pub async fn fetch_items(&self) -> Result<Vec<StoreItem>, ClientError> {
        gated(
            &self.state,
            self.clock.as_ref(),
            Gate::IfStale,
            (),
            items_slot,
            self.api.list_store_items(),
        )
        .await
    }

    /// Active store items straight from the backend.
    pub async fn refresh_items(&self) -> Result<Vec<StoreItem>, ClientError> {
        gated(
            &self.state,
            self.clock.as_ref(),
            Gate::Always,
            (),
            items_slot,
            self.api.list_store_items(),
        )
        .await
    }

    pub async fn fetch_sales(&self) -> Result<Vec<Sale>, ClientError> {
        gated(
            &self.state,
            self.clock.as_ref(),
            Gate::IfStale,
            (),
            sales_slot,
            self.api.list_sales(),
        )
        .await
    }

    pub async fn invalidate_items(&self) {
        self.state.write().await.items.invalidate();
    }

    pub async fn cached_items(&self) -> Vec<StoreItem> {
        self.state.read().await.items.get().cloned().unwrap_or_default()
    }

    pub async fn cached_sales(&self) -> Vec<Sale> {
        self.state.read().await.sales.get().cloned().unwrap_or_default()
    }

    pub async fn status(&self) -> Status {
        self.state.read().await.status.clone()
    }

    /// Put stock on the floor directly.
    pub async fn create_item(&self, req: NewStoreItem) -> Result<StoreItem, ClientError> {
        begin(&self.state).await;
        match self.api.create_store_item(&req).await {
            Ok(item) => {
                let mut state = self.state.write().await;
                state.status = Status::default();
                let created = item.clone();
                state.items.patch(|items| items.push(created));
                drop(state);
                self.schedule_report_refresh().await;
                Ok(item)
            }
            Err(err) => {
                record_failure(&self.state, "create store item", &err).await;
                Err(err)
            }
        }
    }

    /// Record a sale; the cached item loses `quantity` units or disappears when
    /// none are left.
    pub async fn record_sale(
        &self,
        item_id: StoreItemId,
        quantity: i64,
        price: f64,
    ) -> Result<Sale, ClientError> {
        let req = RecordSale {
            store_item_id: item_id,
            quantity,
            price,
        };
        if let Err(err) = req.validate() {
            let err = ClientError::from(err);
            record_failure(&self.state, "record sale", &err).await;
            return Err(err);
        }

        begin(&self.state).await;
        match self.api.record_sale(&req).await {
            Ok(sale) => {
                let mut state = self.state.write().await;
                state.status = Status::default();
                let patched = state.items.patch(|items| apply_sale(items, item_id, quantity));
                let logged = sale.clone();
                state.sales.patch(|sales| sales.push(logged));
                drop(state);

                note_patch("record sale", item_id, patched);
                tracing::info!(%item_id, quantity, price, "sale recorded");
                self.schedule_report_refresh().await;
                Ok(sale)
            }
            Err(err) => {
                record_failure(&self.state, "record sale", &err).await;
                Err(err)
            }
        }
    }

    pub async fn apply_discount(
        &self,
        item_id: StoreItemId,
        percentage: f64,
        ends_at: Option<NaiveDate>,
    ) -> Result<Discount, ClientError> {
        let req = ApplyDiscount {
            store_item_id: item_id,
            percentage,
            ends_at,
        };
        if let Err(err) = req.validate() {
            let err = ClientError::from(err);
            record_failure(&self.state, "apply discount", &err).await;
            return Err(err);
        }

        begin(&self.state).await;
        match self.api.apply_discount(&req).await {
            Ok(discount) => {
                let mut state = self.state.write().await;
                state.status = Status::default();
                let attached = discount.clone();
                let patched = state.items.patch(|items| apply_discount(items, attached));
                drop(state);

                note_patch("apply discount", item_id, patched);
                self.schedule_report_refresh().await;
                Ok(discount)
            }
            Err(err) => {
                record_failure(&self.state, "apply discount", &err).await;
                Err(err)
            }
        }
    }

    /// Mark an item expired; it leaves the active collection.
    pub async fn expire_item(&self, item_id: StoreItemId) -> Result<StoreItem, ClientError> {
        begin(&self.state).await;
        match self.api.expire_store_item(item_id).await {
            Ok(item) => {
                let mut state = self.state.write().await;
                state.status = Status::default();
                let patched = state.items.patch(|items| apply_expiry(items, item_id));
                drop(state);

                note_patch("expire item", item_id, patched);
                self.schedule_report_refresh().await;
                Ok(item)
            }
            Err(err) => {
                record_failure(&self.state, "expire item", &err).await;
                Err(err)
            }
        }
    }

    /// Write an item off the floor; it leaves the active collection.
    pub async fn remove_item(
        &self,
        item_id: StoreItemId,
        reason: Option<String>,
    ) -> Result<RemovedItem, ClientError> {
        let req = RemoveFromStore { reason };
        begin(&self.state).await;
        match self.api.remove_store_item(item_id, &req).await {
            Ok(removed) => {
                let mut state = self.state.write().await;
                state.status = Status::default();
                let patched = state.items.patch(|items| apply_removal(items, item_id));
                drop(state);

                note_patch("remove item", item_id, patched);
                self.schedule_report_refresh().await;
                Ok(removed)
            }
            Err(err) => {
                record_failure(&self.state, "remove item", &err).await;
                Err(err)
            }
        }
    }

    /// Reports go stale at once; the refetch itself runs after the refresher's
    /// delay to give the backend time to catch up.
    async fn schedule_report_refresh(&self) {
        self.reports.invalidate().await;
        let reports = Arc::clone(&self.reports);
        self.refresher.schedule("store reports", async move {
            reports.refresh().await.map(|_| ())
        });
    }
}
