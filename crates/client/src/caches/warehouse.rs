//! Warehouse view: inbound batches awaiting transfer to the floor.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use shelfline_core::WarehouseItemId;
use shelfline_inventory::{
    MoveByBarcode, MoveToStore, NewWarehouseItem, RemoveWarehouseItems, StoreItem, WarehouseItem,
    apply_move, retain_except,
};

use crate::api::{DeleteSummary, UploadSummary};
use crate::cache::{Clock, Freshness};
use crate::caches::store::StoreCache;
use crate::caches::{Gate, HasStatus, Status, begin, gated, record_failure};
use crate::error::ClientError;
use crate::http::ApiClient;
use crate::refresh::Refresher;

#[derive(Debug)]
struct WarehouseState {
    items: Freshness<Vec<WarehouseItem>>,
    status: Status,
}

impl HasStatus for WarehouseState {
    fn status_mut(&mut self) -> &mut Status {
        &mut self.status
    }
}

fn items_slot(state: &mut WarehouseState, _: ()) -> &mut Freshness<Vec<WarehouseItem>> {
    &mut state.items
}

#[derive(Debug)]
pub struct WarehouseCache {
    api: ApiClient,
    clock: Arc<dyn Clock>,
    refresher: Refresher,
    store: Arc<StoreCache>,
    state: RwLock<WarehouseState>,
}

impl WarehouseCache {
    pub fn new(
        api: ApiClient,
        clock: Arc<dyn Clock>,
        refresher: Refresher,
        store: Arc<StoreCache>,
        window: Duration,
    ) -> Self {
        Self {
            api,
            clock,
            refresher,
            store,
            state: RwLock::new(WarehouseState {
                items: Freshness::new(window),
                status: Status::default(),
            }),
        }
    }

    /// Warehouse batches, gated by the warehouse window.
    pub async fn fetch_items(&self) -> Result<Vec<WarehouseItem>, ClientError> {
        gated(
            &self.state,
            self.clock.as_ref(),
            Gate::IfStale,
            (),
            items_slot,
            self.api.list_warehouse_items(),
        )
        .await
    }

    pub async fn refresh_items(&self) -> Result<Vec<WarehouseItem>, ClientError> {
        gated(
            &self.state,
            self.clock.as_ref(),
            Gate::Always,
            (),
            items_slot,
            self.api.list_warehouse_items(),
        )
        .await
    }

    pub async fn cached_items(&self) -> Vec<WarehouseItem> {
        self.state.read().await.items.get().cloned().unwrap_or_default()
    }

    pub async fn status(&self) -> Status {
        self.state.read().await.status.clone()
    }

    pub async fn add_item(&self, req: NewWarehouseItem) -> Result<WarehouseItem, ClientError> {
        if let Err(err) = req.validate() {
            let err = ClientError::from(err);
            record_failure(&self.state, "add warehouse item", &err).await;
            return Err(err);
        }

        begin(&self.state).await;
        match self.api.create_warehouse_item(&req).await {
            Ok(item) => {
                let mut state = self.state.write().await;
                state.status = Status::default();
                let added = item.clone();
                state.items.patch(|items| items.push(added));
                Ok(item)
            }
            Err(err) => {
                record_failure(&self.state, "add warehouse item", &err).await;
                Err(err)
            }
        }
    }

    /// Bulk import. The server decides what was created, so the snapshot is
    /// refetched instead of patched. A failed refetch does not fail the upload;
    /// the snapshot stays invalidated and the next fetch retries.
    pub async fn upload_csv(
        &self,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<UploadSummary, ClientError> {
        begin(&self.state).await;
        match self.api.upload_warehouse_csv(file_name, contents).await {
            Ok(summary) => {
                {
                    let mut state = self.state.write().await;
                    state.status = Status::default();
                    state.items.invalidate();
                }
                tracing::info!(created = summary.created, skipped = summary.skipped, "warehouse upload accepted");
                if let Err(err) = self.refresh_items().await {
                    tracing::warn!(error = %err, "warehouse refetch after upload failed; snapshot left stale");
                    self.state.write().await.status = Status::default();
                }
                Ok(summary)
            }
            Err(err) => {
                record_failure(&self.state, "upload warehouse csv", &err).await;
                Err(err)
            }
        }
    }

    /// Move `quantity` units of a batch onto the floor at `price`.
    pub async fn move_to_store(
        &self,
        item_id: WarehouseItemId,
        quantity: i64,
        price: f64,
    ) -> Result<StoreItem, ClientError> {
        let req = MoveToStore {
            warehouse_item_id: item_id,
            quantity,
            price,
        };
        if let Err(err) = req.validate() {
            let err = ClientError::from(err);
            record_failure(&self.state, "move to store", &err).await;
            return Err(err);
        }

        begin(&self.state).await;
        match self.api.move_to_store(&req).await {
            Ok(store_item) => {
                let mut state = self.state.write().await;
                state.status = Status::default();
                if let Some(Err(err)) = state.items.patch(|items| apply_move(items, item_id, quantity)) {
                    tracing::debug!(%item_id, error = %err, "moved batch not in cached snapshot");
                }
                drop(state);

                self.schedule_store_refresh().await;
                Ok(store_item)
            }
            Err(err) => {
                record_failure(&self.state, "move to store", &err).await;
                Err(err)
            }
        }
    }

    /// Move by scanned barcode. The backend picks the batch, so the warehouse
    /// snapshot is invalidated rather than patched.
    pub async fn move_by_barcode(
        &self,
        barcode: &str,
        quantity: i64,
        price: f64,
    ) -> Result<StoreItem, ClientError> {
        let req = MoveByBarcode {
            barcode: barcode.trim().to_string(),
            quantity,
            price,
        };
        if let Err(err) = req.validate() {
            let err = ClientError::from(err);
            record_failure(&self.state, "move by barcode", &err).await;
            return Err(err);
        }

        begin(&self.state).await;
        match self.api.move_by_barcode(&req).await {
            Ok(store_item) => {
                {
                    let mut state = self.state.write().await;
                    state.status = Status::default();
                    state.items.invalidate();
                }
                self.schedule_store_refresh().await;
                Ok(store_item)
            }
            Err(err) => {
                record_failure(&self.state, "move by barcode", &err).await;
                Err(err)
            }
        }
    }

    pub async fn remove_items(
        &self,
        item_ids: Vec<WarehouseItemId>,
    ) -> Result<DeleteSummary, ClientError> {
        let req = RemoveWarehouseItems { item_ids };
        begin(&self.state).await;
        match self.api.delete_warehouse_items(&req).await {
            Ok(summary) => {
                let mut state = self.state.write().await;
                state.status = Status::default();
                let dropped = state.items.patch(|items| retain_except(items, &req.item_ids));
                tracing::info!(deleted = summary.deleted, dropped_locally = dropped.unwrap_or(0), "warehouse items removed");
                Ok(summary)
            }
            Err(err) => {
                record_failure(&self.state, "remove warehouse items", &err).await;
                Err(err)
            }
        }
    }

    async fn schedule_store_refresh(&self) {
        self.store.invalidate_items().await;
        let store = Arc::clone(&self.store);
        self.refresher.schedule("store items", async move {
            store.refresh_items().await.map(|_| ())
        });
    }
}
