use serde::{Deserialize, Serialize};

use shelfline_core::{ProductId, StoreItemId};
use shelfline_inventory::{
    ApplyDiscount, Discount, RecordSale, RemoveFromStore, RemovedItem, Sale, StoreItem,
    StoreReport,
};

use crate::error::ClientError;
use crate::http::ApiClient;

/// `POST /store/items`: stock placed directly on the floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStoreItem {
    pub product_id: ProductId,
    pub quantity: i64,
    pub price: f64,
}

impl ApiClient {
    /// `GET /store/items?status=active`
    pub async fn list_store_items(&self) -> Result<Vec<StoreItem>, ClientError> {
        self.get("/store/items?status=active").await
    }

    /// `POST /store/items`
    pub async fn create_store_item(&self, req: &NewStoreItem) -> Result<StoreItem, ClientError> {
        self.post("/store/items", req).await
    }

    /// `GET /store/sales`
    pub async fn list_sales(&self) -> Result<Vec<Sale>, ClientError> {
        self.get("/store/sales").await
    }

    /// `POST /store/sales`
    pub async fn record_sale(&self, req: &RecordSale) -> Result<Sale, ClientError> {
        self.post("/store/sales", req).await
    }

    /// `POST /store/discount`
    pub async fn apply_discount(&self, req: &ApplyDiscount) -> Result<Discount, ClientError> {
        self.post("/store/discount", req).await
    }

    /// `POST /store/expire/{id}`
    pub async fn expire_store_item(&self, id: StoreItemId) -> Result<StoreItem, ClientError> {
        self.post_empty(&format!("/store/expire/{id}")).await
    }

    /// `POST /store/remove/{id}`
    pub async fn remove_store_item(
        &self,
        id: StoreItemId,
        req: &RemoveFromStore,
    ) -> Result<RemovedItem, ClientError> {
        self.post(&format!("/store/remove/{id}"), req).await
    }

    /// `GET /store/reports`
    pub async fn store_report(&self) -> Result<StoreReport, ClientError> {
        self.get("/store/reports").await
    }
}
