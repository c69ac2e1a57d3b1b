use serde::{Deserialize, Serialize};

use shelfline_inventory::{
    MoveByBarcode, MoveToStore, NewWarehouseItem, RemoveWarehouseItems, StoreItem, WarehouseItem,
};

use crate::error::ClientError;
use crate::http::ApiClient;

/// Result of a CSV upload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadSummary {
    pub created: i64,
    pub skipped: i64,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteSummary {
    pub deleted: i64,
}

impl ApiClient {
    /// `GET /warehouse/items`
    pub async fn list_warehouse_items(&self) -> Result<Vec<WarehouseItem>, ClientError> {
        self.get("/warehouse/items").await
    }

    /// `POST /warehouse/items`
    pub async fn create_warehouse_item(
        &self,
        req: &NewWarehouseItem,
    ) -> Result<WarehouseItem, ClientError> {
        self.post("/warehouse/items", req).await
    }

    /// `POST /warehouse/upload` (multipart, field `file`).
    pub async fn upload_warehouse_csv(
        &self,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<UploadSummary, ClientError> {
        let part = reqwest::multipart::Part::bytes(contents)
            .file_name(file_name.to_string())
            .mime_str("text/csv")?;
        let form = reqwest::multipart::Form::new().part("file", part);
        self.post_multipart("/warehouse/upload", form).await
    }

    /// `POST /warehouse/to-store`: returns the store item that received the stock.
    pub async fn move_to_store(&self, req: &MoveToStore) -> Result<StoreItem, ClientError> {
        self.post("/warehouse/to-store", req).await
    }

    /// `POST /warehouse/to-store-by-barcode`
    pub async fn move_by_barcode(&self, req: &MoveByBarcode) -> Result<StoreItem, ClientError> {
        self.post("/warehouse/to-store-by-barcode", req).await
    }

    /// `DELETE /warehouse/items`
    pub async fn delete_warehouse_items(
        &self,
        req: &RemoveWarehouseItems,
    ) -> Result<DeleteSummary, ClientError> {
        self.delete("/warehouse/items", req).await
    }
}
