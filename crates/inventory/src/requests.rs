//! Payloads sent to the mutating endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shelfline_core::{DomainError, DomainResult, ProductId, StoreItemId, WarehouseItemId};

/// `POST /warehouse/items`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWarehouseItem {
    pub product_id: ProductId,
    pub quantity: i64,
    pub batch_code: String,
    pub expire_date: NaiveDate,
}

/// `POST /warehouse/to-store`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveToStore {
    pub warehouse_item_id: WarehouseItemId,
    pub quantity: i64,
    pub price: f64,
}

/// `POST /warehouse/to-store-by-barcode`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveByBarcode {
    pub barcode: String,
    pub quantity: i64,
    pub price: f64,
}

/// `DELETE /warehouse/items`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoveWarehouseItems {
    pub item_ids: Vec<WarehouseItemId>,
}

/// `POST /store/sales`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSale {
    pub store_item_id: StoreItemId,
    pub quantity: i64,
    pub price: f64,
}

/// `POST /store/discount`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplyDiscount {
    pub store_item_id: StoreItemId,
    pub percentage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<NaiveDate>,
}

/// `POST /store/remove/{id}`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RemoveFromStore {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

fn positive_quantity(quantity: i64) -> DomainResult<()> {
    if quantity <= 0 {
        return Err(DomainError::validation("quantity must be positive"));
    }
    Ok(())
}

fn non_negative_price(price: f64) -> DomainResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(DomainError::validation("price must be a non-negative number"));
    }
    Ok(())
}

impl NewWarehouseItem {
    pub fn validate(&self) -> DomainResult<()> {
        positive_quantity(self.quantity)?;
        if self.batch_code.trim().is_empty() {
            return Err(DomainError::validation("batch code cannot be empty"));
        }
        Ok(())
    }
}

impl MoveToStore {
    pub fn validate(&self) -> DomainResult<()> {
        positive_quantity(self.quantity)?;
        non_negative_price(self.price)
    }
}

impl MoveByBarcode {
    pub fn validate(&self) -> DomainResult<()> {
        if self.barcode.trim().is_empty() {
            return Err(DomainError::validation("barcode cannot be empty"));
        }
        positive_quantity(self.quantity)?;
        non_negative_price(self.price)
    }
}

impl RecordSale {
    pub fn validate(&self) -> DomainResult<()> {
        positive_quantity(self.quantity)?;
        non_negative_price(self.price)
    }
}

impl ApplyDiscount {
    pub fn validate(&self) -> DomainResult<()> {
        if !(self.percentage > 0.0 && self.percentage <= 100.0) {
            return Err(DomainError::validation(
                "discount percentage must be within (0, 100]",
            ));
        }
        Ok(())
    }
}
