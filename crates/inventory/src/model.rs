//! Warehouse, store and point-of-sale records.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use shelfline_core::{DiscountId, Entity, ProductId, SaleId, StoreItemId, WarehouseItemId};

use crate::display::calculate_discount_price;

/// Product reference embedded in warehouse and store records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRef {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarehouseItemStatus {
    InStock,
    Moved,
    Discarded,
}

/// Expiry-proximity classification, computed by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    #[default]
    Normal,
    Urgent,
    Critical,
}

/// Inbound batch held in the warehouse, not yet for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseItem {
    pub id: WarehouseItemId,
    pub product: ProductRef,
    pub quantity: i64,
    pub batch_code: String,
    pub expire_date: NaiveDate,
    pub status: WarehouseItemStatus,
    #[serde(default)]
    pub urgency_level: UrgencyLevel,
    #[serde(default)]
    pub received_at: Option<NaiveDateTime>,
}

impl Entity for WarehouseItem {
    type Id = WarehouseItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreItemStatus {
    Active,
    Expired,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discount {
    pub id: DiscountId,
    pub store_item_id: StoreItemId,
    pub percentage: f64,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub starts_at: Option<NaiveDateTime>,
    /// Sent as a bare date; the backend may echo it back that way.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub ends_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<NaiveDateTime>,
}

/// Accepts naive date-times, RFC 3339 timestamps (kept in UTC) and bare dates
/// (midnight).
fn lenient_timestamp<'de, D>(de: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(de)? else {
        return Ok(None);
    };
    parse_timestamp(&raw)
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp `{raw}`")))
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(ts) = raw.parse::<NaiveDateTime>() {
        return Some(ts);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_utc());
    }
    raw.parse::<NaiveDate>().ok().and_then(|d| d.and_hms_opt(0, 0, 0))
}

impl Entity for Discount {
    type Id = DiscountId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Unit on the sales floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreItem {
    pub id: StoreItemId,
    pub product: ProductRef,
    pub quantity: i64,
    pub price: f64,
    pub status: StoreItemStatus,
    #[serde(default)]
    pub moved_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub discounts: Vec<Discount>,
}

impl StoreItem {
    /// Largest discount currently attached, in percent.
    pub fn best_discount(&self) -> Option<f64> {
        self.discounts
            .iter()
            .map(|d| d.percentage)
            .fold(None, |acc: Option<f64>, p| Some(acc.map_or(p, |a| a.max(p))))
    }

    /// Shelf price after the best discount. Display only.
    pub fn effective_price(&self) -> f64 {
        match self.best_discount() {
            Some(pct) => calculate_discount_price(self.price, pct),
            None => self.price,
        }
    }
}

impl Entity for StoreItem {
    type Id = StoreItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    pub store_item_id: StoreItemId,
    pub quantity: i64,
    pub price: f64,
    #[serde(default)]
    pub total: Option<f64>,
    #[serde(default)]
    pub sold_at: Option<NaiveDateTime>,
}

impl Entity for Sale {
    type Id = SaleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Write-off record returned by the removal endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemovedItem {
    pub id: i64,
    pub store_item_id: StoreItemId,
    pub quantity: i64,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub removed_at: Option<NaiveDateTime>,
}

/// A line in the point-of-sale cart. Lives only on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub store_item_id: StoreItemId,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: f64,
    #[serde(default)]
    pub discount_percent: Option<f64>,
}

impl Entity for CartItem {
    type Id = StoreItemId;

    fn id(&self) -> &Self::Id {
        &self.store_item_id
    }
}

impl CartItem {
    pub fn from_store_item(item: &StoreItem, quantity: i64) -> Self {
        Self {
            store_item_id: item.id,
            product_name: item.product.name.clone(),
            quantity,
            unit_price: item.price,
            discount_percent: item.best_discount(),
        }
    }

    /// Price charged per unit once the discount is applied.
    pub fn charged_price(&self) -> f64 {
        match self.discount_percent {
            Some(pct) => calculate_discount_price(self.unit_price, pct),
            None => self.unit_price,
        }
    }

    /// Display-only line total; the backend computes the real one.
    pub fn line_total(&self) -> f64 {
        self.charged_price() * self.quantity as f64
    }
}

/// Aggregated numbers behind the store reports page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreReport {
    pub total_sales: i64,
    pub total_revenue: f64,
    pub items_sold: i64,
    pub active_items: i64,
    pub expired_items: i64,
    pub removed_items: i64,
    pub discounted_items: i64,
    pub generated_at: Option<NaiveDateTime>,
}
