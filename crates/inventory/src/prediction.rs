//! Forecast and analytics records. All values are computed server-side.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use shelfline_core::ProductId;

/// Product known to the forecasting service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionProduct {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub product_count: i64,
}

/// One forecast point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub forecast_qty: f64,
    #[serde(default)]
    pub lower_bound: Option<f64>,
    #[serde(default)]
    pub upper_bound: Option<f64>,
}

impl Prediction {
    /// Width of the confidence band, when the model reported one.
    pub fn band_width(&self) -> Option<f64> {
        Some(self.upper_bound? - self.lower_bound?)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastStats {
    pub products_tracked: i64,
    pub forecasts_generated: i64,
    pub mean_absolute_error: Option<f64>,
    pub last_trained_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductAnalytics {
    pub product_id: ProductId,
    #[serde(default)]
    pub total_sold: i64,
    #[serde(default)]
    pub average_daily_sales: f64,
    #[serde(default)]
    pub waste_rate: f64,
    #[serde(default)]
    pub stock_on_hand: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub quantity: f64,
    #[serde(default)]
    pub direction: Option<TrendDirection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightSeverity {
    #[default]
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub severity: InsightSeverity,
    #[serde(default)]
    pub product_id: Option<ProductId>,
}
