//! Inventory records as the backend serves them, plus the pure transformations
//! the client applies to its cached copies after a successful mutation.
//!
//! Nothing here performs IO. Quantities, urgency and totals are authoritative
//! only on the server; the helpers in [`display`] exist for UI feedback.

pub mod display;
pub mod model;
pub mod patch;
pub mod prediction;
pub mod requests;

pub use display::{calculate_discount_price, format_currency, get_initials};
pub use model::{
    CartItem, Discount, ProductRef, RemovedItem, Sale, StoreItem, StoreItemStatus, StoreReport,
    UrgencyLevel, WarehouseItem, WarehouseItemStatus,
};
pub use patch::{
    MoveOutcome, QuantityOutcome, SaleOutcome, apply_discount, apply_expiry, apply_move, apply_removal, apply_sale,
    retain_except,
};
pub use prediction::{
    Category, ForecastStats, Insight, InsightSeverity, Prediction, PredictionProduct,
    ProductAnalytics, TrendDirection, TrendPoint,
};
pub use requests::{
    ApplyDiscount, MoveByBarcode, MoveToStore, NewWarehouseItem, RecordSale, RemoveFromStore,
    RemoveWarehouseItems,
};
