//! `shelfline-core`: shared building blocks.
//!
//! Identifiers and errors used by every other crate in the workspace. Nothing in
//! here performs IO.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::{Entity, find_mut, position};
pub use error::{DomainError, DomainResult};
pub use id::{DiscountId, ProductId, SaleId, StoreItemId, UserId, WarehouseItemId};
