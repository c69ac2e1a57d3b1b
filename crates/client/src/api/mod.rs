//! Typed bindings for the backend's REST endpoints, grouped by resource.

pub mod auth;
pub mod prediction;
pub mod store;
pub mod warehouse;

pub use store::NewStoreItem;
pub use warehouse::{DeleteSummary, UploadSummary};
