//! Process-wide logging setup shared by the client and the CLI.

pub mod tracing;

pub use crate::tracing::{LogFormat, init, init_with};
