//! Runtime orchestration and lifecycle management.
//!
//! - [`OrderSystem`] - Builds the store, starts ledger sessions and hands out role clients
//! - [`setup_tracing`] - Initializes the tracing/logging infrastructure

pub mod order_system;
pub mod tracing;

pub use order_system::*;
pub use tracing::*;
