//! Session runtime around the order ledger.
//!
//! A session is one actor task that owns an in-memory copy of the ledger and
//! serializes every read and mutation against the snapshot store. Several
//! sessions (tabs) can share one store and stay in sync through its change
//! notifications.
//!
//! # Main Components
//!
//! - [`LedgerActor`] - The actor owning one session's ledger
//! - [`LedgerClient`] - Cloneable, type-safe handle for sending requests
//! - [`LedgerRequest`] - The message enum, one variant per operation
//! - [`FrameworkError`] - Channel failures
//!
//! # Testing
//!
//! See [`mock`] module for utilities to test clients without spawning a session.

pub mod core;
pub mod mock;

pub use core::*;
