#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Restaurant Orders
//!
//! > **Order lifecycle and totals engine for a QR-code restaurant menu.**
//!
//! Customers build a cart from a fixed menu and check it out into an order. The
//! kitchen moves orders through `placed → preparing → ready → completed`. A
//! simulated card payment marks an order paid, and the owner sees revenue totals.
//! Every order lives in one ledger persisted as a single snapshot.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### A Pure Core with an Actor Shell
//! The domain ([`model`], [`ledger`]) is plain synchronous Rust: checkout,
//! status changes, payments and totals are methods on values and are tested
//! without a runtime. The [`framework`] wraps one [`Ledger`](ledger::Ledger) per
//! session in an actor, which adds ordering, persistence and cross-session sync
//! without any locks.
//!
//! ### The Store is the Source of Truth
//! A session re-reads the snapshot before every request and writes the whole
//! ledger back after every successful mutation. Sessions sharing a store
//! receive change notifications and reload wholesale. The last writer wins.
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. Type-Safe Error Handling
//! [`OrderError`](error::OrderError) covers the domain, with
//! [`ErrorKind`](error::ErrorKind) grouping its variants by how a caller reacts.
//! Store, channel and configuration failures have their own `thiserror` enums and
//! convert into it with `?`.
//!
//! ### 2. All-or-Nothing Mutations
//! Mutations run on a copy of the ledger. If the operation or the write fails,
//! neither the store nor the session's ledger changes.
//!
//! ### 3. Async Context Injection
//! The store is handed to [`LedgerActor::run`](framework::LedgerActor::run), not
//! to the constructor, so any number of sessions can share one store.
//!
//! ### 4. Observability
//! `tracing` everywhere with structured fields. See [`lifecycle::tracing`].
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Domain ([`model`], [`ledger`])
//! - **Role**: Menu, cart and order types; ledger operations and their rules.
//! - **Key items**: [`Cart`](model::Cart), [`checkout`](model::checkout),
//!   [`Ledger`](ledger::Ledger), [`StatusPolicy`](ledger::StatusPolicy),
//!   [`Totals`](ledger::Totals).
//!
//! ### 2. Persistence ([`store`])
//! - **Role**: Key-value snapshot storage with change notifications.
//! - **Key items**: [`SnapshotStore`](store::SnapshotStore),
//!   [`MemoryStore`](store::MemoryStore), [`FileStore`](store::FileStore).
//!
//! ### 3. The Engine ([`framework`])
//! - **Role**: Serializes every operation of a session and keeps it in sync.
//! - **Key items**: [`LedgerActor`](framework::LedgerActor),
//!   [`LedgerClient`](framework::LedgerClient), [`MockLedger`](framework::mock::MockLedger).
//!
//! ### 4. The Interface ([`clients`])
//! - **Role**: One client per role, exposing only what that screen needs.
//! - **Key items**: [`CustomerClient`](clients::CustomerClient),
//!   [`KitchenClient`](clients::KitchenClient), [`OwnerClient`](clients::OwnerClient).
//!
//! ### 5. The Orchestrator ([`lifecycle`], [`config`])
//! - **Role**: Reads configuration, picks a store, starts sessions, shuts down.
//! - **Key items**: [`OrderSystem`](lifecycle::OrderSystem), [`Config`](config::Config).
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run the scripted demo with info logs
//! RUST_LOG=info cargo run
//!
//! # Persist the ledger to disk, reject skipped status steps
//! ORDERS_LEDGER_DIR=./data ORDERS_STATUS_POLICY=strict cargo run
//! ```

pub mod clients;
pub mod config;
pub mod error;
pub mod framework;
pub mod ledger;
pub mod lifecycle;
pub mod model;
pub mod store;
