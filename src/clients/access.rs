//! # LedgerAccess Trait
//!
//! Common read operations shared by every role client, built on top of a
//! [`LedgerClient`].
use crate::error::OrderError;
use crate::framework::LedgerClient;
use crate::ledger::{Ledger, Totals};
use crate::model::Catalog;
use async_trait::async_trait;
use tokio::sync::watch;

/// Trait for role clients to inherit the read-only ledger operations.
///
/// Implementors only provide [`inner`](LedgerAccess::inner).
#[async_trait]
pub trait LedgerAccess: Send + Sync {
    /// Access the session client.
    fn inner(&self) -> &LedgerClient;

    fn catalog(&self) -> &Catalog {
        self.inner().catalog()
    }

    /// Receiver holding the latest ledger of the session.
    fn subscribe(&self) -> watch::Receiver<Ledger> {
        self.inner().subscribe()
    }

    /// Fetch a copy of the whole ledger.
    #[tracing::instrument(skip(self))]
    async fn snapshot(&self) -> Result<Ledger, OrderError> {
        tracing::debug!("Sending request");
        self.inner().snapshot().await
    }

    /// Fetch the revenue totals.
    #[tracing::instrument(skip(self))]
    async fn totals(&self) -> Result<Totals, OrderError> {
        tracing::debug!("Sending request");
        self.inner().totals().await
    }
}
