//! # Ledger Session
//!
//! This module defines the session runtime around the [`Ledger`].
//!
//! ## Key Types
//!
//! - [`LedgerActor`]: The server half. Owns the session's in-memory ledger.
//! - [`LedgerClient`]: The cloneable handle callers use to talk to it.
//! - [`LedgerRequest`]: The messages travelling between them.
//! - [`FrameworkError`]: Channel failures (actor gone, reply dropped).

use crate::config::Config;
use crate::error::OrderError;
use crate::ledger::{Ledger, PaymentInput, StatusChange, StatusPolicy, Totals};
use crate::model::{checkout, Cart, Catalog, Order, OrderId, OrderStatus};
use crate::store::{load_ledger, save_ledger, SnapshotChanged, SnapshotStore, WriterId};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

// =============================================================================
// 1. MESSAGES & ERRORS
// =============================================================================

/// Errors raised by the session plumbing itself.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
}

/// Type alias for the one-shot response channel used by the session.
pub type Response<T> = oneshot::Sender<Result<T, OrderError>>;

/// Message sent to the [`LedgerActor`].
///
/// Reads carry only a reply channel. Every other variant is a mutation that ends
/// in exactly one full-snapshot write when it succeeds.
#[derive(Debug)]
pub enum LedgerRequest {
    Snapshot {
        respond_to: Response<Ledger>,
    },
    Totals {
        respond_to: Response<Totals>,
    },
    PlaceOrder {
        cart: Cart,
        respond_to: Response<Order>,
    },
    SetStatus {
        id: OrderId,
        status: OrderStatus,
        respond_to: Response<StatusChange>,
    },
    Advance {
        id: OrderId,
        respond_to: Response<StatusChange>,
    },
    RecordPayment {
        /// `None` pays the first eligible order.
        target: Option<OrderId>,
        input: PaymentInput,
        respond_to: Response<Order>,
    },
}

// =============================================================================
// 2. THE ACTOR
// =============================================================================

/// Owns one session's view of the ledger.
///
/// **Concurrency Model**:
/// Requests are handled one at a time in the order they arrive, so two operations
/// on the ledger never interleave and no lock guards it.
///
/// **Consistency**:
/// The store is the source of truth. Before each request the actor re-reads the
/// snapshot; a mutation works on a copy, writes the whole copy back and only
/// then replaces the in-memory ledger. When another session writes the same key,
/// the store's notification makes this actor reload wholesale (last writer wins).
pub struct LedgerActor {
    receiver: mpsc::Receiver<LedgerRequest>,
    catalog: Arc<Catalog>,
    policy: StatusPolicy,
    key: String,
    writer: WriterId,
    ledger: Ledger,
    published: watch::Sender<Ledger>,
}

impl LedgerActor {
    /// Creates a session actor and its client.
    ///
    /// The actor does nothing until [`LedgerActor::run`] is spawned.
    pub fn new(config: &Config, catalog: Arc<Catalog>) -> (Self, LedgerClient) {
        let (sender, receiver) = mpsc::channel(config.channel_buffer);
        let (published, updates) = watch::channel(Ledger::new());
        let actor = Self {
            receiver,
            catalog: Arc::clone(&catalog),
            policy: config.status_policy,
            key: config.storage_key.clone(),
            writer: WriterId::next(),
            ledger: Ledger::new(),
            published,
        };
        let client = LedgerClient::new(sender, catalog, updates);
        (actor, client)
    }

    /// Runs the session loop until every client is dropped.
    ///
    /// # Context Injection
    /// The store is handed in here rather than at construction, so several
    /// sessions can be created first and then attached to one shared store.
    pub async fn run(mut self, store: Arc<dyn SnapshotStore>) {
        let session = self.writer;
        info!(%session, key = %self.key, policy = ?self.policy, "Ledger session started");

        let mut changes = store.subscribe();
        let mut sync_open = true;
        if let Err(e) = self.reload(store.as_ref()) {
            warn!(%session, error = %e, "Initial load failed");
        }

        loop {
            tokio::select! {
                msg = self.receiver.recv() => {
                    let Some(msg) = msg else { break };
                    self.handle(msg, store.as_ref());
                }
                event = changes.recv(), if sync_open => match event {
                    Ok(SnapshotChanged { key, writer }) => {
                        if key == self.key && writer != self.writer {
                            info!(%session, from = %writer, "Remote write, re-syncing");
                            if let Err(e) = self.reload(store.as_ref()) {
                                warn!(%session, error = %e, "Re-sync failed");
                            }
                        }
                    }
                    Err(RecvError::Lagged(missed)) => {
                        warn!(%session, missed, "Missed change notifications, re-syncing");
                        if let Err(e) = self.reload(store.as_ref()) {
                            warn!(%session, error = %e, "Re-sync failed");
                        }
                    }
                    Err(RecvError::Closed) => {
                        warn!(%session, "Change notifications closed");
                        sync_open = false;
                    }
                },
            }
        }

        info!(%session, size = self.ledger.len(), "Shutdown");
    }

    fn handle(&mut self, msg: LedgerRequest, store: &dyn SnapshotStore) {
        let session = self.writer;
        match msg {
            LedgerRequest::Snapshot { respond_to } => {
                let result = self.reload(store).map(|()| self.ledger.clone());
                debug!(%session, size = self.ledger.len(), "Snapshot");
                let _ = respond_to.send(result);
            }
            LedgerRequest::Totals { respond_to } => {
                let result = self.reload(store).map(|()| self.ledger.totals());
                debug!(%session, ?result, "Totals");
                let _ = respond_to.send(result);
            }
            LedgerRequest::PlaceOrder { cart, respond_to } => {
                debug!(%session, ?cart, "PlaceOrder");
                let catalog = Arc::clone(&self.catalog);
                let result = self.mutate(store, |ledger| {
                    let order = checkout(&cart, &catalog, ledger.next_order_id(), Utc::now())?;
                    ledger.append(order.clone());
                    Ok(order)
                });
                match &result {
                    Ok(order) => {
                        info!(%session, id = %order.id, total = order.total, size = self.ledger.len(), "Order placed")
                    }
                    Err(e) => warn!(%session, error = %e, "PlaceOrder failed"),
                }
                let _ = respond_to.send(result);
            }
            LedgerRequest::SetStatus {
                id,
                status,
                respond_to,
            } => {
                debug!(%session, %id, %status, "SetStatus");
                let policy = self.policy;
                let result = self.mutate(store, |ledger| ledger.set_status(&id, status, policy));
                match &result {
                    Ok(change) => {
                        info!(%session, %id, from = %change.from, to = %change.to, "Status set")
                    }
                    Err(e) => warn!(%session, %id, error = %e, "SetStatus failed"),
                }
                let _ = respond_to.send(result);
            }
            LedgerRequest::Advance { id, respond_to } => {
                debug!(%session, %id, "Advance");
                let result = self.mutate(store, |ledger| ledger.advance(&id));
                match &result {
                    Ok(change) => {
                        info!(%session, %id, from = %change.from, to = %change.to, "Status advanced")
                    }
                    Err(e) => warn!(%session, %id, error = %e, "Advance failed"),
                }
                let _ = respond_to.send(result);
            }
            LedgerRequest::RecordPayment {
                target,
                input,
                respond_to,
            } => {
                debug!(%session, ?target, payer = %input.payer_name, "RecordPayment");
                let result = self.mutate(store, |ledger| match &target {
                    Some(id) => ledger.record_payment_for(id, input, Utc::now()),
                    None => ledger.record_payment(input, Utc::now()),
                });
                match &result {
                    Ok(order) => info!(%session, id = %order.id, total = order.total, "Payment recorded"),
                    Err(e) => warn!(%session, error = %e, "RecordPayment failed"),
                }
                let _ = respond_to.send(result);
            }
        }
    }

    /// Replaces the in-memory ledger with the stored snapshot.
    fn reload(&mut self, store: &dyn SnapshotStore) -> Result<(), OrderError> {
        let fresh = load_ledger(store, &self.key)?;
        if fresh != self.ledger {
            self.ledger = fresh;
            self.published.send_replace(self.ledger.clone());
        }
        Ok(())
    }

    /// Applies `op` to a fresh copy of the ledger and persists the result.
    ///
    /// Nothing is written and the in-memory ledger is unchanged if `op` or the
    /// write fails.
    fn mutate<T>(
        &mut self,
        store: &dyn SnapshotStore,
        op: impl FnOnce(&mut Ledger) -> Result<T, OrderError>,
    ) -> Result<T, OrderError> {
        self.reload(store)?;
        let mut next = self.ledger.clone();
        let out = op(&mut next)?;
        save_ledger(store, &self.key, &next, self.writer)?;
        self.ledger = next;
        self.published.send_replace(self.ledger.clone());
        Ok(out)
    }
}

// =============================================================================
// 3. THE CLIENT
// =============================================================================

/// Type-safe handle to a [`LedgerActor`].
///
/// Cheap to clone. The catalog is static, so it is served locally without a
/// round trip.
#[derive(Clone)]
pub struct LedgerClient {
    sender: mpsc::Sender<LedgerRequest>,
    catalog: Arc<Catalog>,
    updates: watch::Receiver<Ledger>,
}

impl LedgerClient {
    pub fn new(
        sender: mpsc::Sender<LedgerRequest>,
        catalog: Arc<Catalog>,
        updates: watch::Receiver<Ledger>,
    ) -> Self {
        Self {
            sender,
            catalog,
            updates,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Receiver that always holds the session's latest ledger. It changes after
    /// every local commit and every re-sync from another session.
    pub fn subscribe(&self) -> watch::Receiver<Ledger> {
        self.updates.clone()
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(Response<T>) -> LedgerRequest,
    ) -> Result<T, OrderError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(make(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn snapshot(&self) -> Result<Ledger, OrderError> {
        self.request(|respond_to| LedgerRequest::Snapshot { respond_to })
            .await
    }

    pub async fn totals(&self) -> Result<Totals, OrderError> {
        self.request(|respond_to| LedgerRequest::Totals { respond_to })
            .await
    }

    /// Checks the cart out into a new order and appends it to the ledger.
    pub async fn place_order(&self, cart: Cart) -> Result<Order, OrderError> {
        self.request(|respond_to| LedgerRequest::PlaceOrder { cart, respond_to })
            .await
    }

    pub async fn set_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<StatusChange, OrderError> {
        self.request(|respond_to| LedgerRequest::SetStatus {
            id,
            status,
            respond_to,
        })
        .await
    }

    pub async fn advance(&self, id: OrderId) -> Result<StatusChange, OrderError> {
        self.request(|respond_to| LedgerRequest::Advance { id, respond_to })
            .await
    }

    /// Pays the first order still waiting for payment.
    pub async fn record_payment(&self, input: PaymentInput) -> Result<Order, OrderError> {
        self.request(|respond_to| LedgerRequest::RecordPayment {
            target: None,
            input,
            respond_to,
        })
        .await
    }

    pub async fn record_payment_for(
        &self,
        id: OrderId,
        input: PaymentInput,
    ) -> Result<Order, OrderError> {
        self.request(|respond_to| LedgerRequest::RecordPayment {
            target: Some(id),
            input,
            respond_to,
        })
        .await
    }
}

// =============================================================================
// 4. TESTS
// =============================================================================
