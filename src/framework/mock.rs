//! # Mock Framework
//!
//! Utilities for testing code that talks to a [`LedgerClient`] without spawning a
//! [`LedgerActor`](super::LedgerActor) or touching a store.
//!
//! Two styles are available:
//!
//! - [`MockLedger`]: queue expectations up front, run the code under test, then
//!   call [`MockLedger::verify`].
//! - [`create_mock_client`] + [`next_request`]: receive the raw
//!   [`LedgerRequest`] yourself and answer it by hand.
//!
//! ```ignore
//! let mut mock = MockLedger::new();
//! mock.expect_totals().return_ok(Totals::default());
//!
//! let owner = OwnerClient::new(mock.client());
//! owner.totals().await?;
//! mock.verify();
//! ```

use super::{LedgerClient, LedgerRequest};
use crate::error::OrderError;
use crate::ledger::{Ledger, StatusChange, Totals};
use crate::model::{Catalog, Order, OrderId, OrderStatus};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{mpsc, watch};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// An expected request and the response to answer it with.
enum Expectation {
    Snapshot {
        response: Result<Ledger, OrderError>,
    },
    Totals {
        response: Result<Totals, OrderError>,
    },
    PlaceOrder {
        response: Result<Order, OrderError>,
    },
    SetStatus {
        id: OrderId,
        status: OrderStatus,
        response: Result<StatusChange, OrderError>,
    },
    Advance {
        id: OrderId,
        response: Result<StatusChange, OrderError>,
    },
    RecordPayment {
        target: Option<OrderId>,
        response: Result<Order, OrderError>,
    },
}

type Queue = Arc<Mutex<VecDeque<Expectation>>>;

/// A mock ledger session with expectation tracking.
///
/// Requests are matched against expectations strictly in order. A request that
/// does not match the next expectation gets no reply (the caller sees
/// `ActorDropped`) and is reported by [`MockLedger::verify`].
pub struct MockLedger {
    client: LedgerClient,
    expectations: Queue,
    failures: Arc<Mutex<Vec<String>>>,
    published: watch::Sender<Ledger>,
    _handle: tokio::task::JoinHandle<()>,
}

impl MockLedger {
    /// Creates a mock serving the demo catalog.
    pub fn new() -> Self {
        Self::with_catalog(Catalog::demo())
    }

    pub fn with_catalog(catalog: Catalog) -> Self {
        let (sender, mut receiver) = mpsc::channel::<LedgerRequest>(100);
        let (published, updates) = watch::channel(Ledger::new());
        let expectations: Queue = Arc::new(Mutex::new(VecDeque::new()));
        let failures = Arc::new(Mutex::new(Vec::new()));

        let queue = expectations.clone();
        let failed = failures.clone();
        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = queue
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .pop_front();
                answer(request, expectation, &failed);
            }
        });

        Self {
            client: LedgerClient::new(sender, Arc::new(catalog), updates),
            expectations,
            failures,
            published,
            _handle: handle,
        }
    }

    /// Returns a client wired to this mock.
    pub fn client(&self) -> LedgerClient {
        self.client.clone()
    }

    /// Pushes a ledger to the clients' update receivers, as a re-sync would.
    pub fn publish(&self, ledger: Ledger) {
        self.published.send_replace(ledger);
    }

    pub fn expect_snapshot(&mut self) -> ExpectationBuilder<Ledger> {
        self.builder(|response| Expectation::Snapshot { response })
    }

    pub fn expect_totals(&mut self) -> ExpectationBuilder<Totals> {
        self.builder(|response| Expectation::Totals { response })
    }

    pub fn expect_place_order(&mut self) -> ExpectationBuilder<Order> {
        self.builder(|response| Expectation::PlaceOrder { response })
    }

    pub fn expect_set_status(
        &mut self,
        id: OrderId,
        status: OrderStatus,
    ) -> ExpectationBuilder<StatusChange> {
        self.builder(move |response| Expectation::SetStatus {
            id,
            status,
            response,
        })
    }

    pub fn expect_advance(&mut self, id: OrderId) -> ExpectationBuilder<StatusChange> {
        self.builder(move |response| Expectation::Advance { id, response })
    }

    /// Expects a payment; `None` means "first eligible order".
    pub fn expect_payment(&mut self, target: Option<OrderId>) -> ExpectationBuilder<Order> {
        self.builder(move |response| Expectation::RecordPayment { target, response })
    }

    /// Panics unless every expectation was consumed and every request matched.
    pub fn verify(&self) {
        let failures = self.failures.lock().unwrap_or_else(PoisonError::into_inner);
        if !failures.is_empty() {
            panic!("Unexpected requests: {}", failures.join("; "));
        }
        let remaining = self
            .expectations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        if remaining > 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }

    fn builder<T>(
        &self,
        make: impl FnOnce(Result<T, OrderError>) -> Expectation + Send + 'static,
    ) -> ExpectationBuilder<T> {
        ExpectationBuilder {
            expectations: self.expectations.clone(),
            make: Box::new(make),
        }
    }
}

impl Default for MockLedger {
    fn default() -> Self {
        Self::new()
    }
}

/// Fluent builder completing an expectation with its response.
pub struct ExpectationBuilder<T> {
    expectations: Queue,
    make: Box<dyn FnOnce(Result<T, OrderError>) -> Expectation + Send>,
}

impl<T> ExpectationBuilder<T> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: T) {
        self.push(Ok(value));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: OrderError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<T, OrderError>) {
        let expectation = (self.make)(response);
        self.expectations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(expectation);
    }
}

/// Replies to `request` if it matches `expectation`, otherwise records the mismatch.
///
/// The mismatch is recorded before the unanswered reply channel is dropped, so a
/// caller that sees `ActorDropped` can call `verify` right away.
fn answer(request: LedgerRequest, expectation: Option<Expectation>, failures: &Mutex<Vec<String>>) {
    let fail = |mismatch: String| {
        failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(mismatch);
    };
    match (request, expectation) {
        (LedgerRequest::Snapshot { respond_to }, Some(Expectation::Snapshot { response })) => {
            let _ = respond_to.send(response);
        }
        (LedgerRequest::Totals { respond_to }, Some(Expectation::Totals { response })) => {
            let _ = respond_to.send(response);
        }
        (LedgerRequest::PlaceOrder { respond_to, .. }, Some(Expectation::PlaceOrder { response })) => {
            let _ = respond_to.send(response);
        }
        (
            LedgerRequest::SetStatus { id, status, respond_to },
            Some(Expectation::SetStatus { id: want_id, status: want_status, response }),
        ) => {
            if id != want_id || status != want_status {
                fail(format!(
                    "SetStatus({id}, {status}) but expected SetStatus({want_id}, {want_status})"
                ));
                return;
            }
            let _ = respond_to.send(response);
        }
        (LedgerRequest::Advance { id, respond_to }, Some(Expectation::Advance { id: want_id, response })) => {
            if id != want_id {
                fail(format!("Advance({id}) but expected Advance({want_id})"));
                return;
            }
            let _ = respond_to.send(response);
        }
        (
            LedgerRequest::RecordPayment { target, respond_to, .. },
            Some(Expectation::RecordPayment { target: want, response }),
        ) => {
            if target != want {
                fail(format!("RecordPayment({target:?}) but expected RecordPayment({want:?})"));
                return;
            }
            let _ = respond_to.send(response);
        }
        (request, Some(_)) => fail(format!("{request:?} did not match the next expectation")),
        (request, None) => fail(format!("{request:?} with no expectation left")),
    }
}

// =============================================================================
// RAW HELPERS
// =============================================================================

/// Creates a client and the receiver its requests land on.
///
/// Use this when a test needs to inspect the request payload itself (for example
/// the cart sent with `PlaceOrder`).
pub fn create_mock_client(buffer_size: usize) -> (LedgerClient, mpsc::Receiver<LedgerRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    let (_published, updates) = watch::channel(Ledger::new());
    (
        LedgerClient::new(sender, Arc::new(Catalog::demo()), updates),
        receiver,
    )
}

/// Waits for the next request sent through a client from [`create_mock_client`].
pub async fn next_request(receiver: &mut mpsc::Receiver<LedgerRequest>) -> Option<LedgerRequest> {
    receiver.recv().await
}
