//! # Order Ledger
//!
//! The [`Ledger`] is the ordered history of every [`Order`], newest first by
//! insertion. It is the single source of truth that the kitchen, the owner and the
//! customer all read from, and it is persisted as one JSON snapshot.
//!
//! ## Structure
//!
//! - [`lifecycle`] - status transitions under a [`StatusPolicy`]
//! - [`payment`] - payment validation and recording
//! - [`totals`] - revenue aggregation for the owner
//!
//! All operations here are synchronous value manipulations. Persistence and
//! cross-session sync live in [`crate::store`] and [`crate::framework`].

pub mod lifecycle;
pub mod payment;
pub mod totals;

pub use lifecycle::*;
pub use payment::*;
pub use totals::*;

use crate::error::OrderError;
use crate::model::{Order, OrderId, OrderStatus};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Ordered sequence of orders, newest first.
///
/// Orders are never removed. The only in-place updates are status, paid flag and
/// payment record, located by order id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    orders: Vec<Order>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps orders that are already in ledger order (newest first).
    pub fn from_orders(orders: Vec<Order>) -> Self {
        Self { orders }
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Order> {
        self.orders.iter()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn get(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| &order.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &OrderId) -> Option<&mut Order> {
        self.orders.iter_mut().find(|order| &order.id == id)
    }

    /// Inserts a freshly checked-out order at the front.
    pub fn append(&mut self, order: Order) {
        self.orders.insert(0, order);
    }

    /// Id for the next order: one past the highest `ORD-` sequence in the ledger.
    ///
    /// Ids of another shape (e.g. timestamp ids from older snapshots) are ignored,
    /// and so is a sequence that cannot be incremented.
    pub fn next_order_id(&self) -> OrderId {
        let next = self
            .orders
            .iter()
            .filter_map(|order| order.id.sequence()?.checked_add(1))
            .max()
            .unwrap_or(1);
        OrderId::from_sequence(next)
    }

    /// Orders the kitchen still has to work on.
    pub fn active(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter().filter(|order| !order.status.is_terminal())
    }

    /// Orders matching the owner's status filter, in ledger order.
    pub fn with_status(&self, filter: StatusFilter) -> impl Iterator<Item = &Order> {
        self.orders.iter().filter(move |order| filter.matches(order))
    }

    /// Serializes the ledger into its snapshot form (a JSON array of orders).
    pub fn encode(&self) -> Result<String, OrderError> {
        serde_json::to_string(&self.orders).map_err(|e| OrderError::CorruptLedger(e.to_string()))
    }

    /// Parses a snapshot produced by [`Ledger::encode`] or by an older client.
    ///
    /// # Errors
    /// [`OrderError::CorruptLedger`] when the text is not a valid order array.
    pub fn decode(snapshot: &str) -> Result<Self, OrderError> {
        serde_json::from_str::<Vec<Order>>(snapshot)
            .map(Self::from_orders)
            .map_err(|e| OrderError::CorruptLedger(e.to_string()))
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Order;
    type IntoIter = std::slice::Iter<'a, Order>;

    fn into_iter(self) -> Self::IntoIter {
        self.orders.iter()
    }
}

/// Status filter used by the owner's order table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(OrderStatus),
}

impl StatusFilter {
    pub fn matches(self, order: &Order) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => order.status == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(StatusFilter::All)
        } else {
            s.parse().map(StatusFilter::Only)
        }
    }
}
