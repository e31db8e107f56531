//! Error types for the order engine and the ledger session.

use crate::model::{MenuItemId, OrderId, OrderStatus};
use thiserror::Error;

/// Errors that can occur during order operations.
///
/// Every variant is recoverable by the caller. Operations that fail leave the
/// ledger exactly as it was.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// Checkout was attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Payer name or card number failed the demo validation.
    #[error("Invalid payment input: {0}")]
    InvalidPayment(String),

    /// A status string did not name one of the four order statuses.
    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    /// The cart references an id the catalog does not contain.
    #[error("Unknown menu item: {0}")]
    UnknownMenuItem(MenuItemId),

    /// The persisted ledger snapshot could not be decoded.
    #[error("Corrupt ledger snapshot: {0}")]
    CorruptLedger(String),

    /// Payment was attempted but no order is waiting for one.
    #[error("No eligible order to pay")]
    NoEligibleOrder,

    /// The requested order was not found.
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    /// The active status policy refused the move.
    #[error("Illegal status transition: {from} -> {to}")]
    IllegalTransition { from: OrderStatus, to: OrderStatus },

    /// The snapshot store failed to read or write.
    #[error("Storage error: {0}")]
    Storage(String),

    /// An error occurred while communicating with the ledger session.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

/// Coarse classification of [`OrderError`] for callers that only need to decide
/// how to surface a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    DataIntegrity,
    NoEligibleOrder,
    NotFound,
    Transition,
    Infrastructure,
}

impl OrderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrderError::EmptyCart
            | OrderError::InvalidPayment(_)
            | OrderError::InvalidStatus(_) => ErrorKind::InvalidInput,
            OrderError::UnknownMenuItem(_) | OrderError::CorruptLedger(_) => {
                ErrorKind::DataIntegrity
            }
            OrderError::NoEligibleOrder => ErrorKind::NoEligibleOrder,
            OrderError::NotFound(_) => ErrorKind::NotFound,
            OrderError::IllegalTransition { .. } => ErrorKind::Transition,
            OrderError::Storage(_) | OrderError::ActorCommunicationError(_) => {
                ErrorKind::Infrastructure
            }
        }
    }
}

impl From<crate::store::StoreError> for OrderError {
    fn from(e: crate::store::StoreError) -> Self {
        OrderError::Storage(e.to_string())
    }
}

impl From<crate::framework::FrameworkError> for OrderError {
    fn from(e: crate::framework::FrameworkError) -> Self {
        OrderError::ActorCommunicationError(e.to_string())
    }
}
