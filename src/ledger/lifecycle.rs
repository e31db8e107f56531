//! Order status transitions.
//!
//! Status moves through `placed → preparing → ready → completed`. How strictly that
//! order is enforced is a [`StatusPolicy`] decision made by the caller:
//!
//! - [`StatusPolicy::Permissive`] lets any of the four statuses overwrite the
//!   current one (the owner override).
//! - [`StatusPolicy::Strict`] accepts only the single forward step and refuses
//!   to leave `completed`.
//!
//! Re-applying the status an order already has always succeeds and changes
//! nothing, under both policies.

use super::Ledger;
use crate::error::OrderError;
use crate::model::{OrderId, OrderStatus};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusPolicy {
    #[default]
    Permissive,
    Strict,
}

impl StatusPolicy {
    /// Checks whether `from -> to` is allowed.
    pub fn check(self, from: OrderStatus, to: OrderStatus) -> Result<(), OrderError> {
        if from == to {
            return Ok(());
        }
        match self {
            StatusPolicy::Permissive => Ok(()),
            StatusPolicy::Strict if from.next() == Some(to) => Ok(()),
            StatusPolicy::Strict => Err(OrderError::IllegalTransition { from, to }),
        }
    }
}

impl FromStr for StatusPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(StatusPolicy::Permissive),
            "strict" => Ok(StatusPolicy::Strict),
            other => Err(format!("unknown status policy: {other}")),
        }
    }
}

/// Outcome of a successful status update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub id: OrderId,
    pub from: OrderStatus,
    pub to: OrderStatus,
}

impl StatusChange {
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

impl Ledger {
    /// Sets the status of order `id` to `to`, subject to `policy`.
    ///
    /// # Errors
    /// - [`OrderError::NotFound`] if no order has this id.
    /// - [`OrderError::IllegalTransition`] if the policy refuses the move; the
    ///   ledger is left untouched.
    pub fn set_status(
        &mut self,
        id: &OrderId,
        to: OrderStatus,
        policy: StatusPolicy,
    ) -> Result<StatusChange, OrderError> {
        let order = self
            .get_mut(id)
            .ok_or_else(|| OrderError::NotFound(id.clone()))?;
        let from = order.status;
        policy.check(from, to)?;
        order.status = to;
        Ok(StatusChange {
            id: id.clone(),
            from,
            to,
        })
    }

    /// Moves order `id` one step forward in the kitchen flow.
    ///
    /// # Errors
    /// - [`OrderError::NotFound`] if no order has this id.
    /// - [`OrderError::IllegalTransition`] if the order is already completed.
    pub fn advance(&mut self, id: &OrderId) -> Result<StatusChange, OrderError> {
        let order = self
            .get_mut(id)
            .ok_or_else(|| OrderError::NotFound(id.clone()))?;
        let from = order.status;
        let to = from.next().ok_or(OrderError::IllegalTransition { from, to: from })?;
        order.status = to;
        Ok(StatusChange {
            id: id.clone(),
            from,
            to,
        })
    }
}
