//! # Kitchen Client
//!
//! The kitchen's queue: every order not yet completed, moved one step at a time.
use crate::clients::LedgerAccess;
use crate::error::OrderError;
use crate::framework::LedgerClient;
use crate::ledger::StatusChange;
use crate::model::{Order, OrderId};
use tracing::{debug, info, instrument};

#[derive(Clone)]
pub struct KitchenClient {
    inner: LedgerClient,
}

impl KitchenClient {
    pub fn new(inner: LedgerClient) -> Self {
        Self { inner }
    }

    /// Orders still in progress, newest first.
    #[instrument(skip(self))]
    pub async fn active_orders(&self) -> Result<Vec<Order>, OrderError> {
        let ledger = self.snapshot().await?;
        let active: Vec<Order> = ledger.active().cloned().collect();
        debug!(count = active.len(), "Active orders");
        Ok(active)
    }

    /// Moves an order to its next status.
    #[instrument(skip(self))]
    pub async fn advance(&self, id: OrderId) -> Result<StatusChange, OrderError> {
        let change = self.inner.advance(id).await?;
        info!(id = %change.id, to = %change.to, "Order advanced");
        Ok(change)
    }
}

impl LedgerAccess for KitchenClient {
    fn inner(&self) -> &LedgerClient {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockLedger;
    use crate::ledger::tests::order;
    use crate::ledger::Ledger;
    use crate::model::OrderStatus;

    #[tokio::test]
    async fn test_active_orders_hide_completed() {
        let mut mock = MockLedger::new();
        mock.expect_snapshot().return_ok(Ledger::from_orders(vec![
            order(3, 100, OrderStatus::Ready, false),
            order(2, 100, OrderStatus::Completed, true),
            order(1, 100, OrderStatus::Placed, true),
        ]));

        let kitchen = KitchenClient::new(mock.client());
        let active = kitchen.active_orders().await.unwrap();
        let ids: Vec<_> = active.iter().map(|o| o.id.clone()).collect();
        assert_eq!(ids, vec![OrderId::from_sequence(3), OrderId::from_sequence(1)]);
        mock.verify();
    }

    #[tokio::test]
    async fn test_advance_forwards_errors() {
        let id = OrderId::from_sequence(1);
        let mut mock = MockLedger::new();
        mock.expect_advance(id.clone()).return_ok(StatusChange {
            id: id.clone(),
            from: OrderStatus::Placed,
            to: OrderStatus::Preparing,
        });
        mock.expect_advance(id.clone())
            .return_err(OrderError::IllegalTransition {
                from: OrderStatus::Completed,
                to: OrderStatus::Completed,
            });

        let kitchen = KitchenClient::new(mock.client());
        assert_eq!(kitchen.advance(id.clone()).await.unwrap().to, OrderStatus::Preparing);
        assert!(matches!(
            kitchen.advance(id).await,
            Err(OrderError::IllegalTransition { .. })
        ));
        mock.verify();
    }
}
