//! # Owner Client
//!
//! The owner's dashboard: every order with optional status filter, manual
//! status overrides and revenue totals (through [`LedgerAccess::totals`]).
use crate::clients::LedgerAccess;
use crate::error::OrderError;
use crate::framework::LedgerClient;
use crate::ledger::{StatusChange, StatusFilter};
use crate::model::{Order, OrderId, OrderStatus};
use tracing::{info, instrument, warn};

#[derive(Clone)]
pub struct OwnerClient {
    inner: LedgerClient,
}

impl OwnerClient {
    pub fn new(inner: LedgerClient) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn orders(&self, filter: StatusFilter) -> Result<Vec<Order>, OrderError> {
        let ledger = self.snapshot().await?;
        Ok(ledger.with_status(filter).cloned().collect())
    }

    #[instrument(skip(self))]
    pub async fn set_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<StatusChange, OrderError> {
        let change = self.inner.set_status(id, status).await?;
        info!(id = %change.id, from = %change.from, to = %change.to, "Status overridden");
        Ok(change)
    }

    /// Applies a status typed in by the owner, e.g. `" Ready "`.
    ///
    /// Unrecognised text is rejected with [`OrderError::InvalidStatus`] before
    /// anything is sent to the session.
    #[instrument(skip(self))]
    pub async fn override_status(&self, id: OrderId, input: &str) -> Result<StatusChange, OrderError> {
        let status = input.parse::<OrderStatus>().inspect_err(|e| {
            warn!(error = %e, "Rejected status override");
        })?;
        self.set_status(id, status).await
    }
}

impl LedgerAccess for OwnerClient {
    fn inner(&self) -> &LedgerClient {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockLedger;
    use crate::ledger::tests::order;
    use crate::ledger::{Ledger, Totals};

    #[tokio::test]
    async fn test_orders_filtered_by_status() {
        let mut mock = MockLedger::new();
        let ledger = Ledger::from_orders(vec![
            order(2, 180, OrderStatus::Ready, false),
            order(1, 220, OrderStatus::Placed, true),
        ]);
        mock.expect_snapshot().return_ok(ledger.clone());
        mock.expect_snapshot().return_ok(ledger);

        let owner = OwnerClient::new(mock.client());
        assert_eq!(owner.orders(StatusFilter::All).await.unwrap().len(), 2);
        let ready = owner
            .orders(StatusFilter::Only(OrderStatus::Ready))
            .await
            .unwrap();
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].id, OrderId::from_sequence(2));
        mock.verify();
    }

    #[tokio::test]
    async fn test_override_parses_free_text() {
        let id = OrderId::from_sequence(1);
        let mut mock = MockLedger::new();
        mock.expect_set_status(id.clone(), OrderStatus::Ready)
            .return_ok(StatusChange {
                id: id.clone(),
                from: OrderStatus::Placed,
                to: OrderStatus::Ready,
            });

        let owner = OwnerClient::new(mock.client());
        let change = owner.override_status(id.clone(), "  READY ").await.unwrap();
        assert_eq!(change.to, OrderStatus::Ready);

        // Rejected locally, no request reaches the session
        let bad = owner.override_status(id, "cooking").await;
        assert!(matches!(bad, Err(OrderError::InvalidStatus(_))));
        mock.verify();
    }

    #[tokio::test]
    async fn test_totals_from_trait() {
        let mut mock = MockLedger::new();
        let totals = Totals {
            order_count: 2,
            total_revenue: 400,
            paid_revenue: 220,
            unpaid_revenue: 180,
        };
        mock.expect_totals().return_ok(totals);

        let owner = OwnerClient::new(mock.client());
        assert_eq!(owner.totals().await.unwrap(), totals);
        mock.verify();
    }
}
