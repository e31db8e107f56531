//! Revenue figures for the owner dashboard.

use super::Ledger;
use serde::{Deserialize, Serialize};

/// Aggregate counts over the whole ledger. Recomputed on demand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub order_count: usize,
    pub total_revenue: u64,
    pub paid_revenue: u64,
    pub unpaid_revenue: u64,
}

/// Single pass over the ledger, partitioning revenue by the paid flag.
///
/// Sums saturate at `u64::MAX`; a stored snapshot can carry any totals.
pub fn compute_totals(ledger: &Ledger) -> Totals {
    ledger.iter().fold(Totals::default(), |mut acc, order| {
        acc.order_count += 1;
        acc.total_revenue = acc.total_revenue.saturating_add(order.total);
        if order.paid {
            acc.paid_revenue = acc.paid_revenue.saturating_add(order.total);
        } else {
            acc.unpaid_revenue = acc.unpaid_revenue.saturating_add(order.total);
        }
        acc
    })
}

impl Ledger {
    pub fn totals(&self) -> Totals {
        compute_totals(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::tests::order;
    use crate::model::OrderStatus;

    #[test]
    fn test_totals_partition_by_paid() {
        let ledger = Ledger::from_orders(vec![
            order(1, 100, OrderStatus::Completed, true),
            order(2, 50, OrderStatus::Placed, false),
        ]);
        assert_eq!(
            compute_totals(&ledger),
            Totals {
                order_count: 2,
                total_revenue: 150,
                paid_revenue: 100,
                unpaid_revenue: 50,
            }
        );
    }

    #[test]
    fn test_totals_saturate_on_stored_extremes() {
        let snapshot = format!(
            r#"[{{"id":"ORD-000002","items":[],"status":"placed","paid":false,"total":{max},"createdAt":"2024-05-01T12:00:00Z"}},
               {{"id":"ORD-000001","items":[],"status":"placed","paid":false,"total":1,"createdAt":"2024-05-01T12:00:00Z"}}]"#,
            max = u64::MAX
        );
        let ledger = Ledger::decode(&snapshot).unwrap();
        let totals = ledger.totals();
        assert_eq!(totals.order_count, 2);
        assert_eq!(totals.total_revenue, u64::MAX);
        assert_eq!(totals.unpaid_revenue, u64::MAX);
        assert_eq!(totals.paid_revenue, 0);
    }

    #[test]
    fn test_totals_empty_ledger() {
        assert_eq!(Ledger::new().totals(), Totals::default());
    }
}
