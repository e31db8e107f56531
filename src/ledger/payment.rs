//! Simulated card payments.
//!
//! Validation is shallow: a non-blank payer name and at least six
//! card digits. Only the last four characters of the card number are kept.

use super::Ledger;
use crate::error::OrderError;
use crate::model::{Order, OrderId, Payment, PaymentMethod};
use chrono::{DateTime, Utc};

const MIN_CARD_LEN: usize = 6;

/// Payment details as typed by the customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentInput {
    pub payer_name: String,
    pub card_number: String,
}

impl PaymentInput {
    pub fn new(payer_name: impl Into<String>, card_number: impl Into<String>) -> Self {
        Self {
            payer_name: payer_name.into(),
            card_number: card_number.into(),
        }
    }

    /// Validates the input and turns it into a payment record stamped `now`.
    ///
    /// # Errors
    /// [`OrderError::InvalidPayment`] for a blank name or a card number shorter
    /// than six characters once whitespace is removed.
    pub fn into_payment(self, now: DateTime<Utc>) -> Result<Payment, OrderError> {
        let payer_name = self.payer_name.trim();
        if payer_name.is_empty() {
            return Err(OrderError::InvalidPayment("payer name is required".into()));
        }

        let digits: String = self
            .card_number
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let len = digits.chars().count();
        if len < MIN_CARD_LEN {
            return Err(OrderError::InvalidPayment(format!(
                "card number must have at least {MIN_CARD_LEN} characters"
            )));
        }
        let card_last4: String = digits.chars().skip(len - 4).collect();

        Ok(Payment {
            method: PaymentMethod::Card,
            payer_name: payer_name.to_string(),
            card_last4,
            paid_at: now,
        })
    }
}

impl Ledger {
    /// The order a customer's payment applies to: the first unpaid order in ledger
    /// order that the kitchen has not completed.
    pub fn first_payable(&self) -> Option<&Order> {
        self.iter().find(|order| order.is_payable())
    }

    /// Records a payment against [`Ledger::first_payable`].
    ///
    /// Marks the order paid and attaches the payment record. Status, total and
    /// every other order stay untouched. Returns the updated order.
    ///
    /// # Errors
    /// - [`OrderError::NoEligibleOrder`] when nothing is waiting for payment.
    /// - [`OrderError::InvalidPayment`] when the input fails validation.
    pub fn record_payment(
        &mut self,
        input: PaymentInput,
        now: DateTime<Utc>,
    ) -> Result<Order, OrderError> {
        let id = self
            .first_payable()
            .map(|order| order.id.clone())
            .ok_or(OrderError::NoEligibleOrder)?;
        self.record_payment_for(&id, input, now)
    }

    /// Records a payment against a specific order.
    ///
    /// # Errors
    /// - [`OrderError::NotFound`] if no order has this id.
    /// - [`OrderError::NoEligibleOrder`] if the order is already paid or completed.
    /// - [`OrderError::InvalidPayment`] when the input fails validation.
    pub fn record_payment_for(
        &mut self,
        id: &OrderId,
        input: PaymentInput,
        now: DateTime<Utc>,
    ) -> Result<Order, OrderError> {
        let order = self
            .get_mut(id)
            .ok_or_else(|| OrderError::NotFound(id.clone()))?;
        if !order.is_payable() {
            return Err(OrderError::NoEligibleOrder);
        }
        let payment = input.into_payment(now)?;
        order.paid = true;
        order.payment = Some(payment);
        Ok(order.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::tests::order;
    use crate::model::OrderStatus;

    #[test]
    fn test_payment_targets_first_eligible_order() {
        let mut ledger = Ledger::from_orders(vec![
            order(4, 80, OrderStatus::Completed, false),
            order(3, 70, OrderStatus::Placed, true),
            order(2, 60, OrderStatus::Ready, false),
            order(1, 50, OrderStatus::Placed, false),
        ]);
        let before = ledger.clone();
        let now = Utc::now();

        let paid = ledger
            .record_payment(PaymentInput::new("  Meera ", "4111 1111 1111 1234"), now)
            .unwrap();

        assert_eq!(paid.id, OrderId::from_sequence(2));
        let payment = paid.payment.as_ref().unwrap();
        assert_eq!(payment.payer_name, "Meera");
        assert_eq!(payment.card_last4, "1234");
        assert_eq!(payment.method, PaymentMethod::Card);
        assert_eq!(payment.paid_at, now);

        // Status and total untouched, other orders untouched
        assert_eq!(paid.status, OrderStatus::Ready);
        assert_eq!(paid.total, 60);
        for (after, before) in ledger.iter().zip(before.iter()) {
            if after.id != paid.id {
                assert_eq!(after, before);
            }
        }
    }

    #[test]
    fn test_payment_on_empty_ledger() {
        let mut ledger = Ledger::new();
        let result = ledger.record_payment(PaymentInput::new("Meera", "123456"), Utc::now());
        assert_eq!(result, Err(OrderError::NoEligibleOrder));
    }

    #[test]
    fn test_invalid_payment_input_leaves_ledger_unchanged() {
        let mut ledger = Ledger::from_orders(vec![order(1, 50, OrderStatus::Placed, false)]);
        let before = ledger.clone();

        let blank = ledger.record_payment(PaymentInput::new("   ", "123456"), Utc::now());
        assert!(matches!(blank, Err(OrderError::InvalidPayment(_))));

        let short = ledger.record_payment(PaymentInput::new("Meera", "12 34 5"), Utc::now());
        assert!(matches!(short, Err(OrderError::InvalidPayment(_))));

        assert_eq!(ledger, before);
    }

    #[test]
    fn test_minimum_card_length() {
        let payment = PaymentInput::new("Meera", "98 76 54").into_payment(Utc::now()).unwrap();
        assert_eq!(payment.card_last4, "7654");
    }

    #[test]
    fn test_explicit_target() {
        let mut ledger = Ledger::from_orders(vec![
            order(2, 60, OrderStatus::Placed, false),
            order(1, 50, OrderStatus::Placed, false),
        ]);
        let first = OrderId::from_sequence(1);
        let paid = ledger
            .record_payment_for(&first, PaymentInput::new("Meera", "123456"), Utc::now())
            .unwrap();
        assert_eq!(paid.id, first);
        assert!(!ledger.get(&OrderId::from_sequence(2)).unwrap().paid);

        // Second payment for the same order is refused
        let again = ledger.record_payment_for(&first, PaymentInput::new("Meera", "123456"), Utc::now());
        assert_eq!(again, Err(OrderError::NoEligibleOrder));

        let missing = OrderId::from_sequence(9);
        assert_eq!(
            ledger.record_payment_for(&missing, PaymentInput::new("Meera", "123456"), Utc::now()),
            Err(OrderError::NotFound(missing))
        );
    }
}
