//! # Customer Client
//!
//! The customer's view: browse the menu, fill a cart, place and pay for orders.
//! The cart lives here and is never persisted.
use crate::clients::LedgerAccess;
use crate::error::OrderError;
use crate::framework::LedgerClient;
use crate::ledger::PaymentInput;
use crate::model::{Cart, MenuItem, MenuItemId, Order, OrderId};
use tracing::{debug, info, instrument};

#[derive(Clone)]
pub struct CustomerClient {
    inner: LedgerClient,
    cart: Cart,
}

impl CustomerClient {
    pub fn new(inner: LedgerClient) -> Self {
        Self {
            inner,
            cart: Cart::new(),
        }
    }

    pub fn menu(&self) -> &[MenuItem] {
        self.inner.catalog().items()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn add_item(&mut self, id: MenuItemId) {
        self.cart.add_item(id);
    }

    pub fn change_quantity(&mut self, id: MenuItemId, delta: i64) {
        self.cart.change_quantity(id, delta);
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    pub fn cart_total(&self) -> Result<u64, OrderError> {
        self.cart.total(self.inner.catalog())
    }

    /// Places an order for the current cart.
    ///
    /// The cart is emptied only once the order is stored; on failure it is kept
    /// so the customer can retry.
    #[instrument(skip(self))]
    pub async fn place_order(&mut self) -> Result<Order, OrderError> {
        debug!(cart = ?self.cart, "place_order called");
        let order = self.inner.place_order(self.cart.clone()).await?;
        self.cart.clear();
        info!(id = %order.id, total = order.total, "Order placed");
        Ok(order)
    }

    /// Pays the first order still awaiting payment.
    #[instrument(skip(self, card_number))]
    pub async fn pay(&self, payer_name: &str, card_number: &str) -> Result<Order, OrderError> {
        debug!("Sending request");
        self.inner
            .record_payment(PaymentInput::new(payer_name, card_number))
            .await
    }

    /// Pays a specific order.
    #[instrument(skip(self, card_number))]
    pub async fn pay_order(
        &self,
        id: OrderId,
        payer_name: &str,
        card_number: &str,
    ) -> Result<Order, OrderError> {
        debug!("Sending request");
        self.inner
            .record_payment_for(id, PaymentInput::new(payer_name, card_number))
            .await
    }
}

impl LedgerAccess for CustomerClient {
    fn inner(&self) -> &LedgerClient {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockLedger;
    use crate::ledger::tests::order;
    use crate::model::OrderStatus;

    #[tokio::test]
    async fn test_cart_cleared_after_successful_order() {
        let mut mock = MockLedger::new();
        mock.expect_place_order()
            .return_ok(order(1, 440, OrderStatus::Placed, false));

        let mut customer = CustomerClient::new(mock.client());
        customer.add_item(MenuItemId(1));
        customer.add_item(MenuItemId(1));
        assert_eq!(customer.cart_total().unwrap(), 440);

        let placed = customer.place_order().await.unwrap();
        assert_eq!(placed.id, OrderId::from_sequence(1));
        assert!(customer.cart().is_empty());
        mock.verify();
    }

    #[tokio::test]
    async fn test_cart_kept_when_order_fails() {
        let mut mock = MockLedger::new();
        mock.expect_place_order()
            .return_err(OrderError::Storage("quota exceeded".into()));

        let mut customer = CustomerClient::new(mock.client());
        customer.add_item(MenuItemId(4));
        customer.change_quantity(MenuItemId(4), 2);

        assert!(customer.place_order().await.is_err());
        assert_eq!(customer.cart().quantity(MenuItemId(4)), 3);
        mock.verify();
    }

    #[tokio::test]
    async fn test_pay_routes_to_target() {
        let mut mock = MockLedger::new();
        mock.expect_payment(None)
            .return_err(OrderError::NoEligibleOrder);
        mock.expect_payment(Some(OrderId::from_sequence(3)))
            .return_ok(order(3, 120, OrderStatus::Ready, true));

        let customer = CustomerClient::new(mock.client());
        assert_eq!(
            customer.pay("Asha", "4111 1111").await,
            Err(OrderError::NoEligibleOrder)
        );
        let paid = customer
            .pay_order(OrderId::from_sequence(3), "Asha", "4111 1111")
            .await
            .unwrap();
        assert!(paid.paid);
        mock.verify();
    }

    #[test]
    fn test_menu_comes_from_catalog() {
        let (client, _requests) = crate::framework::mock::create_mock_client(1);
        let customer = CustomerClient::new(client);
        assert_eq!(customer.menu().len(), 6);
        assert_eq!(customer.menu()[0].name, "Paneer Tikka");
    }
}
