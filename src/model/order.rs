//! Represents a customer order.
//!
//! An order is an immutable snapshot of a [`Cart`](crate::model::Cart) taken at
//! checkout. Only three things change after creation: [`Order::status`],
//! [`Order::paid`] and [`Order::payment`]. The `total` is computed once and kept.
//!
//! # Wire format
//! Orders serialize to camelCase JSON. The legacy field names written by the
//! first version of the app (`qty`, `price`, `time`, `cardName`) are accepted on input.

use crate::error::OrderError;
use crate::model::{Cart, Catalog, MenuItemId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

const ORDER_ID_PREFIX: &str = "ORD-";

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    /// Id for the `n`th order of a ledger, e.g. `ORD-000042`.
    pub fn from_sequence(n: u64) -> Self {
        Self(format!("{ORDER_ID_PREFIX}{n:06}"))
    }

    /// Sequence number encoded in the id, `None` for ids of another shape.
    pub fn sequence(&self) -> Option<u64> {
        self.0.strip_prefix(ORDER_ID_PREFIX)?.parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for OrderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kitchen progress of an order.
///
/// The natural order of advance is `Placed < Preparing < Ready < Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Placed,
    Preparing,
    Ready,
    Completed,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Placed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Completed,
    ];

    /// The next step in the kitchen flow, `None` once completed.
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Placed => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::Completed),
            OrderStatus::Completed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == OrderStatus::Completed
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Placed => "placed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| OrderError::InvalidStatus(s.to_string()))
    }
}

/// One line of an order, copied from the catalog at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(alias = "id")]
    pub menu_item_id: MenuItemId,
    pub name: String,
    #[serde(alias = "price")]
    pub unit_price: u64,
    #[serde(alias = "qty")]
    pub quantity: u64,
}

impl OrderItem {
    /// `unit_price × quantity`, saturating at `u64::MAX`.
    pub fn line_total(&self) -> u64 {
        self.unit_price.saturating_mul(self.quantity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
}

/// Record of a (simulated) payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub method: PaymentMethod,
    #[serde(alias = "cardName")]
    pub payer_name: String,
    pub card_last4: String,
    #[serde(alias = "time")]
    pub paid_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    #[serde(default)]
    pub paid: bool,
    #[serde(default)]
    pub total: u64,
    #[serde(alias = "time")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<Payment>,
}

impl Order {
    /// An order still waiting for payment that the kitchen has not finished.
    pub fn is_payable(&self) -> bool {
        !self.paid && !self.status.is_terminal()
    }

    /// Number of units across all lines.
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .fold(0u64, |count, item| count.saturating_add(item.quantity))
    }
}

/// Builds an order snapshot from the cart.
///
/// Copies name and price of every cart entry out of the catalog, computes the
/// total and starts the order as `placed` and unpaid. The ledger and the cart are
/// left untouched; appending and clearing is the caller's job.
///
/// # Errors
/// - [`OrderError::EmptyCart`] when there is nothing to order.
/// - [`OrderError::UnknownMenuItem`] when the cart references an id the catalog
///   does not contain.
pub fn checkout(
    cart: &Cart,
    catalog: &Catalog,
    id: OrderId,
    now: DateTime<Utc>,
) -> Result<Order, OrderError> {
    if cart.is_empty() {
        return Err(OrderError::EmptyCart);
    }

    let items = cart
        .iter()
        .map(|(menu_id, quantity)| {
            let item = catalog
                .get(menu_id)
                .ok_or(OrderError::UnknownMenuItem(menu_id))?;
            Ok(OrderItem {
                menu_item_id: item.id,
                name: item.name.clone(),
                unit_price: item.price,
                quantity,
            })
        })
        .collect::<Result<Vec<_>, OrderError>>()?;
    let total = items
        .iter()
        .fold(0u64, |sum, item| sum.saturating_add(item.line_total()));

    Ok(Order {
        id,
        items,
        status: OrderStatus::Placed,
        paid: false,
        total,
        created_at: now,
        payment: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MenuItem;

    fn two_item_catalog() -> Catalog {
        Catalog::new([
            MenuItem::new(1, "Samosa", 10, "Fried pastry"),
            MenuItem::new(2, "Thali", 25, "Full plate"),
        ])
    }

    #[test]
    fn test_checkout_snapshot() {
        let catalog = two_item_catalog();
        let mut cart = Cart::new();
        cart.add_item(MenuItemId(1));
        cart.add_item(MenuItemId(1));
        cart.add_item(MenuItemId(2));

        let now = Utc::now();
        let order = checkout(&cart, &catalog, OrderId::from_sequence(1), now).unwrap();

        assert_eq!(order.total, 45);
        assert_eq!(order.status, OrderStatus::Placed);
        assert!(!order.paid);
        assert!(order.payment.is_none());
        assert_eq!(order.created_at, now);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].name, "Samosa");
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(order.item_count(), 3);

        // Cart is not consumed
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_checkout_empty_cart_rejected() {
        let result = checkout(
            &Cart::new(),
            &two_item_catalog(),
            OrderId::from_sequence(1),
            Utc::now(),
        );
        assert_eq!(result, Err(OrderError::EmptyCart));
    }

    #[test]
    fn test_checkout_unknown_item_rejected() {
        let mut cart = Cart::new();
        cart.add_item(MenuItemId(7));
        let result = checkout(&cart, &two_item_catalog(), OrderId::from_sequence(1), Utc::now());
        assert_eq!(result, Err(OrderError::UnknownMenuItem(MenuItemId(7))));
    }

    #[test]
    fn test_order_id_sequence() {
        let id = OrderId::from_sequence(42);
        assert_eq!(id.as_str(), "ORD-000042");
        assert_eq!(id.sequence(), Some(42));
        assert_eq!(OrderId::from("ORD123456").sequence(), None);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(" Ready ".parse::<OrderStatus>(), Ok(OrderStatus::Ready));
        assert_eq!("COMPLETED".parse::<OrderStatus>(), Ok(OrderStatus::Completed));
        assert_eq!(
            "cooking".parse::<OrderStatus>(),
            Err(OrderError::InvalidStatus("cooking".to_string()))
        );
    }

    #[test]
    fn test_status_next_chain() {
        assert_eq!(OrderStatus::Placed.next(), Some(OrderStatus::Preparing));
        assert_eq!(OrderStatus::Ready.next(), Some(OrderStatus::Completed));
        assert_eq!(OrderStatus::Completed.next(), None);
        assert!(OrderStatus::Placed < OrderStatus::Completed);
    }
}
