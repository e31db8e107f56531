//! Session-scoped shopping cart.
//!
//! A [`Cart`] maps menu item ids to positive quantities. It lives only as long as
//! the customer's session; it is never persisted and is turned into an
//! [`Order`](crate::model::Order) by [`checkout`](crate::model::checkout).

use crate::error::OrderError;
use crate::model::{Catalog, MenuItemId};
use std::collections::BTreeMap;

/// Mapping of menu item id to quantity.
///
/// No entry is ever stored with a quantity of zero; decrementing an entry to zero
/// or below removes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    entries: BTreeMap<MenuItemId, u64>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one unit of `id`, inserting the entry at quantity 1 if absent.
    pub fn add_item(&mut self, id: MenuItemId) {
        let quantity = self.entries.entry(id).or_insert(0);
        *quantity = quantity.saturating_add(1);
    }

    /// Adds `delta` to the current quantity of `id` (0 if absent).
    ///
    /// A resulting quantity of zero or less removes the entry. Over-decrementing
    /// is not an error. Quantities saturate at `u64::MAX`.
    pub fn change_quantity(&mut self, id: MenuItemId, delta: i64) {
        let next = i128::from(self.quantity(id)) + i128::from(delta);
        if next <= 0 {
            self.entries.remove(&id);
        } else {
            self.entries
                .insert(id, u64::try_from(next).unwrap_or(u64::MAX));
        }
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Current quantity of `id`, 0 when absent.
    pub fn quantity(&self, id: MenuItemId) -> u64 {
        self.entries.get(&id).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct items in the cart.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in ascending menu id order.
    pub fn iter(&self) -> impl Iterator<Item = (MenuItemId, u64)> + '_ {
        self.entries.iter().map(|(id, qty)| (*id, *qty))
    }

    /// Sum of `price × quantity` over all entries.
    ///
    /// # Errors
    /// [`OrderError::UnknownMenuItem`] if an entry references an id the catalog does
    /// not know, which means the cart and catalog are out of sync.
    pub fn total(&self, catalog: &Catalog) -> Result<u64, OrderError> {
        self.iter().try_fold(0u64, |sum, (id, qty)| {
            let price = catalog
                .price(id)
                .ok_or(OrderError::UnknownMenuItem(id))?;
            Ok(sum.saturating_add(price.saturating_mul(qty)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_add_item_increments() {
        let mut cart = Cart::new();
        cart.add_item(MenuItemId(1));
        cart.add_item(MenuItemId(1));
        cart.add_item(MenuItemId(2));
        assert_eq!(cart.quantity(MenuItemId(1)), 2);
        assert_eq!(cart.quantity(MenuItemId(2)), 1);
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_change_quantity_removes_at_zero() {
        let mut cart = Cart::new();
        cart.add_item(MenuItemId(4));
        cart.change_quantity(MenuItemId(4), -1);
        assert!(cart.is_empty());

        // Over-decrement on an absent entry is silently ignored
        cart.change_quantity(MenuItemId(4), -3);
        assert!(cart.is_empty());

        cart.change_quantity(MenuItemId(4), 3);
        assert_eq!(cart.quantity(MenuItemId(4)), 3);
    }

    #[test]
    fn test_total_empty_cart_is_zero() {
        assert_eq!(Cart::new().total(&Catalog::demo()), Ok(0));
    }

    #[test]
    fn test_total_unknown_item_is_integrity_error() {
        let mut cart = Cart::new();
        cart.add_item(MenuItemId(99));
        assert_eq!(
            cart.total(&Catalog::demo()),
            Err(OrderError::UnknownMenuItem(MenuItemId(99)))
        );
    }

    #[test]
    fn test_large_quantities_do_not_wrap() {
        let mut cart = Cart::new();
        cart.change_quantity(MenuItemId(1), 5_000_000_000);
        cart.add_item(MenuItemId(1));
        assert_eq!(cart.quantity(MenuItemId(1)), 5_000_000_001);

        cart.change_quantity(MenuItemId(2), i64::MAX);
        cart.change_quantity(MenuItemId(2), i64::MAX);
        cart.change_quantity(MenuItemId(2), i64::MAX);
        cart.add_item(MenuItemId(2));
        assert_eq!(cart.quantity(MenuItemId(2)), u64::MAX);

        // Price × quantity saturates instead of overflowing
        assert_eq!(cart.total(&Catalog::demo()), Ok(u64::MAX));
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_item(MenuItemId(1));
        cart.clear();
        assert!(cart.is_empty());
    }

    #[derive(Debug, Clone)]
    enum CartOp {
        Add(u32),
        Change(u32, i64),
    }

    fn arb_op() -> impl Strategy<Value = CartOp> {
        prop_oneof![
            (1u32..=6).prop_map(CartOp::Add),
            (1u32..=6, -4i64..=4).prop_map(|(id, delta)| CartOp::Change(id, delta)),
            (1u32..=6, -10_000_000_000i64..=10_000_000_000).prop_map(|(id, delta)| CartOp::Change(id, delta)),
        ]
    }

    proptest! {
        /// The total always equals the sum over surviving entries, none of which is empty.
        #[test]
        fn prop_total_matches_surviving_entries(ops in prop::collection::vec(arb_op(), 0..64)) {
            let catalog = Catalog::demo();
            let mut cart = Cart::new();
            let mut model: BTreeMap<u32, i128> = BTreeMap::new();

            for op in ops {
                match op {
                    CartOp::Add(id) => {
                        cart.add_item(MenuItemId(id));
                        *model.entry(id).or_insert(0) += 1;
                    }
                    CartOp::Change(id, delta) => {
                        cart.change_quantity(MenuItemId(id), delta);
                        let next = model.get(&id).copied().unwrap_or(0) + i128::from(delta);
                        if next <= 0 {
                            model.remove(&id);
                        } else {
                            model.insert(id, next);
                        }
                    }
                }
            }

            prop_assert!(cart.iter().all(|(_, qty)| qty > 0));
            let expected: u64 = model
                .iter()
                .map(|(id, qty)| catalog.price(MenuItemId(*id)).unwrap() * u64::try_from(*qty).unwrap())
                .sum();
            prop_assert_eq!(cart.total(&catalog).unwrap(), expected);
        }
    }
}
