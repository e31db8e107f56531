//! Represents a dish on the restaurant menu.
//!
//! Menu items are defined once when the [`Catalog`] is built and never change
//! afterwards. Orders copy the name and price they need at checkout, so a later
//! catalog change cannot rewrite history.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for menu items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuItemId(pub u32);

impl From<u32> for MenuItemId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for MenuItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "item_{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    /// Whole currency units.
    pub price: u64,
    pub description: String,
}

impl MenuItem {
    /// Creates a new MenuItem instance.
    ///
    /// # Arguments
    /// * `id` - Stable identifier, unique within the catalog
    /// * `name` - Display name
    /// * `price` - Unit price in whole currency units
    /// * `description` - Short description shown on the menu card
    pub fn new(
        id: u32,
        name: impl Into<String>,
        price: u64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: MenuItemId(id),
            name: name.into(),
            price,
            description: description.into(),
        }
    }
}

/// Static, ordered lookup table of purchasable items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    items: Vec<MenuItem>,
}

impl Catalog {
    /// Builds a catalog from items in display order.
    ///
    /// Later duplicates of an id are dropped so that lookups stay unambiguous.
    pub fn new(items: impl IntoIterator<Item = MenuItem>) -> Self {
        let mut unique: Vec<MenuItem> = Vec::new();
        for item in items {
            if unique.iter().all(|existing| existing.id != item.id) {
                unique.push(item);
            }
        }
        Self { items: unique }
    }

    /// The six-dish menu the restaurant demo ships with.
    pub fn demo() -> Self {
        Self::new([
            MenuItem::new(1, "Paneer Tikka", 220, "Grilled paneer with spices"),
            MenuItem::new(2, "Classic Burger", 180, "Beef burger with fries"),
            MenuItem::new(3, "Veg Biryani", 240, "Aromatic saffron rice"),
            MenuItem::new(4, "Caesar Salad", 150, "Romaine with parmesan"),
            MenuItem::new(5, "Chocolate Mousse", 140, "Rich chocolate dessert"),
            MenuItem::new(6, "Masala Dosa", 120, "Crispy dosa with chutney"),
        ])
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn get(&self, id: MenuItemId) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn price(&self, id: MenuItemId) -> Option<u64> {
        self.get(id).map(|item| item.price)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::demo()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_catalog_lookup() {
        let catalog = Catalog::demo();
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.price(MenuItemId(3)), Some(240));
        assert_eq!(catalog.get(MenuItemId(6)).unwrap().name, "Masala Dosa");
        assert!(catalog.get(MenuItemId(42)).is_none());
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let catalog = Catalog::new([
            MenuItem::new(1, "Tea", 10, ""),
            MenuItem::new(1, "Coffee", 25, ""),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.price(MenuItemId(1)), Some(10));
    }
}
