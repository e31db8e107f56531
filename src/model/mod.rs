//! Pure data structures: the menu, the customer's cart and the order snapshot.

pub mod cart;
pub mod menu;
pub mod order;

pub use cart::*;
pub use menu::*;
pub use order::*;
