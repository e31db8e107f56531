//! Role-specific wrappers around [`LedgerClient`](crate::framework::LedgerClient).
//!
//! Each role sees only the operations its screen offers. None of them performs
//! authorization; the surrounding application decides who gets which client.

pub mod access;
pub mod customer_client;
pub mod kitchen_client;
pub mod owner_client;

pub use access::*;
pub use customer_client::*;
pub use kitchen_client::*;
pub use owner_client::*;
