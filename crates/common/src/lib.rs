//! Shared identifier types for the order/catalog domain.
//!
//! Each entity family gets its own UUID-backed newtype so that order,
//! product, and customer identifiers cannot be mixed up at compile time.

mod types;

pub use types::{CustomerId, OrderId, ProductId};
