//! Async repository interfaces and in-memory implementations.
//!
//! The domain services depend on these traits only; database-backed
//! implementations live outside this crate. Calls are async and
//! cancellable by dropping the future. The in-memory variants back the
//! test suites and hold their state behind a `tokio::sync::RwLock`.

mod customers;
mod orders;
mod products;

pub use customers::{CustomerRepository, InMemoryCustomerRepository};
pub use orders::{InMemoryOrderRepository, OrderRepository};
pub use products::{InMemoryProductRepository, ProductRepository};
