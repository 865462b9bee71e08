//! Order and inventory domain model.
//!
//! This crate provides the core commerce domain:
//! - `Money`/`Currency` value objects with currency-safe arithmetic
//! - The `Order` aggregate owning its line items and a status state machine
//! - The `Product` entity with atomic stock reservation and release
//! - `OrderDomainService`/`ProductDomainService` for rules spanning
//!   aggregates (availability, reservation with rollback, shipping/tax,
//!   unique identifier generation, validation)
//! - Async repository traits with in-memory implementations
//!
//! The domain objects are synchronous and hold no resources; all I/O goes
//! through the repository traits and is cancellable by dropping futures.

pub mod address;
pub mod customer;
pub mod error;
pub mod idgen;
pub mod money;
pub mod order;
pub mod product;
pub mod rates;
pub mod repository;
pub mod validation;

pub use address::Address;
pub use customer::Customer;
pub use error::DomainError;
pub use idgen::{Clock, RandomSource, SystemClock, ThreadRngSource};
pub use money::{Currency, Money, MoneyError};
pub use order::{
    ContactInfo, Dimensions, LineItem, Order, OrderDomainService, OrderError, OrderNumber,
    OrderStatus,
};
pub use product::{
    Category, PhysicalAttributes, Product, ProductDomainService, ProductError, Sku,
};
pub use rates::{FlatShippingRates, RegionTaxTable, ShippingRateSource, TaxRateSource};
pub use repository::{
    CustomerRepository, InMemoryCustomerRepository, InMemoryOrderRepository,
    InMemoryProductRepository, OrderRepository, ProductRepository,
};
pub use validation::ValidationReport;
