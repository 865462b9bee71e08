//! Domain error types.

use thiserror::Error;

use crate::money::MoneyError;
use crate::order::OrderError;
use crate::product::ProductError;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Monetary invariant violated.
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    /// An error occurred in the order aggregate.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// An error occurred in the product entity.
    #[error("Product error: {0}")]
    Product(#[from] ProductError),

    /// Entity not found.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// No unique identifier could be generated within the retry budget.
    /// Indicates a collision-rate anomaly or an exhausted namespace.
    #[error("Exhausted {attempts} attempts generating a unique {kind}")]
    GenerationExhausted { kind: &'static str, attempts: u32 },

    /// An error occurred in a repository implementation.
    #[error("Repository error: {0}")]
    Repository(String),
}
