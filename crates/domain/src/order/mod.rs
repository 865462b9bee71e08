//! Order aggregate and related types.

mod aggregate;
mod line_item;
mod service;
mod status;

pub use aggregate::{ContactInfo, Order};
pub use line_item::{Dimensions, LineItem};
pub use service::OrderDomainService;
pub use status::OrderStatus;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::MoneyError;

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Line items and charges can only change while the order is pending.
    #[error("Order is {status}, not Pending: cannot {action}")]
    NotPending {
        status: OrderStatus,
        action: &'static str,
    },

    /// Requested status change is not in the transition table.
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },

    /// Invalid quantity.
    #[error("Invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: u32 },

    /// Product reference in a line item is unusable.
    #[error("Invalid product: {reason}")]
    InvalidProduct { reason: &'static str },

    /// Monetary arithmetic failed (currency mismatch, negative result, ...).
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Human-readable unique order number, e.g. `ORD-20260807-049301`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Wraps an order-number string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the order number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for OrderNumber {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
