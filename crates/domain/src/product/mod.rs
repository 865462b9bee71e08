//! Product entity, stock operations, and related types.

mod aggregate;
mod service;

pub use aggregate::{Category, PhysicalAttributes, Product, Sku};
pub use service::ProductDomainService;

use thiserror::Error;

use crate::money::MoneyError;

/// Errors that can occur during product operations.
#[derive(Debug, Error)]
pub enum ProductError {
    /// SKU is blank or malformed.
    #[error("Invalid SKU: {value:?}")]
    InvalidSku { value: String },

    /// Product name is blank.
    #[error("Product name is blank")]
    InvalidName,

    /// Price must be greater than zero.
    #[error("Invalid price: {price}")]
    InvalidPrice { price: String },

    /// Invalid quantity.
    #[error("Invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: u32 },

    /// A stock adjustment would drop the quantity below zero.
    #[error("Stock adjustment by {delta} from {current} would go negative")]
    NegativeStock { current: u32, delta: i64 },

    /// A stock adjustment would overflow the stock counter.
    #[error("Stock adjustment by {delta} from {current} overflows")]
    StockOverflow { current: u32, delta: i64 },

    /// Max stock level must be at least the min stock level.
    #[error("Invalid stock levels: min {min} exceeds max {max}")]
    InvalidStockLevels { min: u32, max: u32 },

    /// Rating must be within 0..=5.
    #[error("Invalid rating: {rating} (must be between 0 and 5)")]
    InvalidRating { rating: f32 },

    /// Monetary arithmetic failed (currency mismatch, ...).
    #[error(transparent)]
    Money(#[from] MoneyError),
}
