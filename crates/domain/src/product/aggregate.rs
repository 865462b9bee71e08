//! Product entity with stock management.

use chrono::{DateTime, Utc};
use common::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::{Money, MoneyError};
use crate::order::Dimensions;

use super::ProductError;

/// Stock Keeping Unit: a unique, human-facing product code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sku(String);

impl Sku {
    /// Wraps a SKU string, rejecting blank values and normalizing to
    /// uppercase.
    pub fn new(value: impl Into<String>) -> Result<Self, ProductError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ProductError::InvalidSku { value });
        }
        Ok(Self(value.trim().to_uppercase()))
    }

    /// Returns the SKU as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Sku {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Product category; drives SKU prefixes and demand estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Electronics,
    Clothing,
    Books,
    HomeGarden,
    Sports,
    Toys,
    Other,
}

impl Category {
    /// Three-letter code used as the SKU prefix.
    pub fn code(&self) -> &'static str {
        match self {
            Category::Electronics => "ELC",
            Category::Clothing => "CLO",
            Category::Books => "BKS",
            Category::HomeGarden => "HGN",
            Category::Sports => "SPT",
            Category::Toys => "TOY",
            Category::Other => "OTH",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Category::Electronics => "Electronics",
            Category::Clothing => "Clothing",
            Category::Books => "Books",
            Category::HomeGarden => "HomeGarden",
            Category::Sports => "Sports",
            Category::Toys => "Toys",
            Category::Other => "Other",
        };
        write!(f, "{name}")
    }
}

/// Shipping-relevant physical attributes; snapshotted onto line items at
/// order time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PhysicalAttributes {
    pub weight_grams: Option<f64>,
    pub dimensions_cm: Option<Dimensions>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
}

/// Inventory-bearing product entity.
///
/// Stock is a `u32`, so a negative quantity is unrepresentable; the
/// reservation path is a single check-and-decrement so a caller holding
/// the exclusive borrow can never observe an oversold count. The
/// persistence layer must mirror that with a conditional update
/// (`... SET stock = stock - qty WHERE stock >= qty`) when reservations
/// race across processes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    sku: Sku,
    name: String,
    description: Option<String>,
    category: Category,
    price: Money,
    cost: Option<Money>,
    stock_quantity: u32,
    min_stock_level: u32,
    max_stock_level: u32,
    attributes: PhysicalAttributes,
    rating: f32,
    review_count: u32,
    is_active: bool,
    is_featured: bool,
    created_at: DateTime<Utc>,
    created_by: String,
    updated_at: DateTime<Utc>,
    updated_by: String,
}

impl Product {
    /// Creates an active product with zero stock.
    pub fn create(
        id: ProductId,
        sku: Sku,
        name: impl Into<String>,
        category: Category,
        price: Money,
        actor: &str,
    ) -> Result<Self, ProductError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ProductError::InvalidName);
        }
        if price.is_zero() {
            return Err(ProductError::InvalidPrice {
                price: price.to_string(),
            });
        }

        let now = Utc::now();
        Ok(Self {
            id,
            sku,
            name,
            description: None,
            category,
            price,
            cost: None,
            stock_quantity: 0,
            min_stock_level: 0,
            max_stock_level: 0,
            attributes: PhysicalAttributes::default(),
            rating: 0.0,
            review_count: 0,
            is_active: true,
            is_featured: false,
            created_at: now,
            created_by: actor.to_string(),
            updated_at: now,
            updated_by: actor.to_string(),
        })
    }
}

// Query methods
impl Product {
    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn cost(&self) -> Option<Money> {
        self.cost
    }

    pub fn stock_quantity(&self) -> u32 {
        self.stock_quantity
    }

    pub fn min_stock_level(&self) -> u32 {
        self.min_stock_level
    }

    pub fn max_stock_level(&self) -> u32 {
        self.max_stock_level
    }

    pub fn attributes(&self) -> &PhysicalAttributes {
        &self.attributes
    }

    pub fn rating(&self) -> f32 {
        self.rating
    }

    pub fn review_count(&self) -> u32 {
        self.review_count
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_featured(&self) -> bool {
        self.is_featured
    }

    pub fn updated_by(&self) -> &str {
        &self.updated_by
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns true when any stock is available.
    pub fn is_in_stock(&self) -> bool {
        self.stock_quantity > 0
    }

    /// Returns true when stock has fallen to the reorder threshold.
    pub fn needs_restocking(&self) -> bool {
        self.stock_quantity <= self.min_stock_level
    }

    /// Returns true when stock exceeds the configured maximum.
    pub fn is_overstocked(&self) -> bool {
        self.max_stock_level > 0 && self.stock_quantity > self.max_stock_level
    }

    /// Absolute profit per unit (`price - cost`), in the price currency.
    /// `None` when no cost is recorded; negative when selling below cost.
    pub fn profit(&self) -> Option<Decimal> {
        self.cost
            .map(|cost| self.price.amount() - cost.amount())
    }

    /// Profit margin as a percentage of price. `None` when no cost is
    /// recorded.
    pub fn profit_margin(&self) -> Option<Decimal> {
        self.profit().map(|profit| {
            (profit / self.price.amount() * Decimal::ONE_HUNDRED).round_dp(2)
        })
    }
}

// Mutation methods
impl Product {
    /// Attempts to reserve `quantity` units in one check-and-decrement
    /// step.
    ///
    /// Returns `Ok(false)`, without touching the stock, when fewer than
    /// `quantity` units are available; insufficient stock is a routine
    /// outcome, not an error.
    pub fn reserve_stock(&mut self, quantity: u32, actor: &str) -> Result<bool, ProductError> {
        if quantity == 0 {
            return Err(ProductError::InvalidQuantity { quantity });
        }
        if self.stock_quantity < quantity {
            return Ok(false);
        }
        self.stock_quantity -= quantity;
        self.touch(actor);
        Ok(true)
    }

    /// Returns previously reserved units to stock.
    pub fn release_stock(&mut self, quantity: u32, actor: &str) -> Result<(), ProductError> {
        if quantity == 0 {
            return Err(ProductError::InvalidQuantity { quantity });
        }
        self.stock_quantity = self.stock_quantity.saturating_add(quantity);
        self.touch(actor);
        Ok(())
    }

    /// Applies a signed stock correction, e.g. after a physical count.
    pub fn adjust_stock(&mut self, delta: i64, actor: &str) -> Result<(), ProductError> {
        let new_quantity = i64::from(self.stock_quantity) + delta;
        if new_quantity < 0 {
            return Err(ProductError::NegativeStock {
                current: self.stock_quantity,
                delta,
            });
        }
        if new_quantity > i64::from(u32::MAX) {
            return Err(ProductError::StockOverflow {
                current: self.stock_quantity,
                delta,
            });
        }
        self.stock_quantity = new_quantity as u32;
        self.touch(actor);
        Ok(())
    }

    /// Sets the restock thresholds.
    pub fn set_stock_levels(&mut self, min: u32, max: u32, actor: &str) -> Result<(), ProductError> {
        if max < min {
            return Err(ProductError::InvalidStockLevels { min, max });
        }
        self.min_stock_level = min;
        self.max_stock_level = max;
        self.touch(actor);
        Ok(())
    }

    /// Changes the selling price.
    pub fn update_price(&mut self, price: Money, actor: &str) -> Result<(), ProductError> {
        if price.is_zero() {
            return Err(ProductError::InvalidPrice {
                price: price.to_string(),
            });
        }
        if let Some(cost) = self.cost {
            if cost.currency() != price.currency() {
                return Err(ProductError::Money(MoneyError::CurrencyMismatch {
                    left: price.currency(),
                    right: cost.currency(),
                }));
            }
        }
        self.price = price;
        self.touch(actor);
        Ok(())
    }

    /// Records the unit cost; must match the price currency.
    pub fn update_cost(&mut self, cost: Money, actor: &str) -> Result<(), ProductError> {
        if cost.currency() != self.price.currency() {
            return Err(ProductError::Money(MoneyError::CurrencyMismatch {
                left: self.price.currency(),
                right: cost.currency(),
            }));
        }
        self.cost = Some(cost);
        self.touch(actor);
        Ok(())
    }

    /// Replaces the description.
    pub fn update_description(&mut self, description: impl Into<String>, actor: &str) {
        self.description = Some(description.into());
        self.touch(actor);
    }

    /// Replaces the physical attributes snapshotted onto future orders.
    pub fn update_physical_attributes(&mut self, attributes: PhysicalAttributes, actor: &str) {
        self.attributes = attributes;
        self.touch(actor);
    }

    /// Folds a review rating into the running average.
    pub fn record_review(&mut self, rating: f32) -> Result<(), ProductError> {
        if !(0.0..=5.0).contains(&rating) || !rating.is_finite() {
            return Err(ProductError::InvalidRating { rating });
        }
        let count = self.review_count as f32;
        self.rating = (self.rating * count + rating) / (count + 1.0);
        self.review_count += 1;
        Ok(())
    }

    /// Soft-deactivates the product. Products referenced by orders are
    /// never removed, only deactivated.
    pub fn deactivate(&mut self, actor: &str) {
        self.is_active = false;
        self.touch(actor);
    }

    /// Reactivates the product.
    pub fn activate(&mut self, actor: &str) {
        self.is_active = true;
        self.touch(actor);
    }

    /// Marks the product as featured.
    pub fn feature(&mut self, actor: &str) {
        self.is_featured = true;
        self.touch(actor);
    }

    /// Clears the featured flag.
    pub fn unfeature(&mut self, actor: &str) {
        self.is_featured = false;
        self.touch(actor);
    }

    fn touch(&mut self, actor: &str) {
        self.updated_at = Utc::now();
        self.updated_by = actor.to_string();
    }
}
