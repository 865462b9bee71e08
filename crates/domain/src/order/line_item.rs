//! Line items: immutable product snapshots inside an order.

use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::product::Sku;

use super::OrderError;

/// Physical dimensions of an item, in centimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length_cm: f64,
    pub width_cm: f64,
    pub height_cm: f64,
}

impl Dimensions {
    /// Creates a dimensions value.
    pub fn new(length_cm: f64, width_cm: f64, height_cm: f64) -> Self {
        Self {
            length_cm,
            width_cm,
            height_cm,
        }
    }

    /// Returns the bounding volume in cubic centimeters.
    pub fn volume_cm3(&self) -> f64 {
        self.length_cm * self.width_cm * self.height_cm
    }
}

/// A product snapshot inside an order.
///
/// Captures price and shipping-relevant attributes at order time so later
/// product mutations never retroactively alter historical orders. The
/// value is immutable; quantity changes go through
/// [`LineItem::with_quantity`], which returns a new snapshot with a
/// recomputed total. Two line items describe the same product when their
/// `product_id`s match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    product_id: ProductId,
    product_name: String,
    product_sku: Sku,
    quantity: u32,
    unit_price: Money,
    total_price: Money,
    weight_grams: Option<f64>,
    dimensions_cm: Option<Dimensions>,
    brand: Option<String>,
    model: Option<String>,
    color: Option<String>,
    size: Option<String>,
}

impl LineItem {
    /// Creates a line item, computing `total_price = unit_price × quantity`.
    pub fn new(
        product_id: ProductId,
        product_name: impl Into<String>,
        product_sku: Sku,
        quantity: u32,
        unit_price: Money,
    ) -> Result<Self, OrderError> {
        if quantity == 0 {
            return Err(OrderError::InvalidQuantity { quantity });
        }
        let product_name = product_name.into();
        if product_name.trim().is_empty() {
            return Err(OrderError::InvalidProduct {
                reason: "product name is blank",
            });
        }
        let total_price = unit_price.multiply(quantity.into())?;

        Ok(Self {
            product_id,
            product_name,
            product_sku,
            quantity,
            unit_price,
            total_price,
            weight_grams: None,
            dimensions_cm: None,
            brand: None,
            model: None,
            color: None,
            size: None,
        })
    }

    /// Returns a new snapshot with the given quantity and a recomputed
    /// total; all other attributes are carried over.
    pub fn with_quantity(&self, quantity: u32) -> Result<Self, OrderError> {
        if quantity == 0 {
            return Err(OrderError::InvalidQuantity { quantity });
        }
        let total_price = self.unit_price.multiply(quantity.into())?;
        Ok(Self {
            quantity,
            total_price,
            ..self.clone()
        })
    }

    /// Sets the per-unit weight snapshot.
    pub fn with_weight_grams(mut self, weight_grams: f64) -> Self {
        self.weight_grams = Some(weight_grams);
        self
    }

    /// Sets the dimensions snapshot.
    pub fn with_dimensions_cm(mut self, dimensions: Dimensions) -> Self {
        self.dimensions_cm = Some(dimensions);
        self
    }

    /// Sets the brand snapshot.
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// Sets the model snapshot.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the color snapshot.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Sets the size snapshot.
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn product_sku(&self) -> &Sku {
        &self.product_sku
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn total_price(&self) -> Money {
        self.total_price
    }

    pub fn weight_grams(&self) -> Option<f64> {
        self.weight_grams
    }

    pub fn dimensions_cm(&self) -> Option<Dimensions> {
        self.dimensions_cm
    }

    pub fn brand(&self) -> Option<&str> {
        self.brand.as_deref()
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn size(&self) -> Option<&str> {
        self.size.as_deref()
    }

    /// Returns `weight × quantity`, or `None` when the snapshot carries no
    /// weight. Callers must treat `None` as "unknown", never as zero.
    pub fn total_weight_grams(&self) -> Option<f64> {
        self.weight_grams.map(|w| w * self.quantity as f64)
    }
}
