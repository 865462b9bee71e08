//! Product business rules: SKU generation, restock heuristics, and
//! validation.

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::DomainError;
use crate::idgen::{Clock, RandomSource, SystemClock, ThreadRngSource};
use crate::money::Money;
use crate::repository::ProductRepository;
use crate::validation::ValidationReport;

use super::{Category, Product, Sku};

/// Bounded retry budget for SKU generation.
const MAX_GENERATION_ATTEMPTS: u32 = 10;

/// Margins below this percentage draw an advisory warning.
const LOW_MARGIN_THRESHOLD: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

/// Supplier lead time assumed by the reorder heuristics, in days.
const LEAD_TIME_DAYS: f64 = 7.0;

/// Extra days of demand kept as safety stock.
const SAFETY_STOCK_DAYS: f64 = 3.0;

/// Fixed cost per replenishment order assumed by the EOQ formula.
const ORDERING_COST: f64 = 50.0;

/// Annual holding cost as a fraction of unit price.
const HOLDING_COST_RATE: f64 = 0.10;

/// Product-side business rules.
pub struct ProductDomainService<P> {
    products: Arc<P>,
    clock: Arc<dyn Clock>,
    random: Arc<dyn RandomSource>,
}

impl<P> ProductDomainService<P>
where
    P: ProductRepository,
{
    /// Creates a service with system clock and randomness.
    pub fn new(products: Arc<P>) -> Self {
        Self {
            products,
            clock: Arc::new(SystemClock),
            random: Arc::new(ThreadRngSource),
        }
    }

    /// Overrides the clock used for SKU datestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Overrides the random source used for SKU suffixes.
    pub fn with_random_source(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    /// Generates a unique SKU of the form `CAT-BRD-YYMMDD-NNNN`, retrying
    /// against the uniqueness check up to 10 times.
    #[tracing::instrument(skip(self))]
    pub async fn generate_unique_sku(
        &self,
        category: Category,
        brand: &str,
    ) -> Result<Sku, DomainError> {
        let brand_code = brand_code(brand);
        for _ in 0..MAX_GENERATION_ATTEMPTS {
            let datestamp = self.clock.now().format("%y%m%d");
            let suffix = self.random.next_below(10_000);
            let candidate = Sku::new(format!(
                "{}-{}-{}-{:04}",
                category.code(),
                brand_code,
                datestamp,
                suffix
            ))?;
            if !self.products.sku_exists(&candidate).await? {
                return Ok(candidate);
            }
        }
        Err(DomainError::GenerationExhausted {
            kind: "SKU",
            attempts: MAX_GENERATION_ATTEMPTS,
        })
    }

    /// Stock level at which a product should be reordered: expected
    /// demand over the supplier lead time plus safety stock.
    ///
    /// Demand is a coarse per-category estimate scaled by the product's
    /// rating; a real implementation would be seeded from sales history.
    pub fn calculate_optimal_reorder_point(&self, product: &Product) -> u32 {
        let daily = estimated_daily_sales(product.category()) * rating_multiplier(product);
        let demand = daily * (LEAD_TIME_DAYS + SAFETY_STOCK_DAYS);
        demand.ceil() as u32
    }

    /// Suggested replenishment quantity, EOQ-style:
    /// `sqrt(2 * annual demand * ordering cost / holding cost)`.
    ///
    /// Holding cost is a fixed fraction of unit price. The result is
    /// capped so replenishing never plans stock above
    /// `max_stock_level`. Same sales-history caveat as the reorder point.
    pub fn calculate_optimal_reorder_quantity(&self, product: &Product) -> u32 {
        let daily = estimated_daily_sales(product.category()) * rating_multiplier(product);
        let annual_demand = daily * 365.0;

        let unit_price = product.price().amount().to_f64().unwrap_or(0.0);
        let holding_cost = (unit_price * HOLDING_COST_RATE).max(0.01);

        let eoq = (2.0 * annual_demand * ORDERING_COST / holding_cost).sqrt();
        let mut quantity = eoq.ceil() as u32;

        if product.max_stock_level() > 0 {
            let headroom = product
                .max_stock_level()
                .saturating_sub(product.stock_quantity());
            quantity = quantity.min(headroom);
        }
        quantity
    }

    /// Validates a price/cost pair: price must be positive; a given cost
    /// must share the price currency and stay below the price. Margins
    /// under 10% draw an advisory warning.
    pub fn validate_pricing(&self, price: &Money, cost: Option<&Money>) -> ValidationReport {
        let mut report = ValidationReport::new();

        if price.is_zero() {
            report.error("price must be greater than zero");
            return report;
        }

        let Some(cost) = cost else {
            return report;
        };

        if cost.currency() != price.currency() {
            report.error(format!(
                "cost currency {} does not match price currency {}",
                cost.currency(),
                price.currency()
            ));
            return report;
        }

        if cost.amount() >= price.amount() {
            report.error(format!("price {price} must exceed cost {cost}"));
            return report;
        }

        let margin = (price.amount() - cost.amount()) / price.amount() * Decimal::ONE_HUNDRED;
        if margin < LOW_MARGIN_THRESHOLD {
            report.warn(format!("low margin: {}%", margin.round_dp(2)));
        }

        report
    }

    /// Composite product validation: SKU uniqueness, pricing, stock
    /// levels, and physical attributes. Stock-quantity and rating bounds
    /// hold by construction; overstock draws a warning.
    #[tracing::instrument(skip(self, product), fields(product_id = %product.id()))]
    pub async fn validate_product(
        &self,
        product: &Product,
    ) -> Result<ValidationReport, DomainError> {
        let mut report = ValidationReport::new();

        if let Some(existing) = self.products.get_by_sku(product.sku()).await? {
            if existing.id() != product.id() {
                report.error(format!("SKU {} is already in use", product.sku()));
            }
        }

        report.merge(self.validate_pricing(&product.price(), product.cost().as_ref()));

        if product.is_overstocked() {
            report.warn(format!(
                "stock {} exceeds max level {}",
                product.stock_quantity(),
                product.max_stock_level()
            ));
        }

        let attrs = product.attributes();
        if let Some(weight) = attrs.weight_grams {
            if !weight.is_finite() || weight <= 0.0 {
                report.error(format!("weight must be positive, got {weight}"));
            }
        }
        if let Some(dims) = attrs.dimensions_cm {
            let sides = [dims.length_cm, dims.width_cm, dims.height_cm];
            if sides.iter().any(|s| !s.is_finite() || *s <= 0.0) {
                report.error("dimensions must be positive");
            }
        }

        Ok(report)
    }

    /// Lists active products at or below their restock threshold.
    #[tracing::instrument(skip(self))]
    pub async fn find_products_needing_restock(&self) -> Result<Vec<Product>, DomainError> {
        let mut products = self.products.get_active_products().await?;
        products.retain(|p| p.needs_restocking());
        Ok(products)
    }
}

/// Rough demand estimate per category, in units per day.
fn estimated_daily_sales(category: Category) -> f64 {
    match category {
        Category::Electronics => 12.0,
        Category::Clothing => 8.0,
        Category::Toys => 7.0,
        Category::Sports => 6.0,
        Category::Books => 5.0,
        Category::HomeGarden => 4.0,
        Category::Other => 3.0,
    }
}

/// Scales demand by customer rating: unrated products sell at 80% of the
/// category baseline, a 5-star product at 120%.
fn rating_multiplier(product: &Product) -> f64 {
    0.8 + (f64::from(product.rating()) / 5.0) * 0.4
}

/// First three alphanumeric characters of the brand, uppercased and
/// padded with `X`.
fn brand_code(brand: &str) -> String {
    let mut code: String = brand
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(3)
        .collect::<String>()
        .to_uppercase();
    while code.len() < 3 {
        code.push('X');
    }
    code
}
