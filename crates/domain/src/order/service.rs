//! Cross-aggregate order business rules.

use std::sync::Arc;

use common::{CustomerId, ProductId};
use rust_decimal::Decimal;

use crate::address::Address;
use crate::error::DomainError;
use crate::idgen::{Clock, RandomSource, SystemClock, ThreadRngSource};
use crate::money::Money;
use crate::rates::{FlatShippingRates, RegionTaxTable, ShippingRateSource, TaxRateSource};
use crate::repository::{CustomerRepository, OrderRepository, ProductRepository};
use crate::validation::ValidationReport;

use super::{LineItem, Order, OrderNumber, OrderStatus};

/// Pending orders a single customer may hold before new ones are refused.
const DEFAULT_PENDING_ORDER_LIMIT: usize = 5;

/// Bounded retry budget for order-number generation.
const MAX_GENERATION_ATTEMPTS: u32 = 10;

/// Order totals at or above this amount draw an advisory warning.
const HIGH_VALUE_THRESHOLD: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Coordinates order rules that span aggregates: product availability,
/// inventory reservation and release, shipping/tax computation, unique
/// order-number generation, and the status transition table.
///
/// Business-rule failures (insufficient stock, inactive customer) are
/// returned as `Ok(false)` or as [`ValidationReport`] entries, since
/// callers branch on them routinely. Errors are reserved for invariant
/// violations and repository failures.
pub struct OrderDomainService<P, O, C> {
    products: Arc<P>,
    orders: Arc<O>,
    customers: Arc<C>,
    clock: Arc<dyn Clock>,
    random: Arc<dyn RandomSource>,
    tax_rates: Arc<dyn TaxRateSource>,
    shipping_rates: Arc<dyn ShippingRateSource>,
    pending_order_limit: usize,
}

impl<P, O, C> OrderDomainService<P, O, C>
where
    P: ProductRepository,
    O: OrderRepository,
    C: CustomerRepository,
{
    /// Creates a service with system clock/randomness and default rate
    /// tables.
    pub fn new(products: Arc<P>, orders: Arc<O>, customers: Arc<C>) -> Self {
        Self {
            products,
            orders,
            customers,
            clock: Arc::new(SystemClock),
            random: Arc::new(ThreadRngSource),
            tax_rates: Arc::new(RegionTaxTable::default()),
            shipping_rates: Arc::new(FlatShippingRates::default()),
            pending_order_limit: DEFAULT_PENDING_ORDER_LIMIT,
        }
    }

    /// Overrides the clock used for order-number datestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Overrides the random source used for order-number suffixes.
    pub fn with_random_source(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    /// Overrides the tax rate lookup.
    pub fn with_tax_rates(mut self, tax_rates: Arc<dyn TaxRateSource>) -> Self {
        self.tax_rates = tax_rates;
        self
    }

    /// Overrides the shipping rate lookup.
    pub fn with_shipping_rates(mut self, shipping_rates: Arc<dyn ShippingRateSource>) -> Self {
        self.shipping_rates = shipping_rates;
        self
    }

    /// Overrides the pending-order ceiling.
    pub fn with_pending_order_limit(mut self, limit: usize) -> Self {
        self.pending_order_limit = limit;
        self
    }

    /// Returns whether a customer may place a new order: the customer
    /// must exist, be active, and not already hold more than the
    /// pending-order ceiling.
    #[tracing::instrument(skip(self))]
    pub async fn can_create_order(&self, customer_id: CustomerId) -> Result<bool, DomainError> {
        let Some(customer) = self.customers.get_by_id(customer_id).await? else {
            return Ok(false);
        };
        if !customer.is_active {
            return Ok(false);
        }

        let pending = self.orders.get_pending_by_customer(customer_id).await?;
        Ok(pending.len() <= self.pending_order_limit)
    }

    /// All-or-nothing availability check: every referenced product must
    /// exist, be active, be in stock, and cover the requested quantity.
    #[tracing::instrument(skip(self, items))]
    pub async fn validate_product_availability(
        &self,
        items: &[LineItem],
    ) -> Result<bool, DomainError> {
        for item in items {
            let Some(product) = self.products.get_by_id(item.product_id()).await? else {
                tracing::debug!(product_id = %item.product_id(), "availability: product missing");
                return Ok(false);
            };
            if !product.is_active()
                || !product.is_in_stock()
                || product.stock_quantity() < item.quantity()
            {
                tracing::debug!(
                    product_id = %item.product_id(),
                    stock = product.stock_quantity(),
                    requested = item.quantity(),
                    "availability: product cannot cover request"
                );
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Reserves stock for every line item.
    ///
    /// Availability is validated up front; reservation then proceeds
    /// item by item. If an individual reservation still fails (a
    /// concurrent order took the stock between the check and the
    /// decrement), the items already reserved are released again before
    /// `Ok(false)` is returned, so a `false` outcome leaves inventory
    /// exactly as it was. Callers may retry.
    #[tracing::instrument(skip(self, items))]
    pub async fn reserve_inventory(
        &self,
        items: &[LineItem],
        actor: &str,
    ) -> Result<bool, DomainError> {
        if !self.validate_product_availability(items).await? {
            metrics::counter!("inventory_reservation_failures_total").increment(1);
            return Ok(false);
        }

        let mut reserved: Vec<(ProductId, u32)> = Vec::new();
        for item in items {
            let took_stock = match self.products.get_by_id(item.product_id()).await? {
                Some(mut product) => {
                    let reserved_now = product.reserve_stock(item.quantity(), actor)?;
                    if reserved_now {
                        self.products.update(product).await?;
                    }
                    reserved_now
                }
                None => false,
            };

            if !took_stock {
                tracing::warn!(
                    product_id = %item.product_id(),
                    "reservation lost a race, rolling back already-reserved items"
                );
                self.release_items(&reserved, actor).await?;
                metrics::counter!("inventory_reservation_failures_total").increment(1);
                return Ok(false);
            }

            reserved.push((item.product_id(), item.quantity()));
        }

        metrics::counter!("inventory_reservations_total").increment(1);
        Ok(true)
    }

    /// Releases stock for every line item, best-effort: a missing product
    /// is skipped with a warning and never fails the batch.
    #[tracing::instrument(skip(self, items))]
    pub async fn release_inventory(
        &self,
        items: &[LineItem],
        actor: &str,
    ) -> Result<(), DomainError> {
        let pairs: Vec<(ProductId, u32)> =
            items.iter().map(|i| (i.product_id(), i.quantity())).collect();
        self.release_items(&pairs, actor).await
    }

    async fn release_items(
        &self,
        items: &[(ProductId, u32)],
        actor: &str,
    ) -> Result<(), DomainError> {
        for (product_id, quantity) in items {
            let Some(mut product) = self.products.get_by_id(*product_id).await? else {
                tracing::warn!(product_id = %product_id, "release: product missing, skipped");
                continue;
            };
            product.release_stock(*quantity, actor)?;
            self.products.update(product).await?;
        }
        Ok(())
    }

    /// Approximate shipping cost: flat base, an oversize surcharge above
    /// the weight threshold, and an international surcharge outside the
    /// domestic country. When the total weight is unknown (any item
    /// without a weight snapshot), the oversize surcharge is skipped.
    /// This is a placeholder heuristic, not a carrier rate integration.
    pub fn calculate_shipping_cost(
        &self,
        items: &[LineItem],
        address: &Address,
    ) -> Result<Money, DomainError> {
        let mut cost = self.shipping_rates.base_cost();

        let total_weight: Option<f64> = items.iter().map(|i| i.total_weight_grams()).sum();
        if let Some(weight) = total_weight {
            if weight > self.shipping_rates.oversize_threshold_grams() {
                cost = cost.add(&self.shipping_rates.oversize_surcharge())?;
            }
        }

        if self.shipping_rates.is_international(address) {
            cost = cost.add(&self.shipping_rates.international_surcharge())?;
        }

        Ok(cost)
    }

    /// Tax as a flat destination rate applied to the subtotal. The rate
    /// table is a coarse approximation; swap in a real provider through
    /// [`OrderDomainService::with_tax_rates`].
    pub fn calculate_tax_amount(
        &self,
        subtotal: &Money,
        address: &Address,
    ) -> Result<Money, DomainError> {
        let rate = self.tax_rates.rate_for(address);
        Ok(subtotal.multiply(rate)?)
    }

    /// Generates a unique order number (`ORD-YYYYMMDD-NNNNNN`), retrying
    /// against the uniqueness check up to 10 times.
    #[tracing::instrument(skip(self))]
    pub async fn generate_order_number(&self) -> Result<OrderNumber, DomainError> {
        for _ in 0..MAX_GENERATION_ATTEMPTS {
            let datestamp = self.clock.now().format("%Y%m%d");
            let suffix = self.random.next_below(1_000_000);
            let candidate = OrderNumber::new(format!("ORD-{datestamp}-{suffix:06}"));
            if !self.orders.order_number_exists(&candidate).await? {
                return Ok(candidate);
            }
        }
        Err(DomainError::GenerationExhausted {
            kind: "order number",
            attempts: MAX_GENERATION_ATTEMPTS,
        })
    }

    /// Returns the statuses legally reachable from `current`; terminal
    /// statuses yield an empty slice. [`Order::update_status`] consults
    /// the same table.
    pub fn valid_next_statuses(&self, current: OrderStatus) -> &'static [OrderStatus] {
        current.valid_next_statuses()
    }

    /// Aggregate validation: active customer, at least one line item,
    /// available products, and a shipping address whenever any item
    /// carries a weight. The total cannot go negative by construction.
    /// High-value orders draw a warning, which never blocks.
    #[tracing::instrument(skip(self, order), fields(order_id = %order.id()))]
    pub async fn validate_order(&self, order: &Order) -> Result<ValidationReport, DomainError> {
        let mut report = ValidationReport::new();

        match self.customers.get_by_id(order.customer_id()).await? {
            Some(customer) if customer.is_active => {}
            Some(_) => report.error("customer is inactive"),
            None => report.error("customer not found"),
        }

        if order.items().is_empty() {
            report.error("order has no line items");
        } else if !self.validate_product_availability(order.items()).await? {
            report.error("one or more products are unavailable");
        }

        let any_weight = order
            .items()
            .iter()
            .any(|i| i.weight_grams().is_some());
        if any_weight && order.shipping_address().is_none() {
            report.error("shipping address is required for items with weight");
        }

        if order.total().amount() >= HIGH_VALUE_THRESHOLD {
            report.warn(format!("high-value order: total {}", order.total()));
        }

        Ok(report)
    }
}
