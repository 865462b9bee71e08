//! Injected tax and shipping rate lookups.
//!
//! The computations in `OrderDomainService` are approximate placeholder
//! heuristics, not a rate-table integration. They are kept behind traits
//! keyed on structured address fields so a real rate provider can be
//! swapped in without touching the service.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::address::Address;
use crate::money::{Currency, Money};

/// Flat tax rate lookup by destination.
pub trait TaxRateSource: Send + Sync {
    /// Returns the tax rate (e.g. `0.08` for 8%) for a destination.
    fn rate_for(&self, address: &Address) -> Decimal;
}

/// Tax table keyed by `"COUNTRY"` or `"COUNTRY-REGION"`, with a baseline
/// default for unknown destinations.
#[derive(Debug, Clone)]
pub struct RegionTaxTable {
    rates: HashMap<String, Decimal>,
    default_rate: Decimal,
}

impl RegionTaxTable {
    /// Creates a table with the given default rate.
    pub fn new(default_rate: Decimal) -> Self {
        Self {
            rates: HashMap::new(),
            default_rate,
        }
    }

    /// Adds a rate for a country, e.g. `("DE", 0.19)`.
    pub fn with_country_rate(mut self, country: &str, rate: Decimal) -> Self {
        self.rates.insert(country.to_uppercase(), rate);
        self
    }

    /// Adds a rate for a country subdivision, e.g. `("US", "CA", 0.0725)`.
    pub fn with_region_rate(mut self, country: &str, region: &str, rate: Decimal) -> Self {
        self.rates.insert(
            format!("{}-{}", country.to_uppercase(), region.to_uppercase()),
            rate,
        );
        self
    }
}

impl Default for RegionTaxTable {
    /// Baseline 8% with a handful of illustrative region entries.
    fn default() -> Self {
        Self::new(Decimal::new(8, 2))
            .with_region_rate("US", "CA", Decimal::new(725, 4))
            .with_region_rate("US", "NY", Decimal::new(8875, 5))
            .with_region_rate("US", "OR", Decimal::ZERO)
            .with_country_rate("DE", Decimal::new(19, 2))
            .with_country_rate("GB", Decimal::new(20, 2))
    }
}

impl TaxRateSource for RegionTaxTable {
    fn rate_for(&self, address: &Address) -> Decimal {
        if let Some(region) = &address.region {
            let key = format!("{}-{}", address.country, region);
            if let Some(rate) = self.rates.get(&key) {
                return *rate;
            }
        }
        self.rates
            .get(&address.country)
            .copied()
            .unwrap_or(self.default_rate)
    }
}

/// Shipping cost components for the placeholder heuristic.
pub trait ShippingRateSource: Send + Sync {
    /// Flat base cost charged on every shipment.
    fn base_cost(&self) -> Money;

    /// Surcharge applied when the order's total weight exceeds
    /// [`ShippingRateSource::oversize_threshold_grams`].
    fn oversize_surcharge(&self) -> Money;

    /// Weight above which the oversize surcharge applies.
    fn oversize_threshold_grams(&self) -> f64;

    /// Surcharge for destinations outside the domestic country.
    fn international_surcharge(&self) -> Money;

    /// Returns true when the destination is outside the domestic country.
    fn is_international(&self, address: &Address) -> bool;
}

/// Flat-rate shipping table with a single domestic country.
#[derive(Debug, Clone)]
pub struct FlatShippingRates {
    base_cost: Money,
    oversize_surcharge: Money,
    oversize_threshold_grams: f64,
    international_surcharge: Money,
    domestic_country: String,
}

impl FlatShippingRates {
    /// Creates a rate table in the given currency for a domestic country.
    pub fn new(currency: Currency, domestic_country: &str) -> Self {
        Self {
            base_cost: Money::new(Decimal::new(599, 2), currency)
                .expect("static rate is valid"),
            oversize_surcharge: Money::new(Decimal::new(1000, 2), currency)
                .expect("static rate is valid"),
            oversize_threshold_grams: 1000.0,
            international_surcharge: Money::new(Decimal::new(1500, 2), currency)
                .expect("static rate is valid"),
            domestic_country: domestic_country.to_uppercase(),
        }
    }

    /// Overrides the base cost.
    pub fn with_base_cost(mut self, base_cost: Money) -> Self {
        self.base_cost = base_cost;
        self
    }

    /// Overrides the oversize surcharge and threshold.
    pub fn with_oversize(mut self, surcharge: Money, threshold_grams: f64) -> Self {
        self.oversize_surcharge = surcharge;
        self.oversize_threshold_grams = threshold_grams;
        self
    }

    /// Overrides the international surcharge.
    pub fn with_international_surcharge(mut self, surcharge: Money) -> Self {
        self.international_surcharge = surcharge;
        self
    }
}

impl Default for FlatShippingRates {
    /// USD rates shipped from the US.
    fn default() -> Self {
        Self::new(Currency::new("USD").expect("static code is valid"), "US")
    }
}

impl ShippingRateSource for FlatShippingRates {
    fn base_cost(&self) -> Money {
        self.base_cost
    }

    fn oversize_surcharge(&self) -> Money {
        self.oversize_surcharge
    }

    fn oversize_threshold_grams(&self) -> f64 {
        self.oversize_threshold_grams
    }

    fn international_surcharge(&self) -> Money {
        self.international_surcharge
    }

    fn is_international(&self, address: &Address) -> bool {
        address.country != self.domestic_country
    }
}
