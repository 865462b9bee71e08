//! Integration tests for the product domain service.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, TimeZone, Utc};
use common::ProductId;
use domain::{
    Category, Clock, Currency, DomainError, InMemoryProductRepository, Money, Product,
    ProductDomainService, RandomSource, Sku,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Clock pinned to a fixed instant.
struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(
        Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap(),
    ))
}

/// Random source cycling through a fixed sequence.
struct CyclingRandom {
    values: Vec<u32>,
    index: AtomicUsize,
}

impl CyclingRandom {
    fn new(values: Vec<u32>) -> Arc<Self> {
        Arc::new(Self {
            values,
            index: AtomicUsize::new(0),
        })
    }
}

impl RandomSource for CyclingRandom {
    fn next_below(&self, bound: u32) -> u32 {
        let i = self.index.fetch_add(1, Ordering::Relaxed);
        self.values[i % self.values.len()] % bound
    }
}

fn usd(amount: Decimal) -> Money {
    Money::new(amount, Currency::new("USD").unwrap()).unwrap()
}

fn product_with_sku(sku: &str, price: Decimal) -> Product {
    Product::create(
        ProductId::new(),
        Sku::new(sku).unwrap(),
        "Widget",
        Category::Electronics,
        usd(price),
        "seed",
    )
    .unwrap()
}

fn service(
    repo: &Arc<InMemoryProductRepository>,
) -> ProductDomainService<InMemoryProductRepository> {
    ProductDomainService::new(repo.clone())
        .with_clock(fixed_clock())
        .with_random_source(CyclingRandom::new(vec![4821]))
}

mod sku_generation {
    use super::*;

    #[tokio::test]
    async fn sku_embeds_category_brand_and_datestamp() {
        let repo = Arc::new(InMemoryProductRepository::new());
        let service = service(&repo);

        let sku = service
            .generate_unique_sku(Category::Electronics, "Acme")
            .await
            .unwrap();

        assert_eq!(sku.as_str(), "ELC-ACM-260807-4821");
        assert!(sku.as_str().starts_with("ELC-"));
    }

    #[tokio::test]
    async fn short_brand_is_padded() {
        let repo = Arc::new(InMemoryProductRepository::new());
        let service = service(&repo);

        let sku = service
            .generate_unique_sku(Category::Toys, "Bo")
            .await
            .unwrap();
        assert_eq!(sku.as_str(), "TOY-BOX-260807-4821");
    }

    #[tokio::test]
    async fn taken_sku_is_retried_with_next_suffix() {
        let repo = Arc::new(InMemoryProductRepository::new());
        repo.insert(product_with_sku("ELC-ACM-260807-4821", dec!(10.00)))
            .await;

        let service = ProductDomainService::new(repo.clone())
            .with_clock(fixed_clock())
            .with_random_source(CyclingRandom::new(vec![4821, 7777]));

        let sku = service
            .generate_unique_sku(Category::Electronics, "Acme")
            .await
            .unwrap();
        assert_eq!(sku.as_str(), "ELC-ACM-260807-7777");
    }

    #[tokio::test]
    async fn exhaustion_after_ten_colliding_attempts() {
        let repo = Arc::new(InMemoryProductRepository::new());
        repo.insert(product_with_sku("ELC-ACM-260807-4821", dec!(10.00)))
            .await;

        // Every candidate collides with the seeded SKU.
        let service = service(&repo);
        let result = service
            .generate_unique_sku(Category::Electronics, "Acme")
            .await;

        assert!(matches!(
            result,
            Err(DomainError::GenerationExhausted { attempts: 10, .. })
        ));
    }
}

mod reorder_heuristics {
    use super::*;

    #[tokio::test]
    async fn reorder_point_scales_with_category_demand() {
        let repo = Arc::new(InMemoryProductRepository::new());
        let service = service(&repo);

        let electronics = product_with_sku("ELC-ACM-0001", dec!(25.00));
        let books = Product::create(
            ProductId::new(),
            Sku::new("BKS-ACM-0001").unwrap(),
            "Paperback",
            Category::Books,
            usd(dec!(12.00)),
            "seed",
        )
        .unwrap();

        // Unrated products sell at 80% of the category baseline over a
        // 10-day horizon: 12/day * 0.8 * 10 and 5/day * 0.8 * 10.
        assert_eq!(service.calculate_optimal_reorder_point(&electronics), 96);
        assert_eq!(service.calculate_optimal_reorder_point(&books), 40);
    }

    #[tokio::test]
    async fn highly_rated_products_reorder_earlier() {
        let repo = Arc::new(InMemoryProductRepository::new());
        let service = service(&repo);

        let unrated = product_with_sku("ELC-ACM-0001", dec!(25.00));
        let mut rated = product_with_sku("ELC-ACM-0002", dec!(25.00));
        for _ in 0..3 {
            rated.record_review(5.0).unwrap();
        }

        assert!(
            service.calculate_optimal_reorder_point(&rated)
                > service.calculate_optimal_reorder_point(&unrated)
        );
    }

    #[tokio::test]
    async fn reorder_quantity_capped_by_max_stock_headroom() {
        let repo = Arc::new(InMemoryProductRepository::new());
        let service = service(&repo);

        let mut product = product_with_sku("ELC-ACM-0001", dec!(25.00));
        let uncapped = service.calculate_optimal_reorder_quantity(&product);
        assert!(uncapped > 0);

        product.set_stock_levels(5, 50, "seed").unwrap();
        product.adjust_stock(30, "seed").unwrap();
        let capped = service.calculate_optimal_reorder_quantity(&product);
        assert!(capped <= 20);
    }
}

mod pricing_validation {
    use super::*;

    #[tokio::test]
    async fn zero_price_is_rejected() {
        let repo = Arc::new(InMemoryProductRepository::new());
        let service = service(&repo);

        let report = service.validate_pricing(&usd(dec!(0.00)), None);
        assert!(!report.is_valid());
    }

    #[tokio::test]
    async fn cost_must_share_currency_and_stay_below_price() {
        let repo = Arc::new(InMemoryProductRepository::new());
        let service = service(&repo);

        let eur = Money::new(dec!(5.00), Currency::new("EUR").unwrap()).unwrap();
        let report = service.validate_pricing(&usd(dec!(10.00)), Some(&eur));
        assert!(!report.is_valid());

        let report = service.validate_pricing(&usd(dec!(10.00)), Some(&usd(dec!(10.00))));
        assert!(!report.is_valid());
    }

    #[tokio::test]
    async fn thin_margin_warns_without_blocking() {
        let repo = Arc::new(InMemoryProductRepository::new());
        let service = service(&repo);

        // 5% margin: valid, but flagged.
        let report = service.validate_pricing(&usd(dec!(10.00)), Some(&usd(dec!(9.50))));
        assert!(report.is_valid());
        assert!(report.warnings().iter().any(|w| w.contains("low margin")));

        // 40% margin: no warnings.
        let report = service.validate_pricing(&usd(dec!(10.00)), Some(&usd(dec!(6.00))));
        assert!(report.is_valid());
        assert!(report.warnings().is_empty());
    }
}

mod product_validation {
    use super::*;

    #[tokio::test]
    async fn duplicate_sku_on_another_product_is_rejected() {
        let repo = Arc::new(InMemoryProductRepository::new());
        let existing = product_with_sku("ELC-ACM-0001", dec!(10.00));
        repo.insert(existing.clone()).await;
        let service = service(&repo);

        // The stored product itself passes the uniqueness check.
        let report = service.validate_product(&existing).await.unwrap();
        assert!(report.is_valid());

        let duplicate = product_with_sku("ELC-ACM-0001", dec!(12.00));
        let report = service.validate_product(&duplicate).await.unwrap();
        assert!(report.errors().iter().any(|e| e.contains("already in use")));
    }

    #[tokio::test]
    async fn overstock_warns_without_blocking() {
        let repo = Arc::new(InMemoryProductRepository::new());
        let service = service(&repo);

        let mut product = product_with_sku("ELC-ACM-0001", dec!(10.00));
        product.set_stock_levels(2, 10, "seed").unwrap();
        product.adjust_stock(25, "seed").unwrap();

        let report = service.validate_product(&product).await.unwrap();
        assert!(report.is_valid());
        assert!(report.warnings().iter().any(|w| w.contains("exceeds max")));
    }

    #[tokio::test]
    async fn non_positive_physical_attributes_are_rejected() {
        let repo = Arc::new(InMemoryProductRepository::new());
        let service = service(&repo);

        let mut product = product_with_sku("ELC-ACM-0001", dec!(10.00));
        let mut attrs = product.attributes().clone();
        attrs.weight_grams = Some(0.0);
        product.update_physical_attributes(attrs, "seed");

        let report = service.validate_product(&product).await.unwrap();
        assert!(report.errors().iter().any(|e| e.contains("weight")));
    }
}

mod restock_queries {
    use super::*;

    #[tokio::test]
    async fn lists_active_products_at_or_below_threshold() {
        let repo = Arc::new(InMemoryProductRepository::new());
        let service = service(&repo);

        let mut low = product_with_sku("ELC-ACM-0001", dec!(10.00));
        low.set_stock_levels(5, 50, "seed").unwrap();
        low.adjust_stock(4, "seed").unwrap();

        let mut healthy = product_with_sku("ELC-ACM-0002", dec!(10.00));
        healthy.set_stock_levels(5, 50, "seed").unwrap();
        healthy.adjust_stock(30, "seed").unwrap();

        let mut inactive_low = product_with_sku("ELC-ACM-0003", dec!(10.00));
        inactive_low.set_stock_levels(5, 50, "seed").unwrap();
        inactive_low.deactivate("seed");

        let low_id = low.id();
        repo.insert(low).await;
        repo.insert(healthy).await;
        repo.insert(inactive_low).await;

        let needing = service.find_products_needing_restock().await.unwrap();
        assert_eq!(needing.len(), 1);
        assert_eq!(needing[0].id(), low_id);
    }
}
