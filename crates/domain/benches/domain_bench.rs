use std::sync::Arc;

use common::{CustomerId, OrderId, ProductId};
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{
    Category, ContactInfo, Currency, LineItem, Money, Order, OrderDomainService, OrderNumber,
    Product, Sku,
};
use domain::{InMemoryCustomerRepository, InMemoryOrderRepository, InMemoryProductRepository};
use rust_decimal::Decimal;

fn usd() -> Currency {
    Currency::new("USD").unwrap()
}

fn line_item(product_id: ProductId, quantity: u32) -> LineItem {
    LineItem::new(
        product_id,
        "Benchmark Widget",
        Sku::new("ELC-BEN-0001").unwrap(),
        quantity,
        Money::new(Decimal::new(1999, 2), usd()).unwrap(),
    )
    .unwrap()
}

fn empty_order() -> Order {
    Order::create(
        OrderId::new(),
        OrderNumber::from("ORD-20260807-000001"),
        CustomerId::new(),
        ContactInfo::new("Bench", "bench@example.com"),
        usd(),
        "bench",
    )
}

fn bench_money_arithmetic(c: &mut Criterion) {
    let a = Money::new(Decimal::new(1999, 2), usd()).unwrap();
    let b = Money::new(Decimal::new(437, 2), usd()).unwrap();

    c.bench_function("domain/money_add_subtract", |bench| {
        bench.iter(|| {
            let sum = a.add(&b).unwrap();
            sum.subtract(&b).unwrap()
        });
    });
}

fn bench_add_line_item(c: &mut Criterion) {
    c.bench_function("domain/order_add_line_item", |bench| {
        bench.iter(|| {
            let mut order = empty_order();
            for _ in 0..10 {
                order
                    .add_line_item(line_item(ProductId::new(), 2), "bench")
                    .unwrap();
            }
            order
        });
    });
}

fn bench_reserve_release_cycle(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    let products = Arc::new(InMemoryProductRepository::new());
    let orders = Arc::new(InMemoryOrderRepository::new());
    let customers = Arc::new(InMemoryCustomerRepository::new());

    let mut product = Product::create(
        ProductId::new(),
        Sku::new("ELC-BEN-0001").unwrap(),
        "Benchmark Widget",
        Category::Electronics,
        Money::new(Decimal::new(1999, 2), usd()).unwrap(),
        "bench",
    )
    .unwrap();
    product.adjust_stock(1_000_000, "bench").unwrap();
    let product_id = product.id();
    rt.block_on(products.insert(product));

    let service = OrderDomainService::new(products, orders, customers);
    let items = vec![line_item(product_id, 1)];

    c.bench_function("domain/reserve_release_cycle", |bench| {
        bench.iter(|| {
            rt.block_on(async {
                assert!(service.reserve_inventory(&items, "bench").await.unwrap());
                service.release_inventory(&items, "bench").await.unwrap();
            });
        });
    });
}

criterion_group!(
    benches,
    bench_money_arithmetic,
    bench_add_line_item,
    bench_reserve_release_cycle
);
criterion_main!(benches);
