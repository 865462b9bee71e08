//! Product repository trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::ProductId;
use tokio::sync::RwLock;

use crate::error::DomainError;
use crate::product::{Product, Sku};

/// Persistence interface for products.
///
/// `update` persists a fully mutated entity. When reservations race
/// across processes, implementations must make the stock write
/// conditional (`... SET stock = stock - qty WHERE id = ? AND stock >=
/// qty`) so concurrent reservations cannot both succeed on the last
/// units.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Fetches a product by ID.
    async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, DomainError>;

    /// Fetches a product by SKU.
    async fn get_by_sku(&self, sku: &Sku) -> Result<Option<Product>, DomainError>;

    /// Lists all active products.
    async fn get_active_products(&self) -> Result<Vec<Product>, DomainError>;

    /// Persists a mutated product; fails when the product is unknown.
    async fn update(&self, product: Product) -> Result<(), DomainError>;

    /// Returns true when a product with this ID exists.
    async fn exists(&self, id: ProductId) -> Result<bool, DomainError>;

    /// Returns true when a product with this SKU exists.
    async fn sku_exists(&self, sku: &Sku) -> Result<bool, DomainError>;
}

/// In-memory product repository for tests and composition.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<ProductId, Product>>>,
}

impl InMemoryProductRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a product, replacing any previous entry with the same ID.
    pub async fn insert(&self, product: Product) {
        self.products.write().await.insert(product.id(), product);
    }

    /// Returns the number of stored products.
    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    /// Returns true when no products are stored.
    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, DomainError> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn get_by_sku(&self, sku: &Sku) -> Result<Option<Product>, DomainError> {
        Ok(self
            .products
            .read()
            .await
            .values()
            .find(|p| p.sku() == sku)
            .cloned())
    }

    async fn get_active_products(&self) -> Result<Vec<Product>, DomainError> {
        Ok(self
            .products
            .read()
            .await
            .values()
            .filter(|p| p.is_active())
            .cloned()
            .collect())
    }

    async fn update(&self, product: Product) -> Result<(), DomainError> {
        let mut products = self.products.write().await;
        if !products.contains_key(&product.id()) {
            return Err(DomainError::NotFound {
                entity: "Product",
                id: product.id().to_string(),
            });
        }
        tracing::debug!(product_id = %product.id(), stock = product.stock_quantity(), "product updated");
        products.insert(product.id(), product);
        Ok(())
    }

    async fn exists(&self, id: ProductId) -> Result<bool, DomainError> {
        Ok(self.products.read().await.contains_key(&id))
    }

    async fn sku_exists(&self, sku: &Sku) -> Result<bool, DomainError> {
        Ok(self
            .products
            .read()
            .await
            .values()
            .any(|p| p.sku() == sku))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::{Currency, Money};
    use crate::product::Category;
    use rust_decimal_macros::dec;

    fn product(sku: &str) -> Product {
        Product::create(
            ProductId::new(),
            Sku::new(sku).unwrap(),
            "Widget",
            Category::Electronics,
            Money::new(dec!(10.00), Currency::new("USD").unwrap()).unwrap(),
            "tester",
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let repo = InMemoryProductRepository::new();
        let p = product("ELC-ACM-0001");
        let id = p.id();
        repo.insert(p).await;

        assert!(repo.exists(id).await.unwrap());
        assert!(repo
            .sku_exists(&Sku::new("ELC-ACM-0001").unwrap())
            .await
            .unwrap());
        assert!(repo.get_by_id(id).await.unwrap().is_some());
        assert!(repo
            .get_by_sku(&Sku::new("ELC-ACM-0001").unwrap())
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_active_filter() {
        let repo = InMemoryProductRepository::new();
        let active = product("ELC-ACM-0001");
        let mut inactive = product("ELC-ACM-0002");
        inactive.deactivate("tester");

        repo.insert(active).await;
        repo.insert(inactive).await;

        assert_eq!(repo.get_active_products().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_unknown_product_fails() {
        let repo = InMemoryProductRepository::new();
        let result = repo.update(product("ELC-ACM-0001")).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_persists_mutation() {
        let repo = InMemoryProductRepository::new();
        let mut p = product("ELC-ACM-0001");
        let id = p.id();
        repo.insert(p.clone()).await;

        p.adjust_stock(7, "tester").unwrap();
        repo.update(p).await.unwrap();

        let stored = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.stock_quantity(), 7);
    }
}
