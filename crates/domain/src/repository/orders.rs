//! Order repository trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{CustomerId, OrderId};
use tokio::sync::RwLock;

use crate::error::DomainError;
use crate::order::{Order, OrderNumber, OrderStatus};

/// Persistence interface for orders.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Fetches an order by ID.
    async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, DomainError>;

    /// Fetches an order by its human-readable number.
    async fn get_by_order_number(
        &self,
        order_number: &OrderNumber,
    ) -> Result<Option<Order>, DomainError>;

    /// Lists all orders of a customer.
    async fn get_by_customer(&self, customer_id: CustomerId) -> Result<Vec<Order>, DomainError>;

    /// Lists a customer's orders that are still pending.
    async fn get_pending_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Order>, DomainError>;

    /// Lists all orders in a given status.
    async fn get_by_status(&self, status: OrderStatus) -> Result<Vec<Order>, DomainError>;

    /// Stores a new order; fails when the ID is already taken.
    async fn add(&self, order: Order) -> Result<(), DomainError>;

    /// Persists a mutated order; fails when the order is unknown.
    async fn update(&self, order: Order) -> Result<(), DomainError>;

    /// Deletes an order, returning whether it existed.
    async fn delete(&self, id: OrderId) -> Result<bool, DomainError>;

    /// Returns true when an order with this number exists.
    async fn order_number_exists(&self, order_number: &OrderNumber)
        -> Result<bool, DomainError>;
}

/// In-memory order repository for tests and composition.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderRepository {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl InMemoryOrderRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored orders.
    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }

    /// Returns true when no orders are stored.
    pub async fn is_empty(&self) -> bool {
        self.orders.read().await.is_empty()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, DomainError> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn get_by_order_number(
        &self,
        order_number: &OrderNumber,
    ) -> Result<Option<Order>, DomainError> {
        Ok(self
            .orders
            .read()
            .await
            .values()
            .find(|o| o.order_number() == order_number)
            .cloned())
    }

    async fn get_by_customer(&self, customer_id: CustomerId) -> Result<Vec<Order>, DomainError> {
        Ok(self
            .orders
            .read()
            .await
            .values()
            .filter(|o| o.customer_id() == customer_id)
            .cloned()
            .collect())
    }

    async fn get_pending_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Order>, DomainError> {
        Ok(self
            .orders
            .read()
            .await
            .values()
            .filter(|o| o.customer_id() == customer_id && o.status() == OrderStatus::Pending)
            .cloned()
            .collect())
    }

    async fn get_by_status(&self, status: OrderStatus) -> Result<Vec<Order>, DomainError> {
        Ok(self
            .orders
            .read()
            .await
            .values()
            .filter(|o| o.status() == status)
            .cloned()
            .collect())
    }

    async fn add(&self, order: Order) -> Result<(), DomainError> {
        let mut orders = self.orders.write().await;
        if orders.contains_key(&order.id()) {
            return Err(DomainError::Repository(format!(
                "order {} already exists",
                order.id()
            )));
        }
        tracing::info!(order_id = %order.id(), order_number = %order.order_number(), "order added");
        orders.insert(order.id(), order);
        Ok(())
    }

    async fn update(&self, order: Order) -> Result<(), DomainError> {
        let mut orders = self.orders.write().await;
        if !orders.contains_key(&order.id()) {
            return Err(DomainError::NotFound {
                entity: "Order",
                id: order.id().to_string(),
            });
        }
        orders.insert(order.id(), order);
        Ok(())
    }

    async fn delete(&self, id: OrderId) -> Result<bool, DomainError> {
        Ok(self.orders.write().await.remove(&id).is_some())
    }

    async fn order_number_exists(
        &self,
        order_number: &OrderNumber,
    ) -> Result<bool, DomainError> {
        Ok(self
            .orders
            .read()
            .await
            .values()
            .any(|o| o.order_number() == order_number))
    }
}
