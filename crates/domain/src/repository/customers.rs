//! Customer repository trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::CustomerId;
use tokio::sync::RwLock;

use crate::customer::Customer;
use crate::error::DomainError;

/// Lookup interface for customers; consumed only by order-creation
/// checks.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Fetches a customer by ID.
    async fn get_by_id(&self, id: CustomerId) -> Result<Option<Customer>, DomainError>;
}

/// In-memory customer repository for tests and composition.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCustomerRepository {
    customers: Arc<RwLock<HashMap<CustomerId, Customer>>>,
}

impl InMemoryCustomerRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a customer, replacing any previous entry with the same ID.
    pub async fn insert(&self, customer: Customer) {
        self.customers.write().await.insert(customer.id, customer);
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn get_by_id(&self, id: CustomerId) -> Result<Option<Customer>, DomainError> {
        Ok(self.customers.read().await.get(&id).cloned())
    }
}
