//! Customer snapshot consumed by order-creation checks.

use common::CustomerId;
use serde::{Deserialize, Serialize};

/// The slice of a customer account the order domain needs: identity and
/// whether the account may place orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub is_active: bool,
}

impl Customer {
    /// Creates an active customer.
    pub fn new(id: CustomerId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            is_active: true,
        }
    }

    /// Marks the customer as deactivated.
    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }
}
