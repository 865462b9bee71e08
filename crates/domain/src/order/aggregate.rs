//! Order aggregate implementation.

use chrono::{DateTime, Utc};
use common::{CustomerId, OrderId, ProductId};
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::money::{Currency, Money, MoneyError};

use super::{LineItem, OrderError, OrderNumber, OrderStatus};

/// Customer contact details captured on the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl ContactInfo {
    /// Creates contact info without a phone number.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: None,
        }
    }
}

/// Order aggregate root.
///
/// Owns its line items: the collection is only reachable as `&[LineItem]`
/// and every mutation goes through a method that re-derives the monetary
/// totals and stamps the audit trail. Invariants held after every
/// mutation:
///
/// - `subtotal` = sum of line-item totals
/// - `total` = `subtotal + tax + shipping - discount`, floored at zero
/// - every monetary field shares the order currency
/// - line items and charges only change while the order is `Pending`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    order_number: OrderNumber,
    customer_id: CustomerId,
    contact: ContactInfo,
    status: OrderStatus,
    currency: Currency,
    items: Vec<LineItem>,
    subtotal: Money,
    tax_amount: Money,
    shipping_cost: Money,
    discount_amount: Money,
    total: Money,
    shipping_address: Option<Address>,
    billing_address: Option<Address>,
    payment_method: Option<String>,
    payment_transaction_id: Option<String>,
    carrier: Option<String>,
    tracking_number: Option<String>,
    shipped_at: Option<DateTime<Utc>>,
    delivered_at: Option<DateTime<Utc>>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    created_by: String,
    updated_at: DateTime<Utc>,
    updated_by: String,
}

impl Order {
    /// Creates a pending order with zero totals.
    pub fn create(
        id: OrderId,
        order_number: OrderNumber,
        customer_id: CustomerId,
        contact: ContactInfo,
        currency: Currency,
        actor: &str,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            order_number,
            customer_id,
            contact,
            status: OrderStatus::Pending,
            currency,
            items: Vec::new(),
            subtotal: Money::zero(currency),
            tax_amount: Money::zero(currency),
            shipping_cost: Money::zero(currency),
            discount_amount: Money::zero(currency),
            total: Money::zero(currency),
            shipping_address: None,
            billing_address: None,
            payment_method: None,
            payment_transaction_id: None,
            carrier: None,
            tracking_number: None,
            shipped_at: None,
            delivered_at: None,
            notes: None,
            created_at: now,
            created_by: actor.to_string(),
            updated_at: now,
            updated_by: actor.to_string(),
        }
    }
}

// Query methods
impl Order {
    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn order_number(&self) -> &OrderNumber {
        &self.order_number
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Immutable view of the line items, in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Returns the line item for a product, if present.
    pub fn item(&self, product_id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| i.product_id() == product_id)
    }

    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    pub fn tax_amount(&self) -> Money {
        self.tax_amount
    }

    pub fn shipping_cost(&self) -> Money {
        self.shipping_cost
    }

    pub fn discount_amount(&self) -> Money {
        self.discount_amount
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn shipping_address(&self) -> Option<&Address> {
        self.shipping_address.as_ref()
    }

    pub fn billing_address(&self) -> Option<&Address> {
        self.billing_address.as_ref()
    }

    pub fn payment_method(&self) -> Option<&str> {
        self.payment_method.as_deref()
    }

    pub fn payment_transaction_id(&self) -> Option<&str> {
        self.payment_transaction_id.as_deref()
    }

    pub fn carrier(&self) -> Option<&str> {
        self.carrier.as_deref()
    }

    pub fn tracking_number(&self) -> Option<&str> {
        self.tracking_number.as_deref()
    }

    pub fn shipped_at(&self) -> Option<DateTime<Utc>> {
        self.shipped_at
    }

    pub fn delivered_at(&self) -> Option<DateTime<Utc>> {
        self.delivered_at
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn updated_by(&self) -> &str {
        &self.updated_by
    }

    /// Sum of line-item quantities.
    pub fn total_item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity()).sum()
    }

    /// Total shipment weight; `None` when any item's weight is unknown.
    pub fn total_weight_grams(&self) -> Option<f64> {
        self.items.iter().map(|i| i.total_weight_grams()).sum()
    }

    pub fn can_be_cancelled(&self) -> bool {
        matches!(
            self.status,
            OrderStatus::Pending | OrderStatus::Processing | OrderStatus::Confirmed
        )
    }

    pub fn can_be_modified(&self) -> bool {
        self.status.can_modify_items()
    }

    pub fn can_be_shipped(&self) -> bool {
        self.status == OrderStatus::Confirmed
    }

    pub fn can_be_delivered(&self) -> bool {
        self.status == OrderStatus::Shipped
    }

    pub fn is_completed(&self) -> bool {
        self.status == OrderStatus::Delivered
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.status, OrderStatus::Cancelled | OrderStatus::Refunded)
    }
}

// Mutation methods
impl Order {
    /// Adds a line item, merging quantities when the product is already
    /// present: the previous entry is replaced in place by the incoming
    /// snapshot carrying the combined quantity, so each product appears
    /// exactly once.
    pub fn add_line_item(&mut self, item: LineItem, actor: &str) -> Result<(), OrderError> {
        self.require_pending("add line item")?;
        self.require_order_currency(item.unit_price())?;

        match self
            .items
            .iter()
            .position(|existing| existing.product_id() == item.product_id())
        {
            Some(index) => {
                let merged_quantity = self.items[index].quantity() + item.quantity();
                self.items[index] = item.with_quantity(merged_quantity)?;
            }
            None => self.items.push(item),
        }

        self.recompute_totals()?;
        self.touch(actor);
        Ok(())
    }

    /// Removes the line item for a product. A no-op when the product is
    /// not on the order.
    pub fn remove_line_item(
        &mut self,
        product_id: ProductId,
        actor: &str,
    ) -> Result<(), OrderError> {
        self.require_pending("remove line item")?;

        let before = self.items.len();
        self.items.retain(|i| i.product_id() != product_id);
        if self.items.len() == before {
            return Ok(());
        }

        self.recompute_totals()?;
        self.touch(actor);
        Ok(())
    }

    /// Changes the quantity of an existing line item. A no-op when the
    /// product is not on the order.
    pub fn update_line_item_quantity(
        &mut self,
        product_id: ProductId,
        new_quantity: u32,
        actor: &str,
    ) -> Result<(), OrderError> {
        self.require_pending("update line item quantity")?;
        if new_quantity == 0 {
            return Err(OrderError::InvalidQuantity {
                quantity: new_quantity,
            });
        }

        let Some(index) = self
            .items
            .iter()
            .position(|i| i.product_id() == product_id)
        else {
            return Ok(());
        };

        self.items[index] = self.items[index].with_quantity(new_quantity)?;
        self.recompute_totals()?;
        self.touch(actor);
        Ok(())
    }

    /// Moves the order to a new status, consulting the transition table.
    ///
    /// Illegal transitions fail with
    /// [`OrderError::InvalidStatusTransition`]; the table is never
    /// bypassed here. The first transition into `Shipped`/`Delivered`
    /// stamps the corresponding timestamp.
    pub fn update_status(
        &mut self,
        new_status: OrderStatus,
        actor: &str,
    ) -> Result<(), OrderError> {
        if !self.status.can_transition_to(new_status) {
            return Err(OrderError::InvalidStatusTransition {
                from: self.status,
                to: new_status,
            });
        }

        self.status = new_status;
        let now = Utc::now();
        if new_status == OrderStatus::Shipped && self.shipped_at.is_none() {
            self.shipped_at = Some(now);
        }
        if new_status == OrderStatus::Delivered && self.delivered_at.is_none() {
            self.delivered_at = Some(now);
        }
        self.touch(actor);
        Ok(())
    }

    /// Applies an order-level discount and re-derives the total.
    pub fn apply_discount(&mut self, amount: Money, actor: &str) -> Result<(), OrderError> {
        self.require_pending("apply discount")?;
        self.require_order_currency(amount)?;
        self.discount_amount = amount;
        self.recompute_totals()?;
        self.touch(actor);
        Ok(())
    }

    /// Sets the shipping cost and re-derives the total.
    pub fn set_shipping_cost(&mut self, amount: Money, actor: &str) -> Result<(), OrderError> {
        self.require_pending("set shipping cost")?;
        self.require_order_currency(amount)?;
        self.shipping_cost = amount;
        self.recompute_totals()?;
        self.touch(actor);
        Ok(())
    }

    /// Sets the tax amount and re-derives the total.
    pub fn set_tax_amount(&mut self, amount: Money, actor: &str) -> Result<(), OrderError> {
        self.require_pending("set tax amount")?;
        self.require_order_currency(amount)?;
        self.tax_amount = amount;
        self.recompute_totals()?;
        self.touch(actor);
        Ok(())
    }

    /// Sets the shipping (and optionally billing) address. Only allowed
    /// while the order is pending.
    pub fn update_shipping_info(
        &mut self,
        shipping_address: Address,
        billing_address: Option<Address>,
        actor: &str,
    ) -> Result<(), OrderError> {
        self.require_pending("update shipping info")?;
        self.shipping_address = Some(shipping_address);
        if billing_address.is_some() {
            self.billing_address = billing_address;
        }
        self.touch(actor);
        Ok(())
    }

    /// Records payment metadata. Allowed in any status.
    pub fn update_payment_info(
        &mut self,
        method: impl Into<String>,
        transaction_id: Option<String>,
        actor: &str,
    ) {
        self.payment_method = Some(method.into());
        self.payment_transaction_id = transaction_id;
        self.touch(actor);
    }

    /// Records carrier/tracking metadata. Allowed in any status.
    pub fn update_tracking_info(
        &mut self,
        carrier: impl Into<String>,
        tracking_number: impl Into<String>,
        actor: &str,
    ) {
        self.carrier = Some(carrier.into());
        self.tracking_number = Some(tracking_number.into());
        self.touch(actor);
    }

    /// Replaces the customer-facing notes. Allowed in any status.
    pub fn update_notes(&mut self, notes: impl Into<String>, actor: &str) {
        self.notes = Some(notes.into());
        self.touch(actor);
    }

    fn require_pending(&self, action: &'static str) -> Result<(), OrderError> {
        if self.status != OrderStatus::Pending {
            return Err(OrderError::NotPending {
                status: self.status,
                action,
            });
        }
        Ok(())
    }

    fn require_order_currency(&self, amount: Money) -> Result<(), OrderError> {
        if amount.currency() != self.currency {
            return Err(OrderError::Money(MoneyError::CurrencyMismatch {
                left: self.currency,
                right: amount.currency(),
            }));
        }
        Ok(())
    }

    /// Re-derives `subtotal` and `total` from the current items and
    /// charges. All inputs share the order currency by construction, so
    /// the arithmetic cannot mismatch.
    fn recompute_totals(&mut self) -> Result<(), OrderError> {
        let mut subtotal = Money::zero(self.currency);
        for item in &self.items {
            subtotal = subtotal.add(&item.total_price())?;
        }
        self.subtotal = subtotal;
        self.total = subtotal
            .add(&self.tax_amount)?
            .add(&self.shipping_cost)?
            .saturating_subtract(&self.discount_amount)?;
        Ok(())
    }

    fn touch(&mut self, actor: &str) {
        self.updated_at = Utc::now();
        self.updated_by = actor.to_string();
    }
}
