//! Order status state machine.

use serde::{Deserialize, Serialize};

/// The status of an order in its lifecycle.
///
/// Status transitions:
/// ```text
/// Pending ──► Processing ──► Confirmed ──► Preparing ──► Shipped ──► Delivered
///    │            │  ▲           │                          │            │
///    │            │  └ OnHold ◄──┤ (OnHold only from        │            │
///    │            │       │      │  Processing)             ▼            ▼
///    └────────────┴───────┴──────┴──► Cancelled          Returned ◄──────┘
///                                                           │
///                                                           ▼
///                                                        Refunded
/// ```
///
/// `Cancelled` and `Refunded` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Order is being assembled; line items can be added/removed.
    #[default]
    Pending,

    /// Payment is being processed.
    Processing,

    /// Payment confirmed, awaiting fulfillment.
    Confirmed,

    /// Warehouse is picking and packing.
    Preparing,

    /// Handed to the carrier.
    Shipped,

    /// Received by the customer.
    Delivered,

    /// Order was cancelled before shipment (terminal state).
    Cancelled,

    /// Processing paused, e.g. pending fraud review.
    OnHold,

    /// Customer sent the shipment back.
    Returned,

    /// Return settled, money refunded (terminal state).
    Refunded,
}

impl OrderStatus {
    /// Returns the statuses reachable from this one. Terminal statuses
    /// return an empty slice.
    pub fn valid_next_statuses(&self) -> &'static [OrderStatus] {
        use OrderStatus::*;
        match self {
            Pending => &[Processing, Cancelled],
            Processing => &[Confirmed, OnHold, Cancelled],
            Confirmed => &[Preparing, Cancelled],
            Preparing => &[Shipped],
            Shipped => &[Delivered, Returned],
            Delivered => &[Returned],
            OnHold => &[Processing, Cancelled],
            Returned => &[Refunded],
            Cancelled | Refunded => &[],
        }
    }

    /// Returns true if `next` is a legal transition from this status.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        self.valid_next_statuses().contains(&next)
    }

    /// Returns true if line items can be modified in this status.
    pub fn can_modify_items(&self) -> bool {
        matches!(self, OrderStatus::Pending)
    }

    /// Returns true if this is a terminal status (no further transitions).
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Cancelled | OrderStatus::Refunded)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::OnHold => "OnHold",
            OrderStatus::Returned => "Returned",
            OrderStatus::Refunded => "Refunded",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
