//! # Orders and the Status Lifecycle
//!
//! An [`Order`] is a customer's purchase against one restaurant. Its status only moves
//! along the edges of [`OrderStatus::allowed_next`]:
//!
//! ```text
//! pending ──> preparing ──> ready ──> on the way ──> picked up ──> delivered
//!    │
//!    └──> cancelled
//! ```
//!
//! There is exactly one stored copy per order id. Customer, restaurant and driver
//! views are all derived from it, so they cannot disagree about the status.
use crate::model::{AccountId, CartLine, OrderId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "preparing")]
    Preparing,
    #[serde(rename = "ready")]
    Ready,
    #[serde(rename = "on the way")]
    OnTheWay,
    #[serde(rename = "picked up")]
    PickedUp,
    #[serde(rename = "delivered")]
    Delivered,
    #[serde(rename = "cancelled")]
    Cancelled,
}

impl OrderStatus {
    /// The transition table, keyed by the current status.
    pub fn allowed_next(self) -> &'static [OrderStatus] {
        use OrderStatus::*;
        match self {
            Pending => &[Preparing, Cancelled],
            Preparing => &[Ready],
            Ready => &[OnTheWay],
            OnTheWay => &[PickedUp],
            PickedUp => &[Delivered],
            Delivered | Cancelled => &[],
        }
    }

    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        self.allowed_next().contains(&next)
    }

    pub fn is_terminal(self) -> bool {
        self.allowed_next().is_empty()
    }

    /// Waiting on the restaurant: shown in its fulfillment queue.
    pub fn is_in_kitchen(self) -> bool {
        matches!(self, Self::Pending | Self::Preparing)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::OnTheWay => "on the way",
            Self::PickedUp => "picked up",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Position along the happy path; `Cancelled` sits before everything.
    fn progress(self) -> u8 {
        match self {
            Self::Cancelled => 0,
            Self::Pending => 1,
            Self::Preparing => 2,
            Self::Ready => 3,
            Self::OnTheWay => 4,
            Self::PickedUp => 5,
            Self::Delivered => 6,
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Cash,
    Wallet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer_id: AccountId,
    pub customer_name: String,
    pub restaurant_id: AccountId,
    pub restaurant_name: String,
    /// Frozen at checkout.
    pub items: Vec<CartLine>,
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub total: Decimal,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }
}

/// Payload for placing an order. The items come from the customer's cart, which the
/// order actor drains while creating the order.
#[derive(Debug, Clone)]
pub struct OrderCheckout {
    pub customer_id: AccountId,
    pub payment_method: PaymentMethod,
}

/// The four steps of the customer tracking screen.
pub const TRACKING_STEPS: [OrderStatus; 4] = [
    OrderStatus::Pending,
    OrderStatus::Preparing,
    OrderStatus::Ready,
    OrderStatus::Delivered,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrackingStep {
    pub status: OrderStatus,
    pub reached: bool,
}

/// Customer-facing progress of one order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tracking {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub steps: Vec<TrackingStep>,
}

impl Tracking {
    pub fn of(order: &Order) -> Self {
        let steps = TRACKING_STEPS
            .iter()
            .map(|&step| TrackingStep {
                status: step,
                reached: match order.status {
                    // A cancelled order was still placed.
                    OrderStatus::Cancelled => step == OrderStatus::Pending,
                    current => step.progress() <= current.progress(),
                },
            })
            .collect();
        Self {
            order_id: order.id,
            status: order.status,
            steps,
        }
    }

    pub fn reached_count(&self) -> usize {
        self.steps.iter().filter(|step| step.reached).count()
    }
}
