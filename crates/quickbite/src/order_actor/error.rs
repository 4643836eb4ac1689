//! Error types for the Order actor.

use crate::account_actor::AccountError;
use crate::delivery_actor::DeliveryError;
use crate::model::{OrderId, OrderStatus};
use actor_framework::FrameworkError;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The requested order was not found.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// The edge is not in the transition table.
    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// A guarded transition found the order in another status.
    #[error("Order status changed: expected {expected}, found {actual}")]
    StaleStatus {
        expected: OrderStatus,
        actual: OrderStatus,
    },

    /// Checkout with nothing in the cart.
    #[error("Cannot place an order with an empty cart")]
    EmptyCart,

    /// The order belongs to another restaurant.
    #[error("Order {0} belongs to another restaurant")]
    NotOwner(OrderId),

    #[error(transparent)]
    Account(#[from] AccountError),

    /// Spawning the delivery for a ready order failed.
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl OrderError {
    pub fn from_framework(e: FrameworkError) -> Self {
        match e.into_entity_error::<OrderError>() {
            Ok(typed) => typed,
            Err(FrameworkError::NotFound(id)) => OrderError::NotFound(id),
            Err(other) => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}
