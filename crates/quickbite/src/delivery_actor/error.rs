//! Error types for the Delivery actor and the driver flows.

use crate::account_actor::AccountError;
use crate::model::DeliveryId;
use crate::order_actor::OrderError;
use actor_framework::FrameworkError;
use thiserror::Error;

/// Errors that can occur during delivery operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DeliveryError {
    /// The requested delivery was not found.
    #[error("Delivery not found: {0}")]
    NotFound(String),

    /// Another driver accepted the delivery first.
    #[error("Delivery {0} was already taken")]
    AlreadyTaken(DeliveryId),

    /// The driver already holds a delivery.
    #[error("Driver already has an active delivery: {0}")]
    DeliveryAlreadyActive(DeliveryId),

    /// The driver rejected this delivery earlier.
    #[error("Delivery {0} was rejected by this driver")]
    Rejected(DeliveryId),

    /// The delivery is not assigned to this driver.
    #[error("Delivery {0} is not assigned to this driver")]
    NotAssigned(DeliveryId),

    /// Drop-off was requested before pickup.
    #[error("Delivery {0} has not been picked up")]
    NotPickedUp(DeliveryId),

    #[error(transparent)]
    Account(#[from] AccountError),

    /// Boxed: order errors can themselves carry a delivery error.
    #[error(transparent)]
    Order(Box<OrderError>),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<OrderError> for DeliveryError {
    fn from(e: OrderError) -> Self {
        DeliveryError::Order(Box::new(e))
    }
}

impl DeliveryError {
    pub fn from_framework(e: FrameworkError) -> Self {
        match e.into_entity_error::<DeliveryError>() {
            Ok(typed) => typed,
            Err(FrameworkError::NotFound(id)) => DeliveryError::NotFound(id),
            Err(other) => DeliveryError::ActorCommunicationError(other.to_string()),
        }
    }
}
