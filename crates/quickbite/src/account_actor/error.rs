//! Error types for the Account actor.

use crate::model::{DeliveryId, MenuItemId, Role};
use actor_framework::FrameworkError;
use thiserror::Error;

/// Errors that can occur during account, session and cart operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AccountError {
    /// The requested account was not found.
    #[error("Account not found: {0}")]
    NotFound(String),

    /// Another account already uses this email.
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    /// Email, password or role did not match. Deliberately says no more.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The operation belongs to a different role.
    #[error("Operation requires a {expected} account, got {actual}")]
    RoleMismatch { expected: Role, actual: Role },

    /// A required field is missing or malformed.
    #[error("Account validation error: {0}")]
    Validation(String),

    #[error("Cart is empty")]
    EmptyCart,

    /// The cart already holds items from another restaurant.
    #[error("Cart can only hold items from one restaurant")]
    MixedRestaurantCart,

    #[error("Item {0} is not in the cart")]
    CartLineNotFound(MenuItemId),

    /// The driver already holds a delivery.
    #[error("Driver already has an active delivery: {0}")]
    DeliveryAlreadyActive(DeliveryId),

    /// The driver rejected this delivery earlier.
    #[error("Delivery {0} was rejected by this driver")]
    DeliveryRejected(DeliveryId),

    #[error("Driver has no active delivery")]
    NoActiveDelivery,

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl AccountError {
    /// Recovers the typed error from a framework error.
    pub fn from_framework(e: FrameworkError) -> Self {
        match e.into_entity_error::<AccountError>() {
            Ok(typed) => typed,
            Err(FrameworkError::NotFound(id)) => AccountError::NotFound(id),
            Err(other) => AccountError::ActorCommunicationError(other.to_string()),
        }
    }
}
