//! Error types for the Menu actor.

use crate::account_actor::AccountError;
use crate::model::MenuItemId;
use actor_framework::FrameworkError;
use thiserror::Error;

/// Errors that can occur during menu operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MenuError {
    /// The requested menu item was not found.
    #[error("Menu item not found: {0}")]
    NotFound(String),

    /// The item belongs to another restaurant.
    #[error("Menu item {0} belongs to another restaurant")]
    NotOwner(MenuItemId),

    /// The item is switched off and cannot be ordered.
    #[error("Menu item {0} is not available")]
    Unavailable(MenuItemId),

    #[error("Menu validation error: {0}")]
    Validation(String),

    /// Cart or session failure from the account actor.
    #[error(transparent)]
    Account(#[from] AccountError),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl MenuError {
    pub fn from_framework(e: FrameworkError) -> Self {
        match e.into_entity_error::<MenuError>() {
            Ok(typed) => typed,
            Err(FrameworkError::NotFound(id)) => MenuError::NotFound(id),
            Err(other) => MenuError::ActorCommunicationError(other.to_string()),
        }
    }
}
