//! Custom actions for the Delivery actor.

use crate::model::{AccountId, Delivery};

#[derive(Debug, Clone)]
pub enum DeliveryAction {
    /// Hands an available delivery to a driver. First come, first served.
    Assign(AccountId),
    /// Returns the delivery to the pool if this driver holds it (undo of `Assign`).
    Unassign(AccountId),
    /// The assigned driver collected the food.
    MarkPickedUp(AccountId),
    /// Puts a picked-up delivery back to assigned if this driver holds it (undo of
    /// `MarkPickedUp`).
    RevertPickUp(AccountId),
    /// Checks that this driver picked the delivery up and may drop it off. Read-only.
    ConfirmDropOff(AccountId),
}

/// Results from DeliveryActions - variants match 1:1 with DeliveryAction
#[derive(Debug, Clone)]
pub enum DeliveryActionResult {
    Assign(Delivery),
    /// Whether the driver held it.
    Unassign(bool),
    MarkPickedUp(Delivery),
    /// Whether the pickup was undone.
    RevertPickUp(bool),
    ConfirmDropOff(Delivery),
}
