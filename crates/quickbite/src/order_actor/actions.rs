//! Custom actions for the Order actor.

use crate::model::{Order, OrderStatus};

#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Moves the order along one edge of the transition table.
    ///
    /// With `expected` set, the transition only applies while the order is still in
    /// that status; otherwise it fails with `StaleStatus` and nothing changes.
    Transition {
        to: OrderStatus,
        expected: Option<OrderStatus>,
    },
}

/// Results from OrderActions - variants match 1:1 with OrderAction
#[derive(Debug, Clone)]
pub enum OrderActionResult {
    /// The order after the transition.
    Transition(Order),
}
