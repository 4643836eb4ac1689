//! Custom actions for the Account actor.
//!
//! Carts and driver state change through these actions rather than through `update`,
//! so every change is validated against the account's current role state inside the
//! actor. See [`impl ActorEntity for Account`](crate::account_actor::entity).

use crate::model::{CartLine, DeliveryId, EarningsRecord, MenuItemId};
use rust_decimal::Decimal;

/// Custom actions for Account entities.
#[derive(Debug, Clone)]
pub enum AccountAction {
    /// Adds a line, or increases the quantity of the line for the same item.
    ///
    /// # Errors
    /// `MixedRestaurantCart` if the cart holds another restaurant's items.
    AddToCart(CartLine),
    /// Changes a line's quantity by `delta`; the line is removed at zero or below.
    ChangeQuantity { menu_item_id: MenuItemId, delta: i32 },
    RemoveFromCart(MenuItemId),
    /// Empties the cart and hands back its lines. Fails with `EmptyCart` and leaves
    /// the account untouched when there is nothing to take.
    TakeCart,
    /// Claims a delivery for this driver. A driver holds at most one, and never one
    /// they rejected.
    BeginDelivery(DeliveryId),
    /// Drops the claim on a delivery (undo of `BeginDelivery`).
    ReleaseDelivery(DeliveryId),
    /// Credits a finished delivery and clears the claim.
    CompleteDelivery(EarningsRecord),
    /// Hides a delivery from this driver's pool.
    RejectDelivery(DeliveryId),
    /// Drops rejections of deliveries that no longer exist.
    ForgetRejected(Vec<DeliveryId>),
}

/// Cart lines drained at checkout, with the customer's name for the order.
#[derive(Debug, Clone, PartialEq)]
pub struct TakenCart {
    pub customer_name: String,
    pub lines: Vec<CartLine>,
}

/// Results from AccountActions - variants match 1:1 with AccountAction
#[derive(Debug, Clone)]
pub enum AccountActionResult {
    /// The cart after the change.
    AddToCart(Vec<CartLine>),
    ChangeQuantity(Vec<CartLine>),
    RemoveFromCart(Vec<CartLine>),
    TakeCart(TakenCart),
    BeginDelivery(()),
    /// Whether the claim was held.
    ReleaseDelivery(bool),
    /// Cumulative earnings after the credit.
    CompleteDelivery(Decimal),
    RejectDelivery(()),
    /// How many rejections were dropped.
    ForgetRejected(usize),
}
