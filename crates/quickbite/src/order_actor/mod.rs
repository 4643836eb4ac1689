//! # Order Actor
//!
//! The order lifecycle engine. Each order id maps to one stored [`Order`]; every
//! status change is an [`OrderAction::Transition`] validated against the transition
//! table in [`OrderStatus`](crate::model::OrderStatus).
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation and [`OrderContext`]
//! - [`error`] - [`OrderError`]
//! - [`actions`] - [`OrderAction`] and [`OrderActionResult`]
//!
//! ## Dependencies
//!
//! `Context = OrderContext`: the account client (drain carts, look up restaurants) and
//! the raw delivery client (spawn deliveries). Neither depends back on orders.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use entity::OrderContext;
pub use error::*;

use crate::clients::{AccountClient, OrderClient};
use crate::model::{Order, OrderId};
use actor_framework::ResourceActor;
use rust_decimal::Decimal;

/// Creates a new Order actor and its client.
///
/// The actor still needs its [`OrderContext`] at `run`.
pub fn new(
    capacity: usize,
    accounts: AccountClient,
    delivery_fee: Decimal,
) -> (ResourceActor<Order>, OrderClient) {
    let (actor, generic_client) = ResourceActor::new(capacity, OrderId::generate);
    (actor, OrderClient::new(generic_client, accounts, delivery_fee))
}
