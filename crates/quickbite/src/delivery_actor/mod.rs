//! # Delivery Actor
//!
//! The pool of driver-facing deliveries. A delivery is created by the order actor
//! when its order becomes ready and deleted by [`DeliveryClient::mark_delivered`].
//!
//! The actor itself has no dependencies. The cross-actor driver flows (claim on the
//! driver's account, assign in the pool, move the order along) are sequenced by
//! [`DeliveryClient`], which undoes the claim when a later step fails.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::DeliveryClient;
use crate::model::{Delivery, DeliveryId};
use actor_framework::{ResourceActor, ResourceClient};

/// Creates a new Delivery actor and the raw client the order actor spawns deliveries with.
///
/// Wrap the client in a [`DeliveryClient`] for the driver operations.
pub fn new(capacity: usize) -> (ResourceActor<Delivery>, ResourceClient<Delivery>) {
    ResourceActor::new(capacity, DeliveryId::generate)
}
