//! # Menu Actor
//!
//! Owns the menu items of every restaurant. Each item belongs to exactly one
//! restaurant, and every edit, toggle or delete is checked against that owner.
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`MenuItem`]
//! - [`error`] - [`MenuError`]
//! - [`actions`] - [`MenuAction`] (availability toggle)

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::{AccountClient, MenuClient};
use crate::model::{MenuItem, MenuItemId};
use actor_framework::ResourceActor;

/// Creates a new Menu actor and its client.
///
/// The client needs the account client to resolve restaurant names and to fill carts.
pub fn new(capacity: usize, accounts: AccountClient) -> (ResourceActor<MenuItem>, MenuClient) {
    let (actor, generic_client) = ResourceActor::new(capacity, MenuItemId::generate);
    (actor, MenuClient::new(generic_client, accounts))
}
