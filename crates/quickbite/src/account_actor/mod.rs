//! # Account Actor
//!
//! Owns every registered account: customers, restaurants and drivers.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`Account`]
//! - [`error`] - [`AccountError`]
//! - [`actions`] - [`AccountAction`] and [`AccountActionResult`] for cart and driver state
//! - [`new()`] - Factory function that creates the actor and client
//!
//! The account actor has no dependencies (`Context = ()`). The order actor calls it to
//! drain a cart at checkout; the delivery client calls it to claim and credit deliveries.
//!
//! ## Usage
//!
//! ```rust
//! use quickbite::account_actor;
//! use quickbite::model::Registration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, client) = account_actor::new(32);
//!     tokio::spawn(actor.run(()));
//!
//!     let id = client
//!         .register(Registration::customer("Ana", "ana@example.com", "secret"))
//!         .await?;
//!     let account = client.find_by_id(id).await?;
//!     assert!(account.is_some());
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::AccountClient;
use crate::model::{Account, AccountId};
use actor_framework::ResourceActor;

/// Creates a new Account actor and its client.
pub fn new(capacity: usize) -> (ResourceActor<Account>, AccountClient) {
    let (actor, generic_client) = ResourceActor::new(capacity, AccountId::generate);
    (actor, AccountClient::new(generic_client))
}
