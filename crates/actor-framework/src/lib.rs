//! # Actor Framework
//!
//! Building blocks for type-safe resource actors on Tokio.
//!
//! Every resource type (accounts, menu items, orders, deliveries) lives inside its own
//! [`ResourceActor`]. The actor owns a plain `HashMap` and processes one request at a
//! time, so it is the single writer for that resource. Other tasks talk to it through a
//! cloneable [`ResourceClient`].
//!
//! ## Layers
//!
//! 1. **Entity** ([`ActorEntity`]): domain data and hooks (`from_create_params`,
//!    `check_conflict`, `on_create`, `on_update`, `on_delete`, `handle_action`).
//! 2. **Runtime** ([`ResourceActor`]): the message loop and the store.
//! 3. **Interface** ([`ResourceClient`], [`ActorClient`]): typed requests and error mapping.
//!
//! ## Example
//!
//! ```rust
//! use actor_framework::{ActorEntity, ResourceActor};
//! use async_trait::async_trait;
//! use std::sync::atomic::{AtomicU32, Ordering};
//!
//! #[derive(Clone, Debug)]
//! struct Dish {
//!     id: u32,
//!     name: String,
//!     available: bool,
//! }
//!
//! #[derive(Debug)] struct DishCreate { name: String }
//! #[derive(Debug)] struct DishRename(String);
//! #[derive(Debug)] enum DishAction { Toggle }
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("dish name must not be empty")]
//! struct EmptyName;
//!
//! #[async_trait]
//! impl ActorEntity for Dish {
//!     type Id = u32;
//!     type Create = DishCreate;
//!     type Update = DishRename;
//!     type Action = DishAction;
//!     type ActionResult = bool;
//!     type Context = ();
//!     type Error = EmptyName;
//!
//!     fn id(&self) -> &u32 { &self.id }
//!
//!     fn from_create_params(id: u32, params: DishCreate) -> Result<Self, EmptyName> {
//!         if params.name.trim().is_empty() { return Err(EmptyName); }
//!         Ok(Self { id, name: params.name, available: true })
//!     }
//!
//!     async fn on_update(&mut self, update: DishRename, _ctx: &()) -> Result<(), EmptyName> {
//!         if update.0.trim().is_empty() { return Err(EmptyName); }
//!         self.name = update.0;
//!         Ok(())
//!     }
//!
//!     async fn handle_action(&mut self, action: DishAction, _ctx: &()) -> Result<bool, EmptyName> {
//!         match action {
//!             DishAction::Toggle => {
//!                 self.available = !self.available;
//!                 Ok(self.available)
//!             }
//!         }
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let counter = AtomicU32::new(0);
//!     let (actor, client) =
//!         ResourceActor::<Dish>::new(10, move || counter.fetch_add(1, Ordering::Relaxed) + 1);
//!     tokio::spawn(actor.run(()));
//!
//!     let id = client.create(DishCreate { name: "Pad Thai".into() }).await.unwrap();
//!     let available = client.perform_action(id, DishAction::Toggle).await.unwrap();
//!     assert!(!available);
//! }
//! ```
//!
//! ## Context Injection
//!
//! Dependencies are passed to `run(context)`, not to `new`. All actors can be
//! constructed first, and each one then starts with the clients of the actors it
//! calls. An order actor, for example, runs with the account and delivery clients in
//! its context and calls them from `on_create` and `handle_action`.
//!
//! ## Testing
//!
//! [`mock::MockClient`] answers requests from a script of expectations, so an entity's
//! cross-actor calls can be tested without spawning its dependencies.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;

pub use actor::{IdGenerator, ResourceActor};
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
