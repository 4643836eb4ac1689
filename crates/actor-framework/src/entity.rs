//! # ActorEntity Trait
//!
//! The contract every stored resource (accounts, menu items, orders, deliveries)
//! implements so that one generic [`ResourceActor`](crate::ResourceActor) can own it.
//!
//! Associated types pin down the payload of every request: an `Order` can only be
//! created from its own create DTO and can only receive its own actions. The
//! compiler rejects the rest.
//!
//! # Provided Methods (Hooks)
//! - [`ActorEntity::check_conflict`] runs against every stored entity before a create
//!   is accepted. It is how uniqueness rules (e.g. one account per email) are enforced
//!   inside the single-writer actor.
//! - [`ActorEntity::on_create`] and [`ActorEntity::on_delete`] default to `Ok(())`.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any resource entity must implement to be managed by `ResourceActor`.
///
/// # Async & Context
/// Hooks are `async` so they can call other actors. The `Context` type is injected
/// into every hook by [`ResourceActor::run`](crate::ResourceActor::run), which lets
/// dependencies be wired after construction ("late binding").
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The unique identifier for this entity.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// The data required to create a new instance.
    type Create: Send + Sync + Debug;

    /// The data required to update an existing instance.
    type Update: Send + Sync + Debug;

    /// Resource-specific operations (e.g. `Transition`, `AddToCart`).
    type Action: Send + Sync + Debug;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// The error type for this entity.
    ///
    /// One enum per actor rather than one per message: clients match on a single
    /// type and the framework only needs to box and forward it.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The identifier this entity is stored under.
    fn id(&self) -> &Self::Id;

    /// Construct the full entity from the generated ID and the create payload.
    /// Called synchronously before `check_conflict` and `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Reject a new entity that clashes with one already stored.
    ///
    /// Called once per stored entity, before `on_create`, so a rejected create has
    /// no side effects.
    fn check_conflict(&self, _existing: &Self) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Lifecycle Hooks (Async) ---

    /// Called after the entity passed the conflict check and before it is stored.
    /// An error here discards the entity.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called when an update request is received.
    ///
    /// Implementations validate first and mutate last: a failed update must leave
    /// the entity untouched.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called immediately before the entity is removed from the store.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler (Async) ---

    /// Handle a resource-specific action. Same validate-then-mutate rule as `on_update`.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
