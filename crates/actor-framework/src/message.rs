//! # Generic Messages
//!
//! The request type exchanged between [`ResourceClient`](crate::ResourceClient) and
//! [`ResourceActor`](crate::ResourceActor).

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Request sent to a resource actor.
///
/// The variants are the resource lifecycle (Create, Get, Update, Delete), a custom
/// `Action` for domain operations that are not plain CRUD, and two store-wide
/// requests: `List` (read projections) and `Seed` (restore persisted state).
///
/// Every payload type comes from the [`ActorEntity`] associated types, so a request
/// built for one resource cannot be sent to another.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
    /// Insert already-built entities under their own ids, replacing existing ones.
    Seed {
        items: Vec<T>,
        respond_to: Response<usize>,
    },
}
