//! # System Lifecycle
//!
//! Starting, wiring and stopping the actors.
//!
//! ## Wiring
//!
//! Actors are created first and receive their dependencies at `run(context)`:
//!
//! | Actor | Context |
//! |---|---|
//! | `Account` | `()` |
//! | `MenuItem` | `()` |
//! | `Delivery` | `()` |
//! | `Order` | [`OrderContext`](crate::order_actor::OrderContext): account client, delivery client, fee |
//!
//! The graph is acyclic, so every actor stops once the clients pointing at it are
//! dropped. The one exception is the [`TransitionScheduler`]: its timers hold an order
//! client, and the order client holds the scheduler handle, so the scheduler is stopped
//! explicitly with a `Shutdown` command before the clients are dropped.
//!
//! ## Shutdown
//!
//! 1. Stop the scheduler and abort its timers.
//! 2. Save the state file, if one is configured.
//! 3. Drop every client and await the actor tasks.

pub mod scheduler;
pub mod system;
pub mod tracing;

pub use scheduler::{SchedulerCommand, SchedulerHandle, TransitionScheduler};
pub use system::{QuickBiteSystem, SystemError};
pub use self::tracing::setup_tracing;
