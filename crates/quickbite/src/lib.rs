//! # QuickBite
//!
//! Food-delivery order lifecycle for three roles (customer, restaurant, driver) on
//! top of `actor_framework`.
//!
//! - [`model`]: plain data: accounts, menu items, orders, deliveries, summaries.
//! - `*_actor`: one [`ResourceActor`](actor_framework::ResourceActor) per store, with
//!   the entity hooks and a typed error.
//! - [`clients`]: the role operations, sequenced across actors.
//! - [`lifecycle`]: the [`QuickBiteSystem`](lifecycle::QuickBiteSystem) orchestrator,
//!   the transition scheduler and tracing setup.
//! - [`config`], [`storage`]: environment settings and the JSON state file.
//!
//! An order lives in exactly one place, the order actor. The customer's order list,
//! the restaurant queue and the driver pool are all derived from it on read, so after a
//! transition every view reports the same status.

pub mod account_actor;
pub mod clients;
pub mod config;
pub mod delivery_actor;
pub mod lifecycle;
pub mod menu_actor;
pub mod model;
pub mod order_actor;
pub mod sample;
pub mod storage;
