//! Domain clients wrapping each actor's `ResourceClient`.
//!
//! Each client maps framework errors back to its actor's typed error and exposes the
//! domain operations; [`ActorClient`](actor_framework::ActorClient) supplies `get`,
//! `list` and `delete`.

pub mod account_client;
pub mod delivery_client;
pub mod menu_client;
pub mod order_client;

pub use account_client::AccountClient;
pub use delivery_client::DeliveryClient;
pub use menu_client::MenuClient;
pub use order_client::OrderClient;
