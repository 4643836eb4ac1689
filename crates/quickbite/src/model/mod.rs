//! Domain data shared by the actors, clients and persisted state.

pub mod account;
pub mod delivery;
pub mod ids;
pub mod menu;
pub mod order;
pub mod session;
pub mod summary;

pub use account::*;
pub use delivery::*;
pub use ids::*;
pub use menu::*;
pub use order::*;
pub use session::*;
pub use summary::*;
