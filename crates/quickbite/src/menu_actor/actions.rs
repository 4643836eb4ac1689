//! Custom actions for the Menu actor.

use crate::model::{AccountId, MenuItem};

#[derive(Debug, Clone)]
pub enum MenuAction {
    /// Flips `available`. Only the owning restaurant may do this.
    ToggleAvailability { restaurant_id: AccountId },
}

/// Results from MenuActions - variants match 1:1 with MenuAction
#[derive(Debug, Clone)]
pub enum MenuActionResult {
    /// The item after the toggle.
    ToggleAvailability(MenuItem),
}
