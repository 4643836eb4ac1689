//! ActorEntity implementation for [`MenuItem`].
//!
//! Every write carries the acting restaurant's id and is rejected with `NotOwner` when
//! it does not match the item's `restaurant_id`.

use super::actions::{MenuAction, MenuActionResult};
use super::error::MenuError;
use crate::model::{AccountId, MenuItem, MenuItemCreate, MenuItemId, MenuItemUpdate};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use rust_decimal::Decimal;

fn validate_name(name: &str) -> Result<String, MenuError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(MenuError::Validation("name is required".into()));
    }
    Ok(name.to_string())
}

fn validate_price(price: Decimal) -> Result<Decimal, MenuError> {
    if price.is_sign_negative() {
        return Err(MenuError::Validation(format!(
            "price must not be negative: {price}"
        )));
    }
    Ok(price)
}

impl MenuItem {
    fn check_owner(&self, restaurant_id: AccountId) -> Result<(), MenuError> {
        if self.restaurant_id != restaurant_id {
            return Err(MenuError::NotOwner(self.id));
        }
        Ok(())
    }
}

#[async_trait]
impl ActorEntity for MenuItem {
    type Id = MenuItemId;
    type Create = MenuItemCreate;
    type Update = MenuItemUpdate;
    type Action = MenuAction;
    type ActionResult = MenuActionResult;
    type Context = ();
    type Error = MenuError;

    fn id(&self) -> &MenuItemId {
        &self.id
    }

    /// New items start out available.
    fn from_create_params(id: MenuItemId, params: MenuItemCreate) -> Result<Self, Self::Error> {
        let draft = params.draft;
        Ok(Self {
            id,
            restaurant_id: params.restaurant_id,
            name: validate_name(&draft.name)?,
            description: draft.description.trim().to_string(),
            price: validate_price(draft.price)?,
            category: draft.category.trim().to_string(),
            available: true,
        })
    }

    /// Applies an edit after the ownership and field checks have all passed.
    async fn on_update(&mut self, update: MenuItemUpdate, _ctx: &()) -> Result<(), Self::Error> {
        self.check_owner(update.restaurant_id)?;
        let edit = update.edit;

        let name = edit.name.as_deref().map(validate_name).transpose()?;
        let price = edit.price.map(validate_price).transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(price) = price {
            self.price = price;
        }
        if let Some(description) = edit.description {
            self.description = description.trim().to_string();
        }
        if let Some(category) = edit.category {
            self.category = category.trim().to_string();
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: MenuAction,
        _ctx: &(),
    ) -> Result<MenuActionResult, Self::Error> {
        match action {
            MenuAction::ToggleAvailability { restaurant_id } => {
                self.check_owner(restaurant_id)?;
                self.available = !self.available;
                Ok(MenuActionResult::ToggleAvailability(self.clone()))
            }
        }
    }
}
