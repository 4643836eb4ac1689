/// Menu items, each owned by one restaurant.
use crate::model::{AccountId, MenuItemId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: MenuItemId,
    pub restaurant_id: AccountId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    pub available: bool,
}

/// Fields a restaurant fills in for a new item.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItemDraft {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
}

impl MenuItemDraft {
    pub fn new(name: &str, description: &str, price: Decimal, category: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            price,
            category: category.to_string(),
        }
    }
}

/// Payload for creating a menu item: the draft plus its owner.
#[derive(Debug, Clone)]
pub struct MenuItemCreate {
    pub restaurant_id: AccountId,
    pub draft: MenuItemDraft,
}

/// Partial edit of a menu item. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuItemEdit {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
}

/// Update payload carrying the editing restaurant for the ownership check.
#[derive(Debug, Clone)]
pub struct MenuItemUpdate {
    pub restaurant_id: AccountId,
    pub edit: MenuItemEdit,
}

/// A restaurant as customers browse it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantListing {
    pub restaurant_id: AccountId,
    pub restaurant_name: String,
    pub address: String,
    pub items: Vec<MenuItem>,
}
