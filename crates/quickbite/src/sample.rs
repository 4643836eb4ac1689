//! Seed data for new restaurants.
use crate::model::MenuItemDraft;
use rust_decimal::Decimal;

/// The four items every restaurant starts with.
pub fn default_menu() -> Vec<MenuItemDraft> {
    vec![
        MenuItemDraft::new(
            "Margherita Pizza",
            "Classic tomato and mozzarella",
            Decimal::new(1299, 2),
            "Pizza",
        ),
        MenuItemDraft::new(
            "Pepperoni Pizza",
            "Pepperoni with mozzarella cheese",
            Decimal::new(1499, 2),
            "Pizza",
        ),
        MenuItemDraft::new(
            "Caesar Salad",
            "Fresh romaine with caesar dressing",
            Decimal::new(899, 2),
            "Salads",
        ),
        MenuItemDraft::new(
            "Chicken Burger",
            "Grilled chicken with fresh vegetables",
            Decimal::new(1099, 2),
            "Burgers",
        ),
    ]
}
