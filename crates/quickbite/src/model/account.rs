/// Registered participants and their role state.
///
/// # Actor Framework
/// [`Account`] implements [`ActorEntity`](actor_framework::ActorEntity) in
/// [`account_actor::entity`](crate::account_actor::entity). Role state that changes
/// after registration (a customer's cart, a driver's earnings) lives inside the
/// account, so every change to it goes through the account actor.
use crate::model::{AccountId, DeliveryId, EarningsRecord, MenuItemId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// The three roles an account can register as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Restaurant,
    Driver,
}

impl Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Customer => "customer",
            Self::Restaurant => "restaurant",
            Self::Driver => "driver",
        })
    }
}

/// Clear-text password. Kept out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    pub fn matches(&self, candidate: &str) -> bool {
        self.0 == candidate
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Lowercased, trimmed form used for every email comparison.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// One line of a customer's cart.
///
/// Name, price and restaurant are copied from the menu item when it is added, so later
/// menu edits do not change what the customer is about to pay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub menu_item_id: MenuItemId,
    pub name: String,
    pub price: Decimal,
    pub restaurant_id: AccountId,
    pub restaurant_name: String,
    pub quantity: u32,
}

impl CartLine {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Sum of `price * quantity` over the lines.
pub fn subtotal(lines: &[CartLine]) -> Decimal {
    lines.iter().map(CartLine::line_total).sum()
}

/// Driver state: earnings ledger and the delivery currently held.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverProfile {
    pub vehicle_type: String,
    pub license_number: String,
    pub earnings: Decimal,
    pub completed_deliveries: u32,
    /// Newest first.
    pub earnings_history: Vec<EarningsRecord>,
    pub active_delivery: Option<DeliveryId>,
    pub rejected_deliveries: Vec<DeliveryId>,
}

impl DriverProfile {
    pub fn new(vehicle_type: impl Into<String>, license_number: impl Into<String>) -> Self {
        Self {
            vehicle_type: vehicle_type.into(),
            license_number: license_number.into(),
            earnings: Decimal::ZERO,
            completed_deliveries: 0,
            earnings_history: Vec::new(),
            active_delivery: None,
            rejected_deliveries: Vec::new(),
        }
    }
}

/// Role-specific account state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Profile {
    Customer {
        cart: Vec<CartLine>,
    },
    #[serde(rename_all = "camelCase")]
    Restaurant {
        restaurant_name: String,
        address: String,
    },
    Driver(DriverProfile),
}

impl Profile {
    pub fn role(&self) -> Role {
        match self {
            Self::Customer { .. } => Role::Customer,
            Self::Restaurant { .. } => Role::Restaurant,
            Self::Driver(_) => Role::Driver,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub email: String,
    pub password: Password,
    pub created_at: DateTime<Utc>,
    pub profile: Profile,
}

impl Account {
    pub fn role(&self) -> Role {
        self.profile.role()
    }

    /// Restaurant display name, if this is a restaurant account.
    pub fn restaurant_name(&self) -> Option<&str> {
        match &self.profile {
            Profile::Restaurant {
                restaurant_name, ..
            } => Some(restaurant_name),
            _ => None,
        }
    }

    pub fn cart(&self) -> Option<&[CartLine]> {
        match &self.profile {
            Profile::Customer { cart } => Some(cart),
            _ => None,
        }
    }

    pub fn driver(&self) -> Option<&DriverProfile> {
        match &self.profile {
            Profile::Driver(driver) => Some(driver),
            _ => None,
        }
    }

    pub fn has_email(&self, email: &str) -> bool {
        normalize_email(&self.email) == normalize_email(email)
    }
}

/// Role details supplied at registration.
#[derive(Debug, Clone, PartialEq)]
pub enum RoleDetails {
    Customer,
    Restaurant {
        restaurant_name: String,
        address: String,
    },
    Driver {
        vehicle_type: String,
        license_number: String,
    },
}

impl RoleDetails {
    pub fn role(&self) -> Role {
        match self {
            Self::Customer => Role::Customer,
            Self::Restaurant { .. } => Role::Restaurant,
            Self::Driver { .. } => Role::Driver,
        }
    }
}

/// Payload for registering a new account.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: Password,
    pub details: RoleDetails,
}

impl Registration {
    pub fn customer(name: &str, email: &str, password: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            password: Password::new(password),
            details: RoleDetails::Customer,
        }
    }

    pub fn restaurant(
        name: &str,
        email: &str,
        password: &str,
        restaurant_name: &str,
        address: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            password: Password::new(password),
            details: RoleDetails::Restaurant {
                restaurant_name: restaurant_name.to_string(),
                address: address.to_string(),
            },
        }
    }

    pub fn driver(
        name: &str,
        email: &str,
        password: &str,
        vehicle_type: &str,
        license_number: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            password: Password::new(password),
            details: RoleDetails::Driver {
                vehicle_type: vehicle_type.to_string(),
                license_number: license_number.to_string(),
            },
        }
    }
}

/// Cart contents with the amounts checkout would charge.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub item_count: u32,
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub total: Decimal,
}

impl CartView {
    pub fn new(lines: Vec<CartLine>, delivery_fee: Decimal) -> Self {
        let subtotal = subtotal(&lines);
        Self {
            item_count: lines.iter().map(|line| line.quantity).sum(),
            total: subtotal + delivery_fee,
            subtotal,
            delivery_fee,
            lines,
        }
    }
}
