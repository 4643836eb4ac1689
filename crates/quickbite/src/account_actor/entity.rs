//! ActorEntity implementation for [`Account`].
//!
//! Registration is validated in `from_create_params`; email uniqueness is enforced by
//! `check_conflict`, which the actor runs against every stored account before the new
//! one is inserted. Cart and driver state change only through [`AccountAction`].

use super::actions::{AccountAction, AccountActionResult, TakenCart};
use super::error::AccountError;
use crate::model::{
    Account, AccountId, CartLine, DeliveryId, DriverProfile, MenuItemId, Profile, Registration,
    Role, RoleDetails,
};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;

fn required(field: &str, value: &str) -> Result<String, AccountError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AccountError::Validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

#[async_trait]
impl ActorEntity for Account {
    type Id = AccountId;
    type Create = Registration;
    type Update = ();
    type Action = AccountAction;
    type ActionResult = AccountActionResult;
    type Context = ();
    type Error = AccountError;

    fn id(&self) -> &AccountId {
        &self.id
    }

    /// Validates the registration and builds the role profile.
    ///
    /// Every field must be non-blank. Text fields are stored trimmed.
    fn from_create_params(id: AccountId, params: Registration) -> Result<Self, Self::Error> {
        let name = required("name", &params.name)?;
        let email = required("email", &params.email)?;
        if !email.contains('@') {
            return Err(AccountError::Validation(format!("invalid email: {email}")));
        }
        if params.password.is_blank() {
            return Err(AccountError::Validation("password is required".into()));
        }

        let profile = match params.details {
            RoleDetails::Customer => Profile::Customer { cart: Vec::new() },
            RoleDetails::Restaurant {
                restaurant_name,
                address,
            } => Profile::Restaurant {
                restaurant_name: required("restaurant name", &restaurant_name)?,
                address: required("address", &address)?,
            },
            RoleDetails::Driver {
                vehicle_type,
                license_number,
            } => Profile::Driver(DriverProfile::new(
                required("vehicle type", &vehicle_type)?,
                required("license number", &license_number)?,
            )),
        };

        Ok(Self {
            id,
            name,
            email,
            password: params.password,
            created_at: Utc::now(),
            profile,
        })
    }

    fn check_conflict(&self, existing: &Self) -> Result<(), Self::Error> {
        if existing.has_email(&self.email) {
            return Err(AccountError::DuplicateEmail(self.email.clone()));
        }
        Ok(())
    }

    async fn on_update(&mut self, _update: (), _ctx: &()) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: AccountAction,
        _ctx: &(),
    ) -> Result<AccountActionResult, Self::Error> {
        let actual = self.role();
        match (action, &mut self.profile) {
            (AccountAction::AddToCart(line), Profile::Customer { cart }) => {
                add_line(cart, line)?;
                Ok(AccountActionResult::AddToCart(cart.clone()))
            }
            (
                AccountAction::ChangeQuantity {
                    menu_item_id,
                    delta,
                },
                Profile::Customer { cart },
            ) => {
                change_quantity(cart, menu_item_id, delta)?;
                Ok(AccountActionResult::ChangeQuantity(cart.clone()))
            }
            (AccountAction::RemoveFromCart(menu_item_id), Profile::Customer { cart }) => {
                let before = cart.len();
                cart.retain(|line| line.menu_item_id != menu_item_id);
                if cart.len() == before {
                    return Err(AccountError::CartLineNotFound(menu_item_id));
                }
                Ok(AccountActionResult::RemoveFromCart(cart.clone()))
            }
            (AccountAction::TakeCart, Profile::Customer { cart }) => {
                if cart.is_empty() {
                    return Err(AccountError::EmptyCart);
                }
                Ok(AccountActionResult::TakeCart(TakenCart {
                    customer_name: self.name.clone(),
                    lines: std::mem::take(cart),
                }))
            }
            (AccountAction::BeginDelivery(delivery_id), Profile::Driver(driver)) => {
                if let Some(active) = driver.active_delivery {
                    return Err(AccountError::DeliveryAlreadyActive(active));
                }
                if driver.rejected_deliveries.contains(&delivery_id) {
                    return Err(AccountError::DeliveryRejected(delivery_id));
                }
                driver.active_delivery = Some(delivery_id);
                Ok(AccountActionResult::BeginDelivery(()))
            }
            (AccountAction::ReleaseDelivery(delivery_id), Profile::Driver(driver)) => {
                let held = driver.active_delivery == Some(delivery_id);
                if held {
                    driver.active_delivery = None;
                }
                Ok(AccountActionResult::ReleaseDelivery(held))
            }
            (AccountAction::CompleteDelivery(record), Profile::Driver(driver)) => {
                if driver.active_delivery != Some(record.delivery_id) {
                    return Err(AccountError::NoActiveDelivery);
                }
                driver.active_delivery = None;
                driver.earnings += record.amount;
                driver.completed_deliveries += 1;
                driver
                    .rejected_deliveries
                    .retain(|rejected| *rejected != record.delivery_id);
                driver.earnings_history.insert(0, record);
                Ok(AccountActionResult::CompleteDelivery(driver.earnings))
            }
            (AccountAction::RejectDelivery(delivery_id), Profile::Driver(driver)) => {
                reject(driver, delivery_id);
                Ok(AccountActionResult::RejectDelivery(()))
            }
            (AccountAction::ForgetRejected(gone), Profile::Driver(driver)) => {
                let before = driver.rejected_deliveries.len();
                driver
                    .rejected_deliveries
                    .retain(|rejected| !gone.contains(rejected));
                Ok(AccountActionResult::ForgetRejected(
                    before - driver.rejected_deliveries.len(),
                ))
            }
            (action, _) => Err(AccountError::RoleMismatch {
                expected: required_role(&action),
                actual,
            }),
        }
    }
}

fn required_role(action: &AccountAction) -> Role {
    match action {
        AccountAction::AddToCart(_)
        | AccountAction::ChangeQuantity { .. }
        | AccountAction::RemoveFromCart(_)
        | AccountAction::TakeCart => Role::Customer,
        AccountAction::BeginDelivery(_)
        | AccountAction::ReleaseDelivery(_)
        | AccountAction::CompleteDelivery(_)
        | AccountAction::RejectDelivery(_)
        | AccountAction::ForgetRejected(_) => Role::Driver,
    }
}

fn add_line(cart: &mut Vec<CartLine>, line: CartLine) -> Result<(), AccountError> {
    if line.quantity == 0 {
        return Err(AccountError::Validation("quantity must be at least 1".into()));
    }
    if cart
        .first()
        .is_some_and(|first| first.restaurant_id != line.restaurant_id)
    {
        return Err(AccountError::MixedRestaurantCart);
    }
    match cart
        .iter_mut()
        .find(|existing| existing.menu_item_id == line.menu_item_id)
    {
        Some(existing) => existing.quantity += line.quantity,
        None => cart.push(line),
    }
    Ok(())
}

fn change_quantity(
    cart: &mut Vec<CartLine>,
    menu_item_id: MenuItemId,
    delta: i32,
) -> Result<(), AccountError> {
    let index = cart
        .iter()
        .position(|line| line.menu_item_id == menu_item_id)
        .ok_or(AccountError::CartLineNotFound(menu_item_id))?;

    let quantity = i64::from(cart[index].quantity) + i64::from(delta);
    if quantity <= 0 {
        cart.remove(index);
    } else {
        cart[index].quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
    }
    Ok(())
}

fn reject(driver: &mut DriverProfile, delivery_id: DeliveryId) {
    if !driver.rejected_deliveries.contains(&delivery_id) {
        driver.rejected_deliveries.push(delivery_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EarningsRecord, EarningsRecordId, OrderId};
    use rust_decimal::Decimal;

    fn customer() -> Account {
        Account::from_create_params(
            AccountId::generate(),
            Registration::customer("Ana", "ana@example.com", "pw"),
        )
        .unwrap()
    }

    fn driver() -> Account {
        Account::from_create_params(
            AccountId::generate(),
            Registration::driver("Dev", "dev@example.com", "pw", "bike", "D-1"),
        )
        .unwrap()
    }

    fn line(restaurant_id: AccountId, menu_item_id: MenuItemId) -> CartLine {
        CartLine {
            menu_item_id,
            name: "Margherita Pizza".into(),
            price: Decimal::new(1299, 2),
            restaurant_id,
            restaurant_name: "Luigi's".into(),
            quantity: 1,
        }
    }

    #[test]
    fn test_registration_rejects_blank_fields() {
        let result = Account::from_create_params(
            AccountId::generate(),
            Registration::restaurant("Lu", "lu@example.com", "pw", "  ", "1 Main St"),
        );
        assert!(matches!(result, Err(AccountError::Validation(_))));
    }

    #[test]
    fn test_conflict_on_same_email_any_case() {
        let first = customer();
        let second = Account::from_create_params(
            AccountId::generate(),
            Registration::customer("Other", " ANA@example.com", "pw2"),
        )
        .unwrap();
        assert!(matches!(
            second.check_conflict(&first),
            Err(AccountError::DuplicateEmail(_))
        ));
    }

    #[tokio::test]
    async fn test_add_same_item_increments_quantity() {
        let mut account = customer();
        let restaurant = AccountId::generate();
        let item = MenuItemId::generate();

        account
            .handle_action(AccountAction::AddToCart(line(restaurant, item)), &())
            .await
            .unwrap();
        let result = account
            .handle_action(AccountAction::AddToCart(line(restaurant, item)), &())
            .await
            .unwrap();

        match result {
            AccountActionResult::AddToCart(cart) => {
                assert_eq!(cart.len(), 1);
                assert_eq!(cart[0].quantity, 2);
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_mixed_restaurant_cart_is_rejected() {
        let mut account = customer();
        account
            .handle_action(
                AccountAction::AddToCart(line(AccountId::generate(), MenuItemId::generate())),
                &(),
            )
            .await
            .unwrap();

        let err = account
            .handle_action(
                AccountAction::AddToCart(line(AccountId::generate(), MenuItemId::generate())),
                &(),
            )
            .await
            .unwrap_err();
        assert_eq!(err, AccountError::MixedRestaurantCart);
        assert_eq!(account.cart().map(<[CartLine]>::len), Some(1));
    }

    #[tokio::test]
    async fn test_quantity_drop_to_zero_removes_line() {
        let mut account = customer();
        let item = MenuItemId::generate();
        account
            .handle_action(
                AccountAction::AddToCart(line(AccountId::generate(), item)),
                &(),
            )
            .await
            .unwrap();

        account
            .handle_action(
                AccountAction::ChangeQuantity {
                    menu_item_id: item,
                    delta: -1,
                },
                &(),
            )
            .await
            .unwrap();
        assert_eq!(account.cart().map(<[CartLine]>::len), Some(0));
    }

    #[tokio::test]
    async fn test_take_empty_cart_fails() {
        let mut account = customer();
        let err = account
            .handle_action(AccountAction::TakeCart, &())
            .await
            .unwrap_err();
        assert_eq!(err, AccountError::EmptyCart);
    }

    #[tokio::test]
    async fn test_cart_actions_require_customer() {
        let mut account = driver();
        let err = account
            .handle_action(AccountAction::TakeCart, &())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            AccountError::RoleMismatch {
                expected: Role::Customer,
                actual: Role::Driver
            }
        );
    }

    #[tokio::test]
    async fn test_driver_holds_one_delivery() {
        let mut account = driver();
        let first = DeliveryId::generate();
        account
            .handle_action(AccountAction::BeginDelivery(first), &())
            .await
            .unwrap();

        let err = account
            .handle_action(AccountAction::BeginDelivery(DeliveryId::generate()), &())
            .await
            .unwrap_err();
        assert_eq!(err, AccountError::DeliveryAlreadyActive(first));
    }

    #[tokio::test]
    async fn test_complete_delivery_credits_once() {
        let mut account = driver();
        let delivery_id = DeliveryId::generate();
        account
            .handle_action(AccountAction::BeginDelivery(delivery_id), &())
            .await
            .unwrap();

        let record = EarningsRecord {
            id: EarningsRecordId::generate(),
            delivery_id,
            order_id: OrderId::generate(),
            amount: Decimal::new(299, 2),
            date: Utc::now(),
            restaurant_name: "Luigi's".into(),
            customer_name: "Ana".into(),
        };
        account
            .handle_action(AccountAction::CompleteDelivery(record.clone()), &())
            .await
            .unwrap();
        let again = account
            .handle_action(AccountAction::CompleteDelivery(record), &())
            .await;
        assert!(matches!(again, Err(AccountError::NoActiveDelivery)));

        let profile = account.driver().unwrap();
        assert_eq!(profile.earnings, Decimal::new(299, 2));
        assert_eq!(profile.completed_deliveries, 1);
        assert_eq!(profile.earnings_history.len(), 1);
        assert!(profile.active_delivery.is_none());
    }

    #[tokio::test]
    async fn test_rejected_delivery_cannot_be_claimed() {
        let mut account = driver();
        let delivery_id = DeliveryId::generate();
        account
            .handle_action(AccountAction::RejectDelivery(delivery_id), &())
            .await
            .unwrap();

        let err = account
            .handle_action(AccountAction::BeginDelivery(delivery_id), &())
            .await
            .unwrap_err();
        assert_eq!(err, AccountError::DeliveryRejected(delivery_id));
        assert!(account.driver().unwrap().active_delivery.is_none());
    }

    #[tokio::test]
    async fn test_forget_rejected_keeps_live_rejections() {
        let mut account = driver();
        let gone = DeliveryId::generate();
        let live = DeliveryId::generate();
        for id in [gone, live] {
            account
                .handle_action(AccountAction::RejectDelivery(id), &())
                .await
                .unwrap();
        }

        let result = account
            .handle_action(AccountAction::ForgetRejected(vec![gone]), &())
            .await
            .unwrap();
        assert!(matches!(result, AccountActionResult::ForgetRejected(1)));
        assert_eq!(account.driver().unwrap().rejected_deliveries, vec![live]);
    }
}
