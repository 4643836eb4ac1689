//! # Account Client
//!
//! High-level API for the `Account` actor: registration, credential lookups, carts and
//! driver state. It wraps a `ResourceClient<Account>`.
use crate::account_actor::{AccountAction, AccountActionResult, AccountError, TakenCart};
use crate::model::{
    Account, AccountId, CartLine, DeliveryId, EarningsRecord, MenuItemId, Registration, Role,
    Session,
};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{debug, instrument};

/// Client for interacting with the Account actor.
#[derive(Clone)]
pub struct AccountClient {
    inner: ResourceClient<Account>,
}

impl AccountClient {
    pub fn new(inner: ResourceClient<Account>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Account> for AccountClient {
    type Error = AccountError;

    fn inner(&self) -> &ResourceClient<Account> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        AccountError::from_framework(e)
    }
}

impl AccountClient {
    /// Registers a new account.
    ///
    /// Fails with `DuplicateEmail` when any stored account has the same email (trimmed,
    /// case-insensitive). The check runs inside the actor, so of two concurrent
    /// registrations with one email exactly one succeeds.
    #[instrument(skip(self))]
    pub async fn register(&self, registration: Registration) -> Result<AccountId, AccountError> {
        debug!("Sending request");
        self.inner
            .create(registration)
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AccountError> {
        self.get(id).await
    }

    /// The account whose email, password and role all match.
    #[instrument(skip(self, password))]
    pub async fn find_by_credential(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Option<Account>, AccountError> {
        let accounts = self.list().await?;
        Ok(accounts.into_iter().find(|account| {
            account.has_email(email) && account.password.matches(password) && account.role() == role
        }))
    }

    /// Like [`find_by_credential`](Self::find_by_credential), but a miss is
    /// `InvalidCredentials` without saying which field was wrong.
    #[instrument(skip(self, password))]
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Account, AccountError> {
        self.find_by_credential(email, password, role)
            .await?
            .ok_or(AccountError::InvalidCredentials)
    }

    /// Every restaurant account.
    #[instrument(skip(self))]
    pub async fn restaurants(&self) -> Result<Vec<Account>, AccountError> {
        let mut restaurants: Vec<Account> = self
            .list()
            .await?
            .into_iter()
            .filter(|account| account.role() == Role::Restaurant)
            .collect();
        restaurants.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(restaurants)
    }

    async fn action(
        &self,
        id: AccountId,
        action: AccountAction,
    ) -> Result<AccountActionResult, AccountError> {
        self.inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)
    }

    // --- Cart ---

    #[instrument(skip(self))]
    pub async fn cart(&self, session: &Session) -> Result<Vec<CartLine>, AccountError> {
        session.require(Role::Customer)?;
        let account = self
            .get(session.account_id)
            .await?
            .ok_or_else(|| AccountError::NotFound(session.account_id.to_string()))?;
        Ok(account.cart().map(<[CartLine]>::to_vec).unwrap_or_default())
    }

    /// Adds a snapshot line to the customer's cart. Returns the cart afterwards.
    #[instrument(skip(self))]
    pub async fn add_line(
        &self,
        session: &Session,
        line: CartLine,
    ) -> Result<Vec<CartLine>, AccountError> {
        session.require(Role::Customer)?;
        match self
            .action(session.account_id, AccountAction::AddToCart(line))
            .await?
        {
            AccountActionResult::AddToCart(cart) => Ok(cart),
            _ => unreachable!("AddToCart action must return AddToCart result"),
        }
    }

    #[instrument(skip(self))]
    pub async fn change_quantity(
        &self,
        session: &Session,
        menu_item_id: MenuItemId,
        delta: i32,
    ) -> Result<Vec<CartLine>, AccountError> {
        session.require(Role::Customer)?;
        match self
            .action(
                session.account_id,
                AccountAction::ChangeQuantity {
                    menu_item_id,
                    delta,
                },
            )
            .await?
        {
            AccountActionResult::ChangeQuantity(cart) => Ok(cart),
            _ => unreachable!("ChangeQuantity action must return ChangeQuantity result"),
        }
    }

    #[instrument(skip(self))]
    pub async fn remove_from_cart(
        &self,
        session: &Session,
        menu_item_id: MenuItemId,
    ) -> Result<Vec<CartLine>, AccountError> {
        session.require(Role::Customer)?;
        match self
            .action(session.account_id, AccountAction::RemoveFromCart(menu_item_id))
            .await?
        {
            AccountActionResult::RemoveFromCart(cart) => Ok(cart),
            _ => unreachable!("RemoveFromCart action must return RemoveFromCart result"),
        }
    }

    /// Empties the customer's cart and returns what was in it.
    #[instrument(skip(self))]
    pub async fn take_cart(&self, customer_id: AccountId) -> Result<TakenCart, AccountError> {
        match self.action(customer_id, AccountAction::TakeCart).await? {
            AccountActionResult::TakeCart(taken) => Ok(taken),
            _ => unreachable!("TakeCart action must return TakeCart result"),
        }
    }

    // --- Driver ---

    #[instrument(skip(self))]
    pub async fn begin_delivery(
        &self,
        driver_id: AccountId,
        delivery_id: DeliveryId,
    ) -> Result<(), AccountError> {
        match self
            .action(driver_id, AccountAction::BeginDelivery(delivery_id))
            .await?
        {
            AccountActionResult::BeginDelivery(()) => Ok(()),
            _ => unreachable!("BeginDelivery action must return BeginDelivery result"),
        }
    }

    /// Returns whether the driver held the claim.
    #[instrument(skip(self))]
    pub async fn release_delivery(
        &self,
        driver_id: AccountId,
        delivery_id: DeliveryId,
    ) -> Result<bool, AccountError> {
        match self
            .action(driver_id, AccountAction::ReleaseDelivery(delivery_id))
            .await?
        {
            AccountActionResult::ReleaseDelivery(held) => Ok(held),
            _ => unreachable!("ReleaseDelivery action must return ReleaseDelivery result"),
        }
    }

    /// Appends the record to the driver's ledger. Returns cumulative earnings.
    #[instrument(skip(self))]
    pub async fn complete_delivery(
        &self,
        driver_id: AccountId,
        record: EarningsRecord,
    ) -> Result<Decimal, AccountError> {
        match self
            .action(driver_id, AccountAction::CompleteDelivery(record))
            .await?
        {
            AccountActionResult::CompleteDelivery(earnings) => Ok(earnings),
            _ => unreachable!("CompleteDelivery action must return CompleteDelivery result"),
        }
    }

    #[instrument(skip(self))]
    pub async fn reject_delivery(
        &self,
        driver_id: AccountId,
        delivery_id: DeliveryId,
    ) -> Result<(), AccountError> {
        match self
            .action(driver_id, AccountAction::RejectDelivery(delivery_id))
            .await?
        {
            AccountActionResult::RejectDelivery(()) => Ok(()),
            _ => unreachable!("RejectDelivery action must return RejectDelivery result"),
        }
    }

    /// Drops the driver's rejections of deliveries in `gone`. Returns how many went.
    #[instrument(skip(self))]
    pub async fn forget_rejected(
        &self,
        driver_id: AccountId,
        gone: Vec<DeliveryId>,
    ) -> Result<usize, AccountError> {
        match self
            .action(driver_id, AccountAction::ForgetRejected(gone))
            .await?
        {
            AccountActionResult::ForgetRejected(count) => Ok(count),
            _ => unreachable!("ForgetRejected action must return ForgetRejected result"),
        }
    }
}
