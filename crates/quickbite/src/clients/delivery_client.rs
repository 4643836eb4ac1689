//! # Delivery Client
//!
//! Driver operations. Each one spans up to three actors (the driver's account, the
//! delivery pool and the order) and is sequenced here:
//!
//! | Operation | Account | Pool | Order |
//! |---|---|---|---|
//! | `accept_delivery` | claim | assign | on the way |
//! | `mark_picked_up` | | picked up | picked up |
//! | `mark_delivered` | credit | remove | delivered |
//!
//! When a later step of `accept_delivery` or `mark_picked_up` fails, the earlier ones
//! are undone, so the pool and the order never disagree about where the food is.
use crate::clients::{AccountClient, OrderClient};
use crate::delivery_actor::{DeliveryAction, DeliveryActionResult, DeliveryError};
use crate::model::{
    Account, AccountId, Delivery, DeliveryId, EarningsRecord, EarningsSummary, OrderStatus,
    Period, Role, Session,
};
use crate::account_actor::AccountError;
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info, instrument, warn};

/// Client for the delivery pool and the driver flows.
#[derive(Clone)]
pub struct DeliveryClient {
    inner: ResourceClient<Delivery>,
    accounts: AccountClient,
    orders: OrderClient,
}

impl DeliveryClient {
    pub fn new(inner: ResourceClient<Delivery>, accounts: AccountClient, orders: OrderClient) -> Self {
        Self {
            inner,
            accounts,
            orders,
        }
    }
}

#[async_trait]
impl ActorClient<Delivery> for DeliveryClient {
    type Error = DeliveryError;

    fn inner(&self) -> &ResourceClient<Delivery> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        DeliveryError::from_framework(e)
    }
}

impl DeliveryClient {
    async fn driver(&self, session: &Session) -> Result<Account, DeliveryError> {
        session.require(Role::Driver)?;
        Ok(self
            .accounts
            .find_by_id(session.account_id)
            .await?
            .ok_or_else(|| AccountError::NotFound(session.account_id.to_string()))?)
    }

    async fn action(
        &self,
        id: DeliveryId,
        action: DeliveryAction,
    ) -> Result<DeliveryActionResult, DeliveryError> {
        self.inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)
    }

    /// Deliveries waiting for a driver, minus the ones this driver rejected.
    ///
    /// Rejections of deliveries that have since left the pool are dropped from the
    /// driver's account on the way.
    #[instrument(skip(self))]
    pub async fn available_deliveries(&self, session: &Session) -> Result<Vec<Delivery>, DeliveryError> {
        let account = self.driver(session).await?;
        let rejected = account
            .driver()
            .map(|driver| driver.rejected_deliveries.clone())
            .unwrap_or_default();
        let all = self.list().await?;

        let gone: Vec<DeliveryId> = rejected
            .iter()
            .copied()
            .filter(|id| all.iter().all(|delivery| delivery.id != *id))
            .collect();
        if !gone.is_empty() {
            match self.accounts.forget_rejected(session.account_id, gone).await {
                Ok(count) => debug!(count, "Forgot rejections of finished deliveries"),
                Err(e) => warn!(error = %e, "Forgetting stale rejections failed"),
            }
        }

        let mut pool: Vec<Delivery> = all
            .into_iter()
            .filter(|delivery| delivery.is_available() && !rejected.contains(&delivery.id))
            .collect();
        pool.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(pool)
    }

    /// The delivery the driver currently holds.
    #[instrument(skip(self))]
    pub async fn active_delivery(&self, session: &Session) -> Result<Option<Delivery>, DeliveryError> {
        let account = self.driver(session).await?;
        match account.driver().and_then(|driver| driver.active_delivery) {
            Some(id) => self.get(id).await,
            None => Ok(None),
        }
    }

    /// Takes a delivery from the pool. The order goes `on the way`.
    ///
    /// # Errors
    /// - `DeliveryAlreadyActive` when the driver already holds a delivery.
    /// - `Rejected` when this driver rejected the delivery earlier.
    /// - `AlreadyTaken` when another driver got there first.
    #[instrument(skip(self))]
    pub async fn accept_delivery(
        &self,
        session: &Session,
        id: DeliveryId,
    ) -> Result<Delivery, DeliveryError> {
        session.require(Role::Driver)?;
        let driver_id = session.account_id;

        self.accounts
            .begin_delivery(driver_id, id)
            .await
            .map_err(|e| match e {
                AccountError::DeliveryAlreadyActive(active) => DeliveryError::DeliveryAlreadyActive(active),
                AccountError::DeliveryRejected(rejected) => DeliveryError::Rejected(rejected),
                other => DeliveryError::Account(other),
            })?;

        let delivery = match self.action(id, DeliveryAction::Assign(driver_id)).await {
            Ok(DeliveryActionResult::Assign(delivery)) => delivery,
            Ok(_) => unreachable!("Assign action must return Assign result"),
            Err(e) => {
                self.release(driver_id, id).await;
                return Err(e);
            }
        };

        if let Err(e) = self
            .orders
            .transition_order(delivery.order_id, OrderStatus::OnTheWay)
            .await
        {
            warn!(delivery_id = %id, error = %e, "Order transition failed, returning delivery to pool");
            if let Err(undo) = self.action(id, DeliveryAction::Unassign(driver_id)).await {
                warn!(delivery_id = %id, error = %undo, "Unassign failed");
            }
            self.release(driver_id, id).await;
            return Err(e.into());
        }

        info!(delivery_id = %id, %driver_id, "Delivery accepted");
        Ok(delivery)
    }

    async fn release(&self, driver_id: AccountId, id: DeliveryId) {
        if let Err(e) = self.accounts.release_delivery(driver_id, id).await {
            warn!(delivery_id = %id, %driver_id, error = %e, "Releasing driver claim failed");
        }
    }

    /// Hides the delivery from this driver only.
    #[instrument(skip(self))]
    pub async fn reject_delivery(&self, session: &Session, id: DeliveryId) -> Result<(), DeliveryError> {
        session.require(Role::Driver)?;
        if self.get(id).await?.is_none() {
            return Err(DeliveryError::NotFound(id.to_string()));
        }
        self.accounts.reject_delivery(session.account_id, id).await?;
        Ok(())
    }

    /// The assigned driver collected the food. The order goes `picked up`.
    ///
    /// If the order refuses the transition the delivery goes back to assigned.
    #[instrument(skip(self))]
    pub async fn mark_picked_up(
        &self,
        session: &Session,
        id: DeliveryId,
    ) -> Result<Delivery, DeliveryError> {
        session.require(Role::Driver)?;
        let driver_id = session.account_id;
        let delivery = match self
            .action(id, DeliveryAction::MarkPickedUp(driver_id))
            .await?
        {
            DeliveryActionResult::MarkPickedUp(delivery) => delivery,
            _ => unreachable!("MarkPickedUp action must return MarkPickedUp result"),
        };

        if let Err(e) = self
            .orders
            .transition_order(delivery.order_id, OrderStatus::PickedUp)
            .await
        {
            warn!(delivery_id = %id, error = %e, "Order transition failed, reverting pickup");
            match self.action(id, DeliveryAction::RevertPickUp(driver_id)).await {
                Ok(DeliveryActionResult::RevertPickUp(true)) => {}
                Ok(_) => warn!(delivery_id = %id, "Pickup was no longer held"),
                Err(undo) => warn!(delivery_id = %id, error = %undo, "Reverting pickup failed"),
            }
            return Err(e.into());
        }

        Ok(delivery)
    }

    /// Completes the delivery.
    ///
    /// The order goes `delivered`, the delivery leaves the pool, and the driver is
    /// credited exactly one [`EarningsRecord`] worth the delivery fee.
    #[instrument(skip(self))]
    pub async fn mark_delivered(
        &self,
        session: &Session,
        id: DeliveryId,
    ) -> Result<EarningsRecord, DeliveryError> {
        session.require(Role::Driver)?;
        let driver_id = session.account_id;
        let delivery = match self
            .action(id, DeliveryAction::ConfirmDropOff(driver_id))
            .await?
        {
            DeliveryActionResult::ConfirmDropOff(delivery) => delivery,
            _ => unreachable!("ConfirmDropOff action must return ConfirmDropOff result"),
        };

        self.orders
            .transition_order(delivery.order_id, OrderStatus::Delivered)
            .await?;
        self.delete(id).await?;

        let record = EarningsRecord::for_delivery(&delivery, Utc::now());
        let earnings = self
            .accounts
            .complete_delivery(driver_id, record.clone())
            .await?;
        info!(delivery_id = %id, %driver_id, amount = %record.amount, %earnings, "Delivery completed");
        Ok(record)
    }

    #[instrument(skip(self))]
    pub async fn earnings_summary(
        &self,
        session: &Session,
        period: Period,
    ) -> Result<EarningsSummary, DeliveryError> {
        let account = self.driver(session).await?;
        let history = account
            .driver()
            .map(|driver| driver.earnings_history.as_slice())
            .unwrap_or_default();
        Ok(EarningsSummary::from_history(history, period, Utc::now()))
    }
}
