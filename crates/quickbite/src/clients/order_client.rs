//! # Order Client
//!
//! High-level API for the `Order` actor: checkout, status transitions and the
//! customer and restaurant projections.
//!
//! Every projection is computed from the one stored copy of each order, so after a
//! transition succeeds the customer list, the restaurant queue and a direct lookup all
//! report the new status.
use crate::clients::AccountClient;
use crate::lifecycle::SchedulerHandle;
use crate::model::{
    CartView, Order, OrderCheckout, OrderId, OrderStatus, PaymentMethod, Period, Role,
    SalesSummary, Session, Tracking,
};
use crate::order_actor::{OrderAction, OrderActionResult, OrderError};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::{debug, info, instrument};

#[derive(Clone)]
struct AutoAccept {
    scheduler: SchedulerHandle,
    delay: Duration,
}

/// Client for interacting with the Order actor.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    accounts: AccountClient,
    delivery_fee: Decimal,
    auto_accept: Option<AutoAccept>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>, accounts: AccountClient, delivery_fee: Decimal) -> Self {
        Self {
            inner,
            accounts,
            delivery_fee,
            auto_accept: None,
        }
    }

    /// Schedules `pending -> preparing` for every new order after `delay`, and routes
    /// cancellations of terminal orders to `scheduler`.
    pub fn with_auto_accept(mut self, scheduler: SchedulerHandle, delay: Duration) -> Self {
        self.auto_accept = Some(AutoAccept { scheduler, delay });
        self
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        OrderError::from_framework(e)
    }
}

impl OrderClient {
    /// The customer's cart priced with the configured delivery fee.
    #[instrument(skip(self))]
    pub async fn cart(&self, session: &Session) -> Result<CartView, OrderError> {
        let lines = self.accounts.cart(session).await?;
        Ok(CartView::new(lines, self.delivery_fee))
    }

    /// Checks out the customer's cart.
    ///
    /// The order actor drains the cart in a single account request and prices the order
    /// from the drained lines. With an empty cart this fails with `EmptyCart` and
    /// nothing changes.
    #[instrument(skip(self))]
    pub async fn place_order(
        &self,
        session: &Session,
        payment_method: PaymentMethod,
    ) -> Result<Order, OrderError> {
        session.require(Role::Customer)?;
        info!("Sending place_order to actor");

        let id = self
            .inner
            .create(OrderCheckout {
                customer_id: session.account_id,
                payment_method,
            })
            .await
            .map_err(Self::map_error)?;
        let order = self.find(id).await?;

        if let Some(auto) = &self.auto_accept {
            auto.scheduler
                .schedule(id, OrderStatus::Pending, OrderStatus::Preparing, auto.delay)
                .await;
        }
        info!(order_id = %id, total = %order.total, "Order placed");
        Ok(order)
    }

    async fn transition(
        &self,
        id: OrderId,
        to: OrderStatus,
        expected: Option<OrderStatus>,
    ) -> Result<Order, OrderError> {
        let order = match self
            .inner
            .perform_action(id, OrderAction::Transition { to, expected })
            .await
            .map_err(Self::map_error)?
        {
            OrderActionResult::Transition(order) => order,
        };

        if order.status.is_terminal() {
            if let Some(auto) = &self.auto_accept {
                auto.scheduler.cancel(id).await;
            }
        }
        debug!(order_id = %id, status = %order.status, "Transitioned");
        Ok(order)
    }

    /// Moves the order to `to`.
    ///
    /// # Errors
    /// `NotFound` for an unknown id; `InvalidTransition` for an edge outside the
    /// transition table. Either way the store is unchanged.
    #[instrument(skip(self))]
    pub async fn transition_order(&self, id: OrderId, to: OrderStatus) -> Result<Order, OrderError> {
        self.transition(id, to, None).await
    }

    /// Like [`transition_order`](Self::transition_order), but fails with `StaleStatus`
    /// unless the order is currently `expected`.
    #[instrument(skip(self))]
    pub async fn transition_order_if(
        &self,
        id: OrderId,
        expected: OrderStatus,
        to: OrderStatus,
    ) -> Result<Order, OrderError> {
        self.transition(id, to, Some(expected)).await
    }

    async fn find(&self, id: OrderId) -> Result<Order, OrderError> {
        self.get(id)
            .await?
            .ok_or_else(|| OrderError::NotFound(id.to_string()))
    }

    async fn owned_by(&self, session: &Session, id: OrderId) -> Result<Order, OrderError> {
        session.require(Role::Restaurant)?;
        let order = self.find(id).await?;
        if order.restaurant_id != session.account_id {
            return Err(OrderError::NotOwner(id));
        }
        Ok(order)
    }

    #[instrument(skip(self))]
    pub async fn accept_order(&self, session: &Session, id: OrderId) -> Result<Order, OrderError> {
        self.owned_by(session, id).await?;
        self.transition_order(id, OrderStatus::Preparing).await
    }

    #[instrument(skip(self))]
    pub async fn reject_order(&self, session: &Session, id: OrderId) -> Result<Order, OrderError> {
        self.owned_by(session, id).await?;
        self.transition_order(id, OrderStatus::Cancelled).await
    }

    /// Marks the order ready, which puts its delivery in the driver pool.
    #[instrument(skip(self))]
    pub async fn mark_ready(&self, session: &Session, id: OrderId) -> Result<Order, OrderError> {
        self.owned_by(session, id).await?;
        self.transition_order(id, OrderStatus::Ready).await
    }

    // --- Projections ---

    /// Looks up one order.
    #[instrument(skip(self))]
    pub async fn order(&self, id: OrderId) -> Result<Option<Order>, OrderError> {
        self.get(id).await
    }

    async fn newest_first(&self, keep: impl Fn(&Order) -> bool) -> Result<Vec<Order>, OrderError> {
        let mut orders: Vec<Order> = self.list().await?.into_iter().filter(|o| keep(o)).collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    /// The customer's orders, newest first.
    #[instrument(skip(self))]
    pub async fn customer_orders(&self, session: &Session) -> Result<Vec<Order>, OrderError> {
        session.require(Role::Customer)?;
        self.newest_first(|order| order.customer_id == session.account_id)
            .await
    }

    /// Every order placed with the restaurant, newest first.
    #[instrument(skip(self))]
    pub async fn restaurant_orders(&self, session: &Session) -> Result<Vec<Order>, OrderError> {
        session.require(Role::Restaurant)?;
        self.newest_first(|order| order.restaurant_id == session.account_id)
            .await
    }

    /// Orders the restaurant still has to act on: pending or preparing.
    #[instrument(skip(self))]
    pub async fn restaurant_queue(&self, session: &Session) -> Result<Vec<Order>, OrderError> {
        session.require(Role::Restaurant)?;
        self.newest_first(|order| {
            order.restaurant_id == session.account_id && order.status.is_in_kitchen()
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn tracking(&self, id: OrderId) -> Result<Tracking, OrderError> {
        Ok(Tracking::of(&self.find(id).await?))
    }

    #[instrument(skip(self))]
    pub async fn sales_summary(
        &self,
        session: &Session,
        period: Period,
    ) -> Result<SalesSummary, OrderError> {
        let orders = self.restaurant_orders(session).await?;
        Ok(SalesSummary::from_orders(orders, period, Utc::now()))
    }
}
