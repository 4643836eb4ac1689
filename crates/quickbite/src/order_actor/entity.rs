//! ActorEntity implementation for [`Order`].
//!
//! Two hooks reach into other actors through [`OrderContext`]:
//!
//! - `on_create` drains the customer's cart in one account request and prices the
//!   order from the drained lines. An empty cart fails the create and nothing changes.
//! - `handle_action` spawns the delivery when an order becomes `ready`. The delivery is
//!   created before the status is written, so a failed spawn leaves the order as it was.

use super::actions::{OrderAction, OrderActionResult};
use super::error::OrderError;
use crate::account_actor::AccountError;
use crate::clients::AccountClient;
use crate::delivery_actor::DeliveryError;
use crate::model::{
    subtotal, AccountId, Delivery, DeliveryCreate, Order, OrderCheckout, OrderId, OrderStatus,
    Profile,
};
use actor_framework::{ActorEntity, ResourceClient};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

/// Dependencies of the order actor.
///
/// Holds no order client of its own, so the account and delivery actors can shut down
/// independently of the order actor.
#[derive(Clone)]
pub struct OrderContext {
    pub accounts: AccountClient,
    pub deliveries: ResourceClient<Delivery>,
    pub delivery_fee: Decimal,
}

impl OrderContext {
    pub fn new(
        accounts: AccountClient,
        deliveries: ResourceClient<Delivery>,
        delivery_fee: Decimal,
    ) -> Self {
        Self {
            accounts,
            deliveries,
            delivery_fee,
        }
    }
}

impl Order {
    /// Builds the delivery for this order and adds it to the pool.
    async fn spawn_delivery(&self, ctx: &OrderContext) -> Result<(), OrderError> {
        let restaurant = ctx
            .accounts
            .find_by_id(self.restaurant_id)
            .await?
            .ok_or_else(|| AccountError::NotFound(self.restaurant_id.to_string()))?;
        let restaurant_address = match restaurant.profile {
            Profile::Restaurant { address, .. } => address,
            _ => String::new(),
        };

        let delivery_id = ctx
            .deliveries
            .create(DeliveryCreate {
                order_id: self.id,
                restaurant_id: self.restaurant_id,
                restaurant_name: self.restaurant_name.clone(),
                restaurant_address,
                customer_id: self.customer_id,
                customer_name: self.customer_name.clone(),
                order_total: self.total,
                delivery_fee: self.delivery_fee,
            })
            .await
            .map_err(DeliveryError::from_framework)?;
        debug!(order_id = %self.id, %delivery_id, "Delivery spawned");
        Ok(())
    }
}

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCheckout;
    type Update = ();
    type Action = OrderAction;
    type ActionResult = OrderActionResult;
    type Context = OrderContext;
    type Error = OrderError;

    fn id(&self) -> &OrderId {
        &self.id
    }

    /// Starts a pending order. Items, restaurant and amounts are filled in by
    /// `on_create` from the drained cart.
    fn from_create_params(id: OrderId, params: OrderCheckout) -> Result<Self, Self::Error> {
        let now = Utc::now();
        Ok(Self {
            id,
            customer_id: params.customer_id,
            customer_name: String::new(),
            restaurant_id: AccountId::from_uuid(Uuid::nil()),
            restaurant_name: String::new(),
            items: Vec::new(),
            subtotal: Decimal::ZERO,
            delivery_fee: Decimal::ZERO,
            total: Decimal::ZERO,
            payment_method: params.payment_method,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    async fn on_create(&mut self, ctx: &OrderContext) -> Result<(), Self::Error> {
        let taken = ctx
            .accounts
            .take_cart(self.customer_id)
            .await
            .map_err(|e| match e {
                AccountError::EmptyCart => OrderError::EmptyCart,
                other => OrderError::Account(other),
            })?;
        let first = taken.lines.first().ok_or(OrderError::EmptyCart)?;

        self.restaurant_id = first.restaurant_id;
        self.restaurant_name = first.restaurant_name.clone();
        self.customer_name = taken.customer_name;
        self.subtotal = subtotal(&taken.lines);
        self.delivery_fee = ctx.delivery_fee;
        self.total = self.subtotal + self.delivery_fee;
        self.items = taken.lines;
        Ok(())
    }

    async fn on_update(&mut self, _update: (), _ctx: &OrderContext) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: OrderAction,
        ctx: &OrderContext,
    ) -> Result<OrderActionResult, Self::Error> {
        match action {
            OrderAction::Transition { to, expected } => {
                if let Some(expected) = expected {
                    if self.status != expected {
                        return Err(OrderError::StaleStatus {
                            expected,
                            actual: self.status,
                        });
                    }
                }
                if !self.status.can_transition_to(to) {
                    return Err(OrderError::InvalidTransition {
                        from: self.status,
                        to,
                    });
                }
                if to == OrderStatus::Ready {
                    self.spawn_delivery(ctx).await?;
                }

                self.status = to;
                self.updated_at = Utc::now();
                Ok(OrderActionResult::Transition(self.clone()))
            }
        }
    }
}
