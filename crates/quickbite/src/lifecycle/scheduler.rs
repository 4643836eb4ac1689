//! # Transition Scheduler
//!
//! Deferred, cancellable order transitions, such as a restaurant accepting a new
//! order a few seconds after it was placed.
//!
//! The scheduler is a small actor of its own. It owns one timer task per scheduled
//! transition, keyed by order id. A timer applies its transition with an expected
//! status, so a timer that fires after the order has moved on is a logged no-op
//! rather than a second write.
//!
//! ```rust,ignore
//! let (scheduler, handle) = TransitionScheduler::new(32, orders.inner().clone());
//! tokio::spawn(scheduler.run());
//!
//! handle
//!     .schedule(order_id, OrderStatus::Pending, OrderStatus::Preparing, Duration::from_secs(3))
//!     .await;
//! // The order was rejected in the meantime:
//! handle.cancel(order_id).await;
//! ```
//!
//! Timers hold a client of the order actor. [`SchedulerHandle::shutdown`] aborts them
//! and ends the scheduler, so it must run before the order actor is expected to stop.

use crate::model::{Order, OrderId, OrderStatus};
use crate::order_actor::{OrderAction, OrderError};
use actor_framework::ResourceClient;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug)]
pub enum SchedulerCommand {
    Schedule {
        order_id: OrderId,
        expected: OrderStatus,
        to: OrderStatus,
        delay: Duration,
    },
    /// Aborts every pending timer of the order.
    Cancel { order_id: OrderId },
    /// Number of timers that have not fired yet.
    Pending { respond_to: oneshot::Sender<usize> },
    Shutdown,
}

pub struct TransitionScheduler {
    receiver: mpsc::Receiver<SchedulerCommand>,
    orders: ResourceClient<Order>,
    timers: HashMap<OrderId, Vec<JoinHandle<()>>>,
}

/// Cloneable sending half of the scheduler.
#[derive(Clone)]
pub struct SchedulerHandle {
    sender: mpsc::Sender<SchedulerCommand>,
}

impl TransitionScheduler {
    pub fn new(capacity: usize, orders: ResourceClient<Order>) -> (Self, SchedulerHandle) {
        let (sender, receiver) = mpsc::channel(capacity);
        let scheduler = Self {
            receiver,
            orders,
            timers: HashMap::new(),
        };
        (scheduler, SchedulerHandle { sender })
    }

    /// Serves commands until `Shutdown` or until every handle is dropped, then aborts
    /// the timers that are still pending.
    pub async fn run(mut self) {
        info!("Scheduler started");

        while let Some(command) = self.receiver.recv().await {
            self.prune();
            match command {
                SchedulerCommand::Schedule {
                    order_id,
                    expected,
                    to,
                    delay,
                } => {
                    debug!(%order_id, %expected, %to, ?delay, "Schedule");
                    let timer = tokio::spawn(fire(
                        self.orders.clone(),
                        order_id,
                        expected,
                        to,
                        delay,
                    ));
                    self.timers.entry(order_id).or_default().push(timer);
                }
                SchedulerCommand::Cancel { order_id } => {
                    if let Some(timers) = self.timers.remove(&order_id) {
                        debug!(%order_id, count = timers.len(), "Cancel");
                        timers.iter().for_each(JoinHandle::abort);
                    }
                }
                SchedulerCommand::Pending { respond_to } => {
                    let _ = respond_to.send(self.timers.values().map(Vec::len).sum());
                }
                SchedulerCommand::Shutdown => break,
            }
        }

        let aborted: usize = self.timers.values().map(Vec::len).sum();
        self.timers
            .drain()
            .flat_map(|(_, timers)| timers)
            .for_each(|timer| timer.abort());
        info!(aborted, "Scheduler stopped");
    }

    fn prune(&mut self) {
        self.timers.retain(|_, timers| {
            timers.retain(|timer| !timer.is_finished());
            !timers.is_empty()
        });
    }
}

async fn fire(
    orders: ResourceClient<Order>,
    order_id: OrderId,
    expected: OrderStatus,
    to: OrderStatus,
    delay: Duration,
) {
    tokio::time::sleep(delay).await;

    let result = orders
        .perform_action(
            order_id,
            OrderAction::Transition {
                to,
                expected: Some(expected),
            },
        )
        .await
        .map_err(OrderError::from_framework);

    match result {
        Ok(_) => info!(%order_id, from = %expected, %to, "Deferred transition applied"),
        Err(OrderError::StaleStatus { actual, .. }) => {
            debug!(%order_id, %expected, %actual, "Deferred transition skipped")
        }
        Err(e) => warn!(%order_id, error = %e, "Deferred transition failed"),
    }
}

impl SchedulerHandle {
    /// Applies `expected -> to` on the order after `delay`, if it is still `expected`.
    pub async fn schedule(
        &self,
        order_id: OrderId,
        expected: OrderStatus,
        to: OrderStatus,
        delay: Duration,
    ) {
        let command = SchedulerCommand::Schedule {
            order_id,
            expected,
            to,
            delay,
        };
        if self.sender.send(command).await.is_err() {
            warn!(%order_id, "Scheduler stopped, transition not scheduled");
        }
    }

    pub async fn cancel(&self, order_id: OrderId) {
        let _ = self.sender.send(SchedulerCommand::Cancel { order_id }).await;
    }

    /// Number of pending timers; zero once the scheduler has stopped.
    pub async fn pending(&self) -> usize {
        let (respond_to, response) = oneshot::channel();
        if self
            .sender
            .send(SchedulerCommand::Pending { respond_to })
            .await
            .is_err()
        {
            return 0;
        }
        response.await.unwrap_or(0)
    }

    pub async fn shutdown(&self) {
        let _ = self.sender.send(SchedulerCommand::Shutdown).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::AccountClient;
    use crate::model::{AccountId, PaymentMethod};
    use crate::order_actor::OrderContext;
    use actor_framework::mock::{create_mock_client, expect_action};
    use actor_framework::{ActorClient, FrameworkError};
    use rust_decimal::Decimal;

    type Unattended = (
        mpsc::Receiver<actor_framework::ResourceRequest<crate::model::Account>>,
        mpsc::Receiver<actor_framework::ResourceRequest<crate::model::Delivery>>,
    );

    /// Spawns a real order actor with one pending order seeded into its store. The
    /// actor's dependencies are channels nobody answers; these tests never reach them.
    async fn orders_with_pending_order() -> (ResourceClient<Order>, OrderId, Unattended) {
        let (accounts, accounts_rx) = create_mock_client(4);
        let (deliveries, deliveries_rx) = create_mock_client(4);

        let (actor, client) =
            crate::order_actor::new(8, AccountClient::new(accounts.clone()), Decimal::ZERO);
        tokio::spawn(actor.run(OrderContext::new(
            AccountClient::new(accounts),
            deliveries,
            Decimal::new(299, 2),
        )));

        let now = chrono::Utc::now();
        let order = Order {
            id: OrderId::generate(),
            customer_id: AccountId::generate(),
            customer_name: "Ana".into(),
            restaurant_id: AccountId::generate(),
            restaurant_name: "Luigi's".into(),
            items: Vec::new(),
            subtotal: Decimal::ZERO,
            delivery_fee: Decimal::new(299, 2),
            total: Decimal::new(299, 2),
            payment_method: PaymentMethod::Card,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        let id = order.id;
        client.inner().seed(vec![order]).await.unwrap();
        (client.inner().clone(), id, (accounts_rx, deliveries_rx))
    }

    async fn status(orders: &ResourceClient<Order>, id: OrderId) -> OrderStatus {
        orders.get(id).await.unwrap().unwrap().status
    }

    #[tokio::test(start_paused = true)]
    async fn test_deferred_transition_fires_after_delay() {
        let (orders, id, _unattended) = orders_with_pending_order().await;
        let (scheduler, handle) = TransitionScheduler::new(8, orders.clone());
        tokio::spawn(scheduler.run());

        handle
            .schedule(id, OrderStatus::Pending, OrderStatus::Preparing, Duration::from_secs(3))
            .await;
        assert_eq!(handle.pending().await, 1);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(status(&orders, id).await, OrderStatus::Pending);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(status(&orders, id).await, OrderStatus::Preparing);
        assert_eq!(handle.pending().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_timer_is_a_no_op() {
        let (orders, id, _unattended) = orders_with_pending_order().await;
        let (scheduler, handle) = TransitionScheduler::new(8, orders.clone());
        tokio::spawn(scheduler.run());

        handle
            .schedule(id, OrderStatus::Pending, OrderStatus::Preparing, Duration::from_secs(3))
            .await;
        // The restaurant rejects the order before the timer fires.
        orders
            .perform_action(
                id,
                OrderAction::Transition {
                    to: OrderStatus::Cancelled,
                    expected: None,
                },
            )
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(status(&orders, id).await, OrderStatus::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_aborts_timer() {
        let (orders, id, _unattended) = orders_with_pending_order().await;
        let (scheduler, handle) = TransitionScheduler::new(8, orders.clone());
        tokio::spawn(scheduler.run());

        handle
            .schedule(id, OrderStatus::Pending, OrderStatus::Preparing, Duration::from_secs(3))
            .await;
        handle.cancel(id).await;
        assert_eq!(handle.pending().await, 0);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(status(&orders, id).await, OrderStatus::Pending);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_aborts_pending_timers() {
        let (orders, id, _unattended) = orders_with_pending_order().await;
        let (scheduler, handle) = TransitionScheduler::new(8, orders.clone());
        let task = tokio::spawn(scheduler.run());

        handle
            .schedule(id, OrderStatus::Pending, OrderStatus::Preparing, Duration::from_secs(3))
            .await;
        handle.shutdown().await;
        task.await.unwrap();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(status(&orders, id).await, OrderStatus::Pending);
        assert_eq!(handle.pending().await, 0);
    }

    #[tokio::test]
    async fn test_unknown_order_is_logged_not_fatal() {
        let (orders, mut receiver) = create_mock_client::<Order>(4);
        let (scheduler, handle) = TransitionScheduler::new(8, orders);
        tokio::spawn(scheduler.run());

        let missing = OrderId::generate();
        handle
            .schedule(missing, OrderStatus::Pending, OrderStatus::Preparing, Duration::ZERO)
            .await;

        let (id, _action, responder) = expect_action(&mut receiver)
            .await
            .expect("Expected Action request");
        assert_eq!(id, missing);
        responder
            .send(Err(FrameworkError::NotFound(missing.to_string())))
            .unwrap();

        // The scheduler keeps serving after the failed timer.
        let next = OrderId::generate();
        handle
            .schedule(next, OrderStatus::Pending, OrderStatus::Preparing, Duration::ZERO)
            .await;
        let (id, _action, _responder) = expect_action(&mut receiver)
            .await
            .expect("Expected Action request");
        assert_eq!(id, next);
    }
}
