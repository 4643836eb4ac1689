use crate::account_actor::{self, AccountError};
use crate::clients::{AccountClient, DeliveryClient, MenuClient, OrderClient};
use crate::config::SystemConfig;
use crate::delivery_actor::{self, DeliveryError};
use crate::lifecycle::{SchedulerHandle, TransitionScheduler};
use crate::menu_actor::{self, MenuError};
use crate::model::{AccountId, OrderId, OrderStatus, Registration, Role, Session};
use crate::order_actor::{self, OrderContext, OrderError};
use crate::sample::default_menu;
use crate::storage::{self, PersistedState, StorageError};
use actor_framework::ActorClient;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};

#[derive(Error, Debug)]
pub enum SystemError {
    #[error(transparent)]
    Account(#[from] AccountError),
    #[error(transparent)]
    Menu(#[from] MenuError),
    #[error(transparent)]
    Order(#[from] OrderError),
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Actor task failed: {0}")]
    TaskFailed(String),
}

/// The running QuickBite system: four resource actors, the transition scheduler and
/// the active session.
///
/// ```rust,ignore
/// let system = QuickBiteSystem::start(SystemConfig::from_env()?).await?;
///
/// let customer = system.register(Registration::customer("Ana", "ana@example.com", "pw")).await?;
/// let menu = system.menu.browse_restaurants().await?;
/// system.menu.add_to_cart(&customer, menu[0].items[0].id).await?;
/// let order = system.orders.place_order(&customer, PaymentMethod::Card).await?;
///
/// system.shutdown().await?;
/// ```
pub struct QuickBiteSystem {
    pub accounts: AccountClient,
    pub menu: MenuClient,
    pub orders: OrderClient,
    pub deliveries: DeliveryClient,

    active_session: Mutex<Option<AccountId>>,
    save_lock: tokio::sync::Mutex<()>,
    scheduler: SchedulerHandle,
    scheduler_task: JoinHandle<()>,
    handles: Vec<JoinHandle<()>>,
    config: SystemConfig,
}

impl QuickBiteSystem {
    /// Spawns every actor and restores the state file when one is configured and present.
    pub async fn start(config: SystemConfig) -> Result<Self, SystemError> {
        let capacity = config.channel_capacity;

        let (account_actor, accounts) = account_actor::new(capacity);
        let (menu_actor, menu) = menu_actor::new(capacity, accounts.clone());
        let (delivery_actor, delivery_inner) = delivery_actor::new(capacity);
        let (order_actor, orders) = order_actor::new(capacity, accounts.clone(), config.delivery_fee);

        let (scheduler, scheduler_handle) =
            TransitionScheduler::new(capacity, orders.inner().clone());
        let orders = match config.auto_accept {
            Some(delay) => orders.with_auto_accept(scheduler_handle.clone(), delay),
            None => orders,
        };
        let deliveries = DeliveryClient::new(delivery_inner.clone(), accounts.clone(), orders.clone());

        let order_context = OrderContext::new(accounts.clone(), delivery_inner, config.delivery_fee);
        let handles = vec![
            tokio::spawn(account_actor.run(())),
            tokio::spawn(menu_actor.run(())),
            tokio::spawn(delivery_actor.run(())),
            tokio::spawn(order_actor.run(order_context)),
        ];
        let scheduler_task = tokio::spawn(scheduler.run());

        let system = Self {
            accounts,
            menu,
            orders,
            deliveries,
            active_session: Mutex::new(None),
            save_lock: tokio::sync::Mutex::new(()),
            scheduler: scheduler_handle,
            scheduler_task,
            handles,
            config,
        };

        if let Some(path) = &system.config.state_path {
            if let Some(state) = storage::load(path).await? {
                system.restore(state).await?;
            }
        }
        info!(
            delivery_fee = %system.config.delivery_fee,
            auto_accept = ?system.config.auto_accept,
            "System started"
        );
        Ok(system)
    }

    async fn restore(&self, state: PersistedState) -> Result<(), SystemError> {
        self.accounts
            .inner()
            .seed(state.accounts)
            .await
            .map_err(AccountError::from_framework)?;
        self.menu
            .inner()
            .seed(state.menu_items)
            .await
            .map_err(MenuError::from_framework)?;
        let pending: Vec<OrderId> = state
            .orders
            .iter()
            .filter(|order| order.status == OrderStatus::Pending)
            .map(|order| order.id)
            .collect();
        self.orders
            .inner()
            .seed(state.orders)
            .await
            .map_err(OrderError::from_framework)?;
        self.deliveries
            .inner()
            .seed(state.deliveries)
            .await
            .map_err(DeliveryError::from_framework)?;
        self.set_active(state.active_session_account_id);

        // Timers do not survive a restart; pending orders get a fresh one.
        if let Some(delay) = self.config.auto_accept {
            for id in pending {
                self.scheduler
                    .schedule(id, OrderStatus::Pending, OrderStatus::Preparing, delay)
                    .await;
            }
        }
        Ok(())
    }

    fn set_active(&self, id: Option<AccountId>) {
        *self
            .active_session
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = id;
    }

    fn active(&self) -> Option<AccountId> {
        *self
            .active_session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers an account and makes it the active session. Restaurants start with the
    /// default menu.
    #[instrument(skip(self))]
    pub async fn register(&self, registration: Registration) -> Result<Session, SystemError> {
        let id = self.accounts.register(registration).await?;
        let account = self
            .accounts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AccountError::NotFound(id.to_string()))?;

        if account.role() == Role::Restaurant {
            self.menu.add_default_menu(id, default_menu()).await?;
        }

        let session = Session::for_account(&account);
        self.set_active(Some(session.account_id));
        Ok(session)
    }

    #[instrument(skip(self, password))]
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Session, AccountError> {
        let account = self.accounts.authenticate(email, password, role).await?;
        let session = Session::for_account(&account);
        self.set_active(Some(session.account_id));
        Ok(session)
    }

    /// Clears the active session if it belongs to `session`, so
    /// [`resume_session`](Self::resume_session) no longer returns it. The `Session`
    /// value itself stays usable; see [`Session`].
    pub fn logout(&self, session: &Session) {
        let mut active = self
            .active_session
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if *active == Some(session.account_id) {
            *active = None;
            info!(account_id = %session.account_id, "Logged out");
        }
    }

    /// Re-derives the session from the active account id, e.g. after a restart.
    pub async fn resume_session(&self) -> Result<Option<Session>, AccountError> {
        let Some(id) = self.active() else {
            return Ok(None);
        };
        match self.accounts.find_by_id(id).await? {
            Some(account) => Ok(Some(Session::for_account(&account))),
            None => {
                warn!(account_id = %id, "Active session refers to a missing account");
                self.set_active(None);
                Ok(None)
            }
        }
    }

    pub async fn snapshot(&self) -> Result<PersistedState, SystemError> {
        Ok(PersistedState {
            accounts: self.accounts.list().await?,
            menu_items: self.menu.list().await?,
            orders: self.orders.list().await?,
            deliveries: self.deliveries.list().await?,
            active_session_account_id: self.active(),
        })
    }

    /// Writes the state file. A no-op without a configured path.
    ///
    /// Concurrent calls are serialized, so the file always ends with the snapshot
    /// taken last.
    pub async fn save_state(&self) -> Result<(), SystemError> {
        let Some(path) = &self.config.state_path else {
            return Ok(());
        };
        let _guard = self.save_lock.lock().await;
        let state = self.snapshot().await?;
        storage::save(path, &state).await?;
        Ok(())
    }

    /// Stops the scheduler, saves state, then lets every actor drain and exit.
    pub async fn shutdown(mut self) -> Result<(), SystemError> {
        info!("Shutting down system...");

        self.scheduler.shutdown().await;
        if let Err(e) = (&mut self.scheduler_task).await {
            error!("Scheduler task failed: {:?}", e);
        }

        let saved = self.save_state().await;

        drop(self.deliveries);
        drop(self.orders);
        drop(self.menu);
        drop(self.accounts);
        drop(self.scheduler);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(SystemError::TaskFailed(e.to_string()));
            }
        }

        saved?;
        info!("System shutdown complete.");
        Ok(())
    }
}
