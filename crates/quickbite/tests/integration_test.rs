use actor_framework::ActorClient;
use quickbite::account_actor::AccountError;
use quickbite::config::SystemConfig;
use quickbite::delivery_actor::DeliveryError;
use quickbite::lifecycle::{QuickBiteSystem, SystemError};
use quickbite::model::{
    MenuItem, MenuItemDraft, OrderId, OrderStatus, PaymentMethod, Period, Registration, Role,
    Session,
};
use quickbite::order_actor::OrderError;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::time::Duration;

fn manual_config() -> SystemConfig {
    SystemConfig {
        auto_accept: None,
        ..SystemConfig::default()
    }
}

struct Cast {
    restaurant: Session,
    driver: Session,
    customer: Session,
}

async fn register_cast(system: &QuickBiteSystem) -> Cast {
    let restaurant = system
        .register(Registration::restaurant(
            "Luigi",
            "luigi@example.com",
            "pizza",
            "Luigi's",
            "1 Harbour Street",
        ))
        .await
        .unwrap();
    let driver = system
        .register(Registration::driver("Dev", "dev@example.com", "wheels", "Bike", "DL-204"))
        .await
        .unwrap();
    let customer = system
        .register(Registration::customer("Ana", "ana@example.com", "secret"))
        .await
        .unwrap();
    Cast {
        restaurant,
        driver,
        customer,
    }
}

async fn menu_item(system: &QuickBiteSystem, cast: &Cast, name: &str) -> MenuItem {
    system
        .menu
        .restaurant_menu(cast.restaurant.account_id)
        .await
        .unwrap()
        .into_iter()
        .find(|item| item.name == name)
        .unwrap()
}

async fn place_pizza_order(system: &QuickBiteSystem, cast: &Cast) -> OrderId {
    let pizza = menu_item(system, cast, "Margherita Pizza").await;
    system.menu.add_to_cart(&cast.customer, pizza.id).await.unwrap();
    system
        .orders
        .place_order(&cast.customer, PaymentMethod::Card)
        .await
        .unwrap()
        .id
}

async fn make_ready(system: &QuickBiteSystem, cast: &Cast, order_id: OrderId) {
    system.orders.accept_order(&cast.restaurant, order_id).await.unwrap();
    system.orders.mark_ready(&cast.restaurant, order_id).await.unwrap();
}

async fn order_status(system: &QuickBiteSystem, order_id: OrderId) -> OrderStatus {
    system.orders.order(order_id).await.unwrap().unwrap().status
}

fn scratch_state_path() -> PathBuf {
    std::env::temp_dir().join(format!("quickbite-{}.json", uuid::Uuid::new_v4()))
}

#[tokio::test]
async fn test_projections_agree_after_transition() {
    let system = QuickBiteSystem::start(manual_config()).await.unwrap();
    let cast = register_cast(&system).await;
    let order_id = place_pizza_order(&system, &cast).await;

    system
        .orders
        .transition_order(order_id, OrderStatus::Preparing)
        .await
        .unwrap();

    let direct = system.orders.order(order_id).await.unwrap().unwrap();
    let customer_view = system.orders.customer_orders(&cast.customer).await.unwrap();
    let restaurant_view = system
        .orders
        .restaurant_orders(&cast.restaurant)
        .await
        .unwrap();
    let queue = system.orders.restaurant_queue(&cast.restaurant).await.unwrap();

    assert_eq!(direct.status, OrderStatus::Preparing);
    assert_eq!(customer_view[0].status, OrderStatus::Preparing);
    assert_eq!(restaurant_view[0].status, OrderStatus::Preparing);
    assert_eq!(queue.len(), 1);
    assert_eq!(system.orders.tracking(order_id).await.unwrap().reached_count(), 2);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_checkout_with_empty_cart_mutates_nothing() {
    let system = QuickBiteSystem::start(manual_config()).await.unwrap();
    let cast = register_cast(&system).await;

    let err = system
        .orders
        .place_order(&cast.customer, PaymentMethod::Cash)
        .await
        .unwrap_err();

    assert_eq!(err, OrderError::EmptyCart);
    assert!(system.orders.list().await.unwrap().is_empty());
    assert!(system.deliveries.list().await.unwrap().is_empty());
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_cart_total_is_exact() {
    let system = QuickBiteSystem::start(manual_config()).await.unwrap();
    let cast = register_cast(&system).await;
    let soda = system
        .menu
        .add_menu_item(
            &cast.restaurant,
            MenuItemDraft::new("Soda", "Chilled can", Decimal::new(399, 2), "Drinks"),
        )
        .await
        .unwrap();
    let pizza = menu_item(&system, &cast, "Margherita Pizza").await;

    system.menu.add_to_cart(&cast.customer, pizza.id).await.unwrap();
    system.menu.add_to_cart(&cast.customer, soda.id).await.unwrap();
    system.menu.add_to_cart(&cast.customer, soda.id).await.unwrap();

    let cart = system.orders.cart(&cast.customer).await.unwrap();
    assert_eq!(cart.item_count, 3);
    assert_eq!(cart.total, Decimal::new(2396, 2));

    let order = system
        .orders
        .place_order(&cast.customer, PaymentMethod::Card)
        .await
        .unwrap();
    assert_eq!(order.total, Decimal::new(2396, 2));
    assert!(system.orders.cart(&cast.customer).await.unwrap().lines.is_empty());
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let system = QuickBiteSystem::start(manual_config()).await.unwrap();
    system
        .register(Registration::customer("Ana", "ana@example.com", "secret"))
        .await
        .unwrap();

    let err = system
        .register(Registration::customer("Ana Two", " ANA@example.com ", "other"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SystemError::Account(AccountError::DuplicateEmail(_))
    ));

    let with_email = system
        .accounts
        .list()
        .await
        .unwrap()
        .into_iter()
        .filter(|account| account.has_email("ana@example.com"))
        .count();
    assert_eq!(with_email, 1);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_authenticate_and_sessions() {
    let system = QuickBiteSystem::start(manual_config()).await.unwrap();
    let cast = register_cast(&system).await;

    let err = system
        .authenticate("ana@example.com", "secret", Role::Driver)
        .await
        .unwrap_err();
    assert_eq!(err, AccountError::InvalidCredentials);

    let session = system
        .authenticate("Ana@Example.com", "secret", Role::Customer)
        .await
        .unwrap();
    assert_eq!(session, cast.customer);
    assert_eq!(system.resume_session().await.unwrap(), Some(cast.customer.clone()));

    system.logout(&cast.driver);
    assert!(system.resume_session().await.unwrap().is_some());
    system.logout(&session);
    assert_eq!(system.resume_session().await.unwrap(), None);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_unknown_order_is_not_found() {
    let system = QuickBiteSystem::start(manual_config()).await.unwrap();
    let cast = register_cast(&system).await;
    let order_id = place_pizza_order(&system, &cast).await;

    let missing = OrderId::generate();
    let err = system
        .orders
        .transition_order(missing, OrderStatus::Preparing)
        .await
        .unwrap_err();

    assert_eq!(err, OrderError::NotFound(missing.to_string()));
    let order = system.orders.order(order_id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_skipping_states_is_invalid() {
    let system = QuickBiteSystem::start(manual_config()).await.unwrap();
    let cast = register_cast(&system).await;
    let order_id = place_pizza_order(&system, &cast).await;

    let err = system
        .orders
        .transition_order(order_id, OrderStatus::Delivered)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        OrderError::InvalidTransition {
            from: OrderStatus::Pending,
            to: OrderStatus::Delivered,
        }
    );
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_full_delivery_flow() {
    let system = QuickBiteSystem::start(manual_config()).await.unwrap();
    let cast = register_cast(&system).await;
    let order_id = place_pizza_order(&system, &cast).await;
    make_ready(&system, &cast, order_id).await;

    let pool = system.deliveries.available_deliveries(&cast.driver).await.unwrap();
    assert_eq!(pool.len(), 1);
    let delivery = &pool[0];
    assert_eq!(delivery.order_id, order_id);
    assert_eq!(delivery.restaurant_address, "1 Harbour Street");

    system
        .deliveries
        .accept_delivery(&cast.driver, delivery.id)
        .await
        .unwrap();
    assert!(system
        .deliveries
        .available_deliveries(&cast.driver)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(order_status(&system, order_id).await, OrderStatus::OnTheWay);

    let err = system
        .deliveries
        .mark_delivered(&cast.driver, delivery.id)
        .await
        .unwrap_err();
    assert_eq!(err, DeliveryError::NotPickedUp(delivery.id));

    system
        .deliveries
        .mark_picked_up(&cast.driver, delivery.id)
        .await
        .unwrap();
    assert_eq!(order_status(&system, order_id).await, OrderStatus::PickedUp);

    let record = system
        .deliveries
        .mark_delivered(&cast.driver, delivery.id)
        .await
        .unwrap();
    assert_eq!(record.amount, Decimal::new(299, 2));
    assert_eq!(order_status(&system, order_id).await, OrderStatus::Delivered);
    assert!(system.deliveries.list().await.unwrap().is_empty());
    assert_eq!(
        system.deliveries.active_delivery(&cast.driver).await.unwrap(),
        None
    );

    let driver = system
        .accounts
        .find_by_id(cast.driver.account_id)
        .await
        .unwrap()
        .unwrap();
    let profile = driver.driver().unwrap();
    assert_eq!(profile.earnings_history.len(), 1);
    assert_eq!(profile.completed_deliveries, 1);
    assert_eq!(profile.earnings, Decimal::new(299, 2));

    let summary = system
        .deliveries
        .earnings_summary(&cast.driver, Period::Today)
        .await
        .unwrap();
    assert_eq!(summary.total_deliveries, 1);

    let sales = system
        .orders
        .sales_summary(&cast.restaurant, Period::Week)
        .await
        .unwrap();
    assert_eq!(sales.total_orders, 1);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_driver_holds_one_delivery() {
    let system = QuickBiteSystem::start(manual_config()).await.unwrap();
    let cast = register_cast(&system).await;
    let first = place_pizza_order(&system, &cast).await;
    make_ready(&system, &cast, first).await;
    let second = place_pizza_order(&system, &cast).await;
    make_ready(&system, &cast, second).await;

    let pool = system.deliveries.available_deliveries(&cast.driver).await.unwrap();
    assert_eq!(pool.len(), 2);
    system
        .deliveries
        .accept_delivery(&cast.driver, pool[0].id)
        .await
        .unwrap();

    let err = system
        .deliveries
        .accept_delivery(&cast.driver, pool[1].id)
        .await
        .unwrap_err();
    assert_eq!(err, DeliveryError::DeliveryAlreadyActive(pool[0].id));

    let untouched = system.deliveries.get(pool[1].id).await.unwrap().unwrap();
    assert!(untouched.is_available());
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_rejected_delivery_is_hidden_from_that_driver_only() {
    let system = QuickBiteSystem::start(manual_config()).await.unwrap();
    let cast = register_cast(&system).await;
    let other_driver = system
        .register(Registration::driver("Kim", "kim@example.com", "wheels", "Car", "DL-305"))
        .await
        .unwrap();
    let order_id = place_pizza_order(&system, &cast).await;
    make_ready(&system, &cast, order_id).await;

    let pool = system.deliveries.available_deliveries(&cast.driver).await.unwrap();
    system
        .deliveries
        .reject_delivery(&cast.driver, pool[0].id)
        .await
        .unwrap();

    assert!(system
        .deliveries
        .available_deliveries(&cast.driver)
        .await
        .unwrap()
        .is_empty());
    let err = system
        .deliveries
        .accept_delivery(&cast.driver, pool[0].id)
        .await
        .unwrap_err();
    assert_eq!(err, DeliveryError::Rejected(pool[0].id));
    assert!(system.deliveries.get(pool[0].id).await.unwrap().unwrap().is_available());
    assert_eq!(
        system
            .deliveries
            .available_deliveries(&other_driver)
            .await
            .unwrap()
            .len(),
        1
    );
    system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_auto_accept_moves_pending_order() {
    let config = SystemConfig {
        auto_accept: Some(Duration::from_secs(3)),
        ..SystemConfig::default()
    };
    let system = QuickBiteSystem::start(config).await.unwrap();
    let cast = register_cast(&system).await;
    let order_id = place_pizza_order(&system, &cast).await;

    tokio::time::sleep(Duration::from_secs(5)).await;

    let order = system.orders.order(order_id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Preparing);
    system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_auto_accept_of_cancelled_order_does_nothing() {
    let config = SystemConfig {
        auto_accept: Some(Duration::from_secs(3)),
        ..SystemConfig::default()
    };
    let system = QuickBiteSystem::start(config).await.unwrap();
    let cast = register_cast(&system).await;
    let order_id = place_pizza_order(&system, &cast).await;

    system.orders.reject_order(&cast.restaurant, order_id).await.unwrap();
    tokio::time::sleep(Duration::from_secs(5)).await;

    let order = system.orders.order(order_id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Cancelled);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_state_survives_restart() {
    let path = scratch_state_path();
    let config = SystemConfig {
        state_path: Some(path.clone()),
        ..manual_config()
    };

    let system = QuickBiteSystem::start(config.clone()).await.unwrap();
    let cast = register_cast(&system).await;
    let order_id = place_pizza_order(&system, &cast).await;
    make_ready(&system, &cast, order_id).await;
    let before = system.snapshot().await.unwrap();
    system.shutdown().await.unwrap();

    let system = QuickBiteSystem::start(config).await.unwrap();
    let after = system.snapshot().await.unwrap();

    assert_eq!(after.accounts.len(), 3);
    assert_eq!(after.menu_items.len(), before.menu_items.len());
    assert_eq!(after.orders.len(), 1);
    assert_eq!(after.orders[0].status, OrderStatus::Ready);
    assert_eq!(after.deliveries.len(), 1);
    assert_eq!(
        system.resume_session().await.unwrap(),
        Some(cast.customer.clone())
    );
    system.shutdown().await.unwrap();
    let _ = std::fs::remove_file(&path);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_saves_all_succeed() {
    let path = scratch_state_path();
    let config = SystemConfig {
        state_path: Some(path.clone()),
        ..manual_config()
    };
    let system = QuickBiteSystem::start(config).await.unwrap();
    let cast = register_cast(&system).await;
    place_pizza_order(&system, &cast).await;

    for _ in 0..20 {
        let (a, b, c) = tokio::join!(system.save_state(), system.save_state(), system.save_state());
        a.unwrap();
        b.unwrap();
        c.unwrap();
    }

    let saved = quickbite::storage::load(&path).await.unwrap().unwrap();
    assert_eq!(saved, system.snapshot().await.unwrap());
    system.shutdown().await.unwrap();
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_logout_ends_resume_but_not_the_session_value() {
    let system = QuickBiteSystem::start(manual_config()).await.unwrap();
    let cast = register_cast(&system).await;
    place_pizza_order(&system, &cast).await;
    let pizza = menu_item(&system, &cast, "Margherita Pizza").await;

    system.logout(&cast.customer);
    assert_eq!(system.resume_session().await.unwrap(), None);

    let cart = system.menu.add_to_cart(&cast.customer, pizza.id).await.unwrap();
    assert_eq!(cart.len(), 1);
    system.shutdown().await.unwrap();
}
