//! Demo: one order from cart to doorstep.
//!
//! ```bash
//! RUST_LOG=info cargo run -p quickbite
//! ```

use quickbite::config::SystemConfig;
use quickbite::lifecycle::{setup_tracing, QuickBiteSystem, SystemError};
use quickbite::model::{OrderStatus, PaymentMethod, Period, Registration};
use tracing::{info, Instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let config = SystemConfig::from_env()?;
    let system = QuickBiteSystem::start(config).await?;

    let result = walk_one_order(&system)
        .instrument(tracing::info_span!("demo"))
        .await;
    system.shutdown().await?;
    result?;

    info!("Demo completed successfully");
    Ok(())
}

async fn walk_one_order(system: &QuickBiteSystem) -> Result<(), SystemError> {
    let restaurant = system
        .register(Registration::restaurant(
            "Luigi",
            "luigi@example.com",
            "pizza",
            "Luigi's",
            "1 Harbour Street",
        ))
        .await?;
    let driver = system
        .register(Registration::driver(
            "Dev",
            "dev@example.com",
            "wheels",
            "Bike",
            "DL-204",
        ))
        .await?;
    let customer = system
        .register(Registration::customer("Ana", "ana@example.com", "secret"))
        .await?;

    let menu = system.menu.restaurant_menu(restaurant.account_id).await?;
    for item in menu.iter().take(2) {
        system.menu.add_to_cart(&customer, item.id).await?;
    }
    let cart = system.orders.cart(&customer).await?;
    info!(items = cart.item_count, total = %cart.total, "Cart ready");

    let order = system
        .orders
        .place_order(&customer, PaymentMethod::Card)
        .await?;
    info!(order_id = %order.id, status = %order.status, "Order placed");

    // Skip the auto-accept delay.
    let current = system
        .orders
        .order(order.id)
        .await?
        .map(|o| o.status)
        .unwrap_or(OrderStatus::Pending);
    if current == OrderStatus::Pending {
        system.orders.accept_order(&restaurant, order.id).await?;
    }
    system.orders.mark_ready(&restaurant, order.id).await?;

    let pool = system.deliveries.available_deliveries(&driver).await?;
    info!(available = pool.len(), "Driver pool");
    for delivery in pool.into_iter().filter(|d| d.order_id == order.id) {
        system.deliveries.accept_delivery(&driver, delivery.id).await?;
        system.deliveries.mark_picked_up(&driver, delivery.id).await?;
        let record = system.deliveries.mark_delivered(&driver, delivery.id).await?;
        info!(amount = %record.amount, "Driver paid");
    }

    let tracking = system.orders.tracking(order.id).await?;
    info!(status = %tracking.status, reached = tracking.reached_count(), "Tracking");

    let sales = system.orders.sales_summary(&restaurant, Period::Today).await?;
    info!(orders = sales.total_orders, revenue = %sales.total_revenue, "Sales today");

    let earnings = system
        .deliveries
        .earnings_summary(&driver, Period::Today)
        .await?;
    info!(
        deliveries = earnings.total_deliveries,
        earned = %earnings.total_earnings,
        "Driver earnings today"
    );
    Ok(())
}
