//! Scripted demo of a full order: the customer orders and pays, the kitchen
//! cooks, the owner checks the till.

use restaurant_orders::clients::LedgerAccess;
use restaurant_orders::config::Config;
use restaurant_orders::ledger::StatusFilter;
use restaurant_orders::lifecycle::{setup_tracing, OrderSystem};
use restaurant_orders::model::{MenuItemId, OrderStatus};
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = Config::from_env().map_err(|e| e.to_string())?;
    info!(?config, "Starting restaurant order system");

    let mut system = OrderSystem::new(config);

    // Customer: fill the cart and check out
    let span = tracing::info_span!("customer");
    let order = async {
        let customer = &mut system.customer_client;
        customer.add_item(MenuItemId(1));
        customer.add_item(MenuItemId(1));
        customer.add_item(MenuItemId(5));
        info!(total = ?customer.cart_total(), "Cart ready");
        customer.place_order().await
    }
    .instrument(span.clone())
    .await
    .map_err(|e| e.to_string())?;

    info!(id = %order.id, total = order.total, "Order created");

    let payment = system
        .customer_client
        .pay("Asha Verma", "4111 1111 1111 1111")
        .instrument(span)
        .await;
    match payment {
        Ok(paid) => info!(id = %paid.id, "Payment accepted"),
        Err(e) => error!(error = %e, "Payment failed"),
    }

    // Kitchen: walk the order to completed
    let span = tracing::info_span!("kitchen");
    async {
        while let Some(current) = system
            .kitchen_client
            .active_orders()
            .await
            .map_err(|e| e.to_string())?
            .into_iter()
            .find(|o| o.id == order.id)
        {
            info!(id = %current.id, status = %current.status, "Cooking");
            system
                .kitchen_client
                .advance(current.id)
                .await
                .map_err(|e| e.to_string())?;
        }
        Ok::<(), String>(())
    }
    .instrument(span)
    .await?;

    // Owner: review the ledger and totals
    let owner = &system.owner_client;
    let completed = owner
        .orders(StatusFilter::Only(OrderStatus::Completed))
        .await
        .map_err(|e| e.to_string())?;
    let totals = owner.totals().await.map_err(|e| e.to_string())?;
    info!(
        completed = completed.len(),
        orders = totals.order_count,
        revenue = totals.total_revenue,
        paid = totals.paid_revenue,
        unpaid = totals.unpaid_revenue,
        "Owner dashboard"
    );

    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
