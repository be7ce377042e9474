//! Order command handler.
//!
//! Placing orders and moving them through the delivery lifecycle.

use anyhow::Result;

use lorma_core::{NewOrder, Order};

use crate::bootstrap::CliContext;
use crate::commands::OrderCommand;
use crate::presentation::{
    display_order, format_instant, format_optional, print_separator, truncate_string,
};
use crate::utils::input;

/// Execute an order subcommand.
pub async fn execute(ctx: &CliContext, command: OrderCommand) -> Result<()> {
    let actor = ctx.login().await?;
    let orders = ctx.app().orders();

    match command {
        OrderCommand::Place { restaurant, items } => {
            let order = orders
                .place(
                    &actor,
                    NewOrder {
                        restaurant,
                        lines: items,
                    },
                )
                .await?;
            println!("✓ Placed order #{}.\n", order.id);
            display_order(&order);
        }
        OrderCommand::List { state } => {
            let list = orders.list_for(&actor, state).await?;
            print_orders(&list);
        }
        OrderCommand::Show { id } => {
            let order = orders.get(&actor, id).await?;
            display_order(&order);
        }
        OrderCommand::Ready { id } => {
            let order = orders.mark_ready(&actor, id).await?;
            println!("✓ Order #{} is ready for pickup.", order.id);
        }
        OrderCommand::Accept { id } => {
            let order = orders.accept(&actor, id).await?;
            println!(
                "✓ Order #{} accepted. Pick it up at {}.",
                order.id, order.restaurant
            );
        }
        OrderCommand::Deliver { id } => {
            let order = orders.deliver(&actor, id).await?;
            println!(
                "✓ Order #{} delivered. € {} shipping credited to {}.",
                order.id, order.shipping_rate, actor.username
            );
        }
        OrderCommand::Cancel { id, force } => {
            if !force {
                let order = orders.get(&actor, id).await?;
                display_order(&order);
                println!();
                if !input::prompt_confirmation("Cancel this order and refund the client?")? {
                    println!("Order left unchanged.");
                    return Ok(());
                }
            }
            let order = orders.cancel(&actor, id).await?;
            let refund = order
                .total()
                .map_or_else(|_| "the full amount".to_string(), |t| format!("€ {t}"));
            println!("✓ Order #{} cancelled, {} refunded to {}.", order.id, refund, order.client);
        }
    }
    Ok(())
}

fn print_orders(orders: &[Order]) {
    if orders.is_empty() {
        println!("No orders found.");
        return;
    }

    println!("Found {} order(s):\n", orders.len());
    println!(
        "{:<6} {:<10} {:<22} {:<15} {:<15} {:>10} {:<16}",
        "ID", "State", "Restaurant", "Client", "Deliveryman", "Total", "Placed"
    );
    print_separator(100);
    for order in orders {
        let total = order
            .total()
            .map_or_else(|_| "--".to_string(), |t| t.to_string());
        println!(
            "{:<6} {:<10} {:<22} {:<15} {:<15} {:>10} {:<16}",
            order.id,
            order.state,
            truncate_string(&order.restaurant, 21),
            truncate_string(&order.client, 14),
            truncate_string(&format_optional(order.deliveryman.as_ref(), "--"), 14),
            total,
            format_instant(order.created_at)
        );
    }
}
