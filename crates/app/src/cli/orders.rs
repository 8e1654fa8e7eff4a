use clap::{Args, Subcommand};
use rusty_money::iso::Currency;
use storefront::profiles::Role;
use storefront_app::{
    context::AppContext,
    domain::{orders::records::Order, products::records::ProductId},
};
use tabled::{builder::Builder, settings::Style};

use super::{describe, open_dashboard};

#[derive(Debug, Args)]
pub(crate) struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrdersSubcommand {
    /// List your orders, newest first
    List,
    /// Order a catalog product directly
    Place(PlaceOrderArgs),
}

#[derive(Debug, Args)]
struct PlaceOrderArgs {
    product: ProductId,

    #[arg(long, default_value_t = 1)]
    quantity: u32,
}

pub(crate) fn table(orders: &[Order], currency: &'static Currency) -> String {
    let mut builder = Builder::default();

    builder.push_record(["ID", "Product", "Qty", "Total", "Status", "Buyer", "Placed"]);

    for order in orders {
        builder.push_record([
            order.id.to_string(),
            order.product_name.clone(),
            order.quantity.to_string(),
            order.total_price.format(currency),
            order.status.to_string(),
            order.buyer_email.clone(),
            order.placed_at.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());

    table.to_string()
}

pub(crate) async fn run(command: OrdersCommand, context: &AppContext) -> Result<(), String> {
    let dashboard = open_dashboard(context, Role::User).await?;
    let currency = context.cart.view().currency();

    match command.command {
        OrdersSubcommand::List => {
            let orders = context
                .orders
                .list_for_buyer(&dashboard.user)
                .await
                .map_err(|error| format!("failed to list orders: {}", describe(&error)))?;

            println!("{}", table(&orders, currency));
        }
        OrdersSubcommand::Place(args) => {
            let order = context
                .orders
                .place_order(&dashboard.user, args.product, args.quantity)
                .await
                .map_err(|error| format!("failed to place order: {}", describe(&error)))?;

            println!("order_id: {}", order.id);
            println!("total: {}", order.total_price.format(currency));
        }
    }

    Ok(())
}
