use clap::{Args, Subcommand};
use storefront::{orders::OrderStatus, profiles::Role};
use storefront_app::{context::AppContext, domain::orders::records::OrderId};

use super::{describe, open_dashboard, orders, products};

#[derive(Debug, Args)]
pub(crate) struct AdminCommand {
    #[command(subcommand)]
    command: AdminSubcommand,
}

#[derive(Debug, Subcommand)]
enum AdminSubcommand {
    /// List every order, newest first
    Orders,
    /// Move an order to another status
    SetStatus(SetStatusArgs),
    /// List every product
    Products,
    /// Give an account the admin role; requires direct database access
    Grant(GrantArgs),
}

#[derive(Debug, Args)]
struct SetStatusArgs {
    order: OrderId,

    /// One of placed, processing, completed, cancelled
    status: OrderStatus,
}

#[derive(Debug, Args)]
struct GrantArgs {
    #[arg(long)]
    email: String,
}

pub(crate) async fn run(command: AdminCommand, context: &AppContext) -> Result<(), String> {
    let currency = context.cart.view().currency();

    match command.command {
        AdminSubcommand::Orders => {
            open_dashboard(context, Role::Admin).await?;

            let all = context
                .orders
                .list_all()
                .await
                .map_err(|error| format!("failed to list orders: {}", describe(&error)))?;

            println!("{}", orders::table(&all, currency));
        }
        AdminSubcommand::SetStatus(args) => {
            open_dashboard(context, Role::Admin).await?;

            context
                .orders
                .update_status(args.order, args.status)
                .await
                .map_err(|error| format!("failed to update order: {}", describe(&error)))?;

            println!("order {} is now {}", args.order, args.status);
        }
        AdminSubcommand::Products => {
            open_dashboard(context, Role::Admin).await?;

            let all = context
                .products
                .list_all()
                .await
                .map_err(|error| format!("failed to list products: {}", describe(&error)))?;

            println!("{}", products::table(&all, currency));
        }
        AdminSubcommand::Grant(args) => {
            let profile = context
                .profiles
                .find_by_email(&args.email)
                .await
                .map_err(|error| format!("failed to find account: {}", describe(&error)))?;

            let profile = context
                .profiles
                .set_role(profile.id, Role::Admin)
                .await
                .map_err(|error| format!("failed to grant admin: {}", describe(&error)))?;

            println!("{} is now {}", profile.email, profile.role);
        }
    }

    Ok(())
}
