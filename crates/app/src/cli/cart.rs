use clap::{Args, Subcommand};
use storefront::cart::{CartLineItem, DEFAULT_IMAGE};
use storefront_app::{context::AppContext, domain::products::records::ProductId};

use super::describe;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the cart
    Show,
    /// Add a line item by hand
    Add(AddItemArgs),
    /// Add units of a catalog product
    AddProduct(AddProductArgs),
    /// Remove the line item at a position
    Remove(RemoveItemArgs),
    /// Empty the cart
    Clear,
}

#[derive(Debug, Args)]
struct AddItemArgs {
    #[arg(long)]
    name: String,

    /// Unit price in minor currency units
    #[arg(long)]
    price: u64,

    #[arg(long, default_value = DEFAULT_IMAGE)]
    image: String,
}

#[derive(Debug, Args)]
struct AddProductArgs {
    product: ProductId,

    #[arg(long, default_value_t = 1)]
    quantity: u32,
}

#[derive(Debug, Args)]
struct RemoveItemArgs {
    /// Position shown by `cart show`
    position: usize,
}

pub(crate) async fn run(command: CartCommand, context: &AppContext) -> Result<(), String> {
    let cart = &context.cart;

    match command.command {
        CartSubcommand::Show => {}
        CartSubcommand::Add(args) => {
            cart.add_item(CartLineItem::new(args.name, args.price, args.image))
                .map_err(|error| format!("failed to add item: {}", describe(&error)))?;
        }
        CartSubcommand::AddProduct(args) => {
            cart.add_product(args.product, args.quantity)
                .await
                .map_err(|error| format!("failed to add product: {}", describe(&error)))?;
        }
        CartSubcommand::Remove(args) => {
            cart.remove_at(args.position)
                .map_err(|error| format!("failed to remove item: {}", describe(&error)))?;
        }
        CartSubcommand::Clear => {
            cart.clear()
                .map_err(|error| format!("failed to clear cart: {}", describe(&error)))?;
        }
    }

    println!("{}", cart.view().to_table());

    Ok(())
}
