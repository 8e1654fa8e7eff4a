use clap::{Args, Subcommand};
use rusty_money::iso::Currency;
use storefront::profiles::Role;
use storefront_app::{
    context::AppContext,
    domain::products::{data::NewProduct, records::Product},
};
use tabled::{builder::Builder, settings::Style};

use super::{describe, open_dashboard};

#[derive(Debug, Args)]
pub(crate) struct ProductsCommand {
    #[command(subcommand)]
    command: ProductsSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductsSubcommand {
    /// Browse the catalog
    List,
    /// List the products you uploaded
    Mine,
    /// Add a product to the catalog
    Upload(UploadProductArgs),
}

#[derive(Debug, Args)]
struct UploadProductArgs {
    #[arg(long)]
    name: String,

    #[arg(long, default_value = "")]
    description: String,

    /// Price in minor currency units
    #[arg(long)]
    price: u64,
}

pub(crate) fn table(products: &[Product], currency: &'static Currency) -> String {
    let mut builder = Builder::default();

    builder.push_record(["ID", "Name", "Price", "Owner", "Created"]);

    for product in products {
        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            product.price.format(currency),
            product.owner_email.clone(),
            product.created_at.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());

    table.to_string()
}

pub(crate) async fn run(command: ProductsCommand, context: &AppContext) -> Result<(), String> {
    let currency = context.cart.view().currency();

    match command.command {
        ProductsSubcommand::List => {
            let products = context
                .products
                .list_all()
                .await
                .map_err(|error| format!("failed to list products: {}", describe(&error)))?;

            println!("{}", table(&products, currency));
        }
        ProductsSubcommand::Mine => {
            let dashboard = open_dashboard(context, Role::User).await?;

            let products = context
                .products
                .list_for_owner(&dashboard.user)
                .await
                .map_err(|error| format!("failed to list products: {}", describe(&error)))?;

            println!("{}", table(&products, currency));
        }
        ProductsSubcommand::Upload(args) => {
            let dashboard = open_dashboard(context, Role::User).await?;

            let product = context
                .products
                .upload(
                    &dashboard.user,
                    NewProduct {
                        name: args.name,
                        description: args.description,
                        price: args.price,
                    },
                )
                .await
                .map_err(|error| format!("failed to upload product: {}", describe(&error)))?;

            println!("product_id: {}", product.id);
        }
    }

    Ok(())
}
