//! Storefront CLI

use std::process;

use clap::Parser;

use crate::cli::Cli;

mod cli;

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    cli.init_logging();

    if let Err(error) = cli.run().await {
        eprintln!("{error}");
        process::exit(1);
    }
}
