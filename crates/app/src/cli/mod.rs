use std::{path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand, ValueEnum};
use rusty_money::iso::{self, Currency};
use storefront::{profiles::Role, storage::FileKeyValueStore};
use storefront_app::{
    auth::AuthUser,
    context::AppContext,
    domain::{
        carts::SyncStatus,
        profiles::{Dashboard, DashboardError},
    },
};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

mod account;
mod admin;
mod cart;
mod catering;
mod checkout;
mod orders;
mod products;
mod profile;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub(crate) enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront CLI", long_about = None)]
pub(crate) struct Cli {
    /// PostgreSQL connection string; documents are kept in the storage file when omitted
    #[arg(long, global = true, env = "DATABASE_URL", hide_env_values = true)]
    database_url: Option<String>,

    /// File backing the local key-value store (cart, session, reservations, and
    /// documents when no database is configured)
    #[arg(
        long,
        global = true,
        env = "STOREFRONT_STORAGE",
        default_value = ".storefront.json"
    )]
    storage: PathBuf,

    /// ISO currency code used to display prices
    #[arg(long, global = true, env = "STOREFRONT_CURRENCY", default_value = "INR")]
    currency: String,

    /// Log filter used when `RUST_LOG` is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[arg(long, global = true, env = "LOG_FORMAT", value_enum, default_value_t)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create an account and sign in
    Register(account::CredentialsArgs),
    /// Sign in and restore the account's cart
    Login(account::CredentialsArgs),
    /// Sign out
    Logout,
    /// Show the signed-in account
    Whoami,
    Profile(profile::ProfileCommand),
    Cart(cart::CartCommand),
    /// Turn the cart into orders
    Checkout,
    Products(products::ProductsCommand),
    Orders(orders::OrdersCommand),
    Admin(admin::AdminCommand),
    Catering(catering::CateringCommand),
}

impl Cli {
    pub(crate) fn init_logging(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.log_level));

        match self.log_format {
            LogFormat::Compact => tracing_subscriber::fmt()
                .compact()
                .with_env_filter(filter)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr)
                .init(),
            LogFormat::Json => tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_current_span(false)
                .with_writer(std::io::stderr)
                .init(),
        }
    }

    fn currency(&self) -> Result<&'static Currency, String> {
        iso::find(&self.currency.to_uppercase())
            .ok_or_else(|| format!("unknown currency code: {}", self.currency))
    }

    async fn context(&self) -> Result<AppContext, String> {
        let storage = Arc::new(FileKeyValueStore::open(&self.storage));
        let currency = self.currency()?;

        let context = match &self.database_url {
            Some(url) => AppContext::from_database_url(url, storage, currency)
                .await
                .map_err(|error| describe(&error))?,
            None => {
                debug!(
                    path = %self.storage.display(),
                    "no database configured, keeping documents locally"
                );

                AppContext::local(storage, currency).map_err(|error| describe(&error))?
            }
        };

        context.resume_session();

        Ok(context)
    }

    pub(crate) async fn run(self) -> Result<(), String> {
        let context = self.context().await?;

        let result = match self.command {
            Commands::Register(args) => account::register(args, &context).await,
            Commands::Login(args) => account::login(args, &context).await,
            Commands::Logout => account::logout(&context).await,
            Commands::Whoami => account::whoami(&context).await,
            Commands::Profile(command) => profile::run(command, &context).await,
            Commands::Cart(command) => cart::run(command, &context).await,
            Commands::Checkout => checkout::run(&context).await,
            Commands::Products(command) => products::run(command, &context).await,
            Commands::Orders(command) => orders::run(command, &context).await,
            Commands::Admin(command) => admin::run(command, &context).await,
            Commands::Catering(command) => catering::run(command, &context).await,
        };

        // Background mirror pushes must finish before the process exits.
        if let SyncStatus::Failed { reason } = context.cart.mirror().settled().await {
            warn!("cart was saved locally but not synced: {reason}");
        }

        result
    }
}

/// Render an error with its first underlying cause.
pub(crate) fn describe(error: &dyn std::error::Error) -> String {
    match error.source() {
        Some(source) => format!("{error}: {source}"),
        None => error.to_string(),
    }
}

/// The signed-in user, or an error asking to sign in.
pub(crate) fn signed_in(context: &AppContext) -> Result<AuthUser, String> {
    context
        .auth
        .current_user()
        .ok_or_else(|| "not signed in; run `storefront login` first".to_string())
}

/// Open a role dashboard. A denied user is signed out here and in storage.
pub(crate) async fn open_dashboard(context: &AppContext, role: Role) -> Result<Dashboard, String> {
    context.dashboards.open(role).await.map_err(|error| {
        if matches!(error, DashboardError::AccessDenied { .. })
            && let Err(clear) = context.sessions.clear()
        {
            warn!("failed to clear session: {clear}");
        }

        describe(&error)
    })
}
