use clap::{Args, Subcommand};
use jiff::civil::{Date, Time};
use storefront::{
    catering::{CateringMenu, Fulfilment, ReservationRequest},
    profiles::Role,
};
use storefront_app::context::AppContext;
use tabled::{builder::Builder, settings::Style};

use super::{describe, open_dashboard};

#[derive(Debug, Args)]
pub(crate) struct CateringCommand {
    #[command(subcommand)]
    command: CateringSubcommand,
}

#[derive(Debug, Subcommand)]
enum CateringSubcommand {
    /// Request catering for an event
    Request(RequestArgs),
    /// List submitted requests
    List,
}

#[derive(Debug, Args)]
struct RequestArgs {
    #[arg(long)]
    first_name: String,

    #[arg(long)]
    last_name: String,

    #[arg(long)]
    email: String,

    #[arg(long)]
    phone: String,

    /// Event date, YYYY-MM-DD
    #[arg(long)]
    date: Date,

    /// Event time, HH:MM
    #[arg(long)]
    time: Time,

    #[arg(long)]
    guests: u32,

    /// plated, buffet, family-style or any other menu name
    #[arg(long)]
    menu: String,

    #[arg(long, default_value = "")]
    occasion: String,

    /// Deliver instead of picking up
    #[arg(long)]
    delivery: bool,

    #[arg(long, default_value = "")]
    requests: String,
}

impl From<RequestArgs> for ReservationRequest {
    fn from(args: RequestArgs) -> Self {
        Self {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            phone: args.phone,
            date: args.date,
            time: args.time,
            guests: args.guests,
            menu: CateringMenu::from(args.menu),
            occasion: args.occasion,
            delivery: if args.delivery {
                Fulfilment::Delivery
            } else {
                Fulfilment::Pickup
            },
            requests: args.requests,
        }
    }
}

pub(crate) async fn run(command: CateringCommand, context: &AppContext) -> Result<(), String> {
    match command.command {
        CateringSubcommand::Request(args) => {
            let reservation = context
                .catering
                .submit(args.into())
                .await
                .map_err(|error| format!("catering request rejected: {}", describe(&error)))?;

            println!(
                "requested {} catering for {} guests on {} at {}",
                reservation.menu, reservation.guests, reservation.date, reservation.time
            );
        }
        CateringSubcommand::List => {
            open_dashboard(context, Role::Admin).await?;

            let mut builder = Builder::default();

            builder.push_record(["Name", "Date", "Time", "Guests", "Menu", "Email", "Phone"]);

            for reservation in context.catering.list() {
                builder.push_record([
                    reservation.name,
                    reservation.date.to_string(),
                    reservation.time.to_string(),
                    reservation.guests.to_string(),
                    reservation.menu.to_string(),
                    reservation.email,
                    reservation.phone,
                ]);
            }

            let mut table = builder.build();

            table.with(Style::modern_rounded());

            println!("{table}");
        }
    }

    Ok(())
}
