use clap::{Args, Subcommand};
use storefront_app::{context::AppContext, domain::profiles::data::ProfileUpdate};

use super::{describe, signed_in};

#[derive(Debug, Args)]
pub(crate) struct ProfileCommand {
    #[command(subcommand)]
    command: ProfileSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProfileSubcommand {
    /// Show the signed-in user's profile
    Show,
    /// Change name and/or address
    Update(UpdateProfileArgs),
}

#[derive(Debug, Args)]
struct UpdateProfileArgs {
    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    address: Option<String>,
}

pub(crate) async fn run(command: ProfileCommand, context: &AppContext) -> Result<(), String> {
    let user = signed_in(context)?;

    let profile = match command.command {
        ProfileSubcommand::Show => context
            .profiles
            .get_profile(user.id)
            .await
            .map_err(|error| format!("failed to load profile: {}", describe(&error)))?,
        ProfileSubcommand::Update(args) => context
            .profiles
            .update_profile(
                user.id,
                ProfileUpdate {
                    name: args.name,
                    address: args.address,
                },
            )
            .await
            .map_err(|error| format!("failed to update profile: {}", describe(&error)))?,
    };

    println!("email: {}", profile.email);
    println!("name: {}", profile.name);
    println!("address: {}", profile.address);
    println!("role: {}", profile.role);
    println!("created_at: {}", profile.created_at);

    Ok(())
}
