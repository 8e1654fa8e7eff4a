use clap::Args;
use storefront_app::{auth::AuthUser, context::AppContext};

use super::describe;

#[derive(Debug, Args)]
pub(crate) struct CredentialsArgs {
    /// Account email
    #[arg(long)]
    email: String,

    /// Account password
    #[arg(long, env = "STOREFRONT_PASSWORD", hide_env_values = true)]
    password: String,
}

fn remember(context: &AppContext, user: &AuthUser) -> Result<(), String> {
    context
        .sessions
        .save(user)
        .map_err(|error| format!("signed in but failed to save session: {}", describe(&error)))
}

pub(crate) async fn register(args: CredentialsArgs, context: &AppContext) -> Result<(), String> {
    let profile = context
        .profiles
        .register(&args.email, &args.password)
        .await
        .map_err(|error| format!("failed to register: {}", describe(&error)))?;

    if let Some(user) = context.auth.current_user() {
        remember(context, &user)?;
    }

    println!("user_id: {}", profile.id);
    println!("email: {}", profile.email);
    println!("role: {}", profile.role);

    Ok(())
}

pub(crate) async fn login(args: CredentialsArgs, context: &AppContext) -> Result<(), String> {
    let user = context
        .auth
        .sign_in(&args.email, &args.password)
        .await
        .map_err(|error| format!("failed to sign in: {}", describe(&error)))?;

    remember(context, &user)?;

    let summary = context
        .cart
        .reconcile(&user)
        .await
        .map_err(|error| format!("signed in but failed to restore cart: {}", describe(&error)))?;

    println!("signed in as {}", user.email);
    println!("cart_items: {}", summary.count());

    Ok(())
}

pub(crate) async fn logout(context: &AppContext) -> Result<(), String> {
    context.auth.sign_out().await;

    context
        .sessions
        .clear()
        .map_err(|error| format!("failed to clear session: {}", describe(&error)))?;

    println!("signed out");

    Ok(())
}

pub(crate) async fn whoami(context: &AppContext) -> Result<(), String> {
    let Some(user) = context.auth.current_user() else {
        println!("not signed in");

        return Ok(());
    };

    println!("user_id: {}", user.id);
    println!("email: {}", user.email);

    match context.profiles.get_profile(user.id).await {
        Ok(profile) => println!("role: {}", profile.role),
        Err(error) => println!("role: unknown ({})", describe(&error)),
    }

    Ok(())
}
