//! `giftafy account`: manage accounts in the local store.

use anyhow::Result;
use console::style;
use dialoguer::Password;

use giftafy_types::account::{Credentials, SubscriptionTier};

use crate::state::AppState;

/// Create an account. Prompts for the password (with confirmation) when
/// not given.
pub async fn create_account(
    state: &AppState,
    email: String,
    password: Option<String>,
    json: bool,
) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()?,
    };

    let user = state
        .account_service
        .register(&Credentials { email, password })
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&user)?);
        return Ok(());
    }

    println!();
    println!("  {} Account created", style("✓").green().bold());
    println!();
    println!("  {}  {}", style("Email:").bold(), style(&user.email).cyan());
    println!("  {}   {}", style("Tier:").bold(), user.subscription_tier);
    println!("  {}     {}", style("ID:").bold(), style(user.id.to_string()).dim());
    println!();

    Ok(())
}

pub async fn set_tier(state: &AppState, email: &str, tier: SubscriptionTier, json: bool) -> Result<()> {
    let user = state.account_service.set_tier(email, tier).await?;
    tracing::info!(user_id = %user.id, %tier, "subscription tier changed");

    if json {
        println!("{}", serde_json::to_string_pretty(&user)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {} is now on the {} tier",
        style("✓").green().bold(),
        style(&user.email).cyan(),
        style(user.subscription_tier).bold()
    );
    println!();

    Ok(())
}

/// Sign in and print the bearer token.
pub async fn login(state: &AppState, email: String, password: Option<String>, json: bool) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => Password::new().with_prompt("Password").interact()?,
    };

    let session = state
        .account_service
        .sign_in(&Credentials { email, password })
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Signed in as {}",
        style("✓").green().bold(),
        style(&session.user.email).cyan()
    );
    println!();
    println!("  {}", style(&session.access_token).yellow().bold());
    println!();
    println!(
        "  Use it with: {}",
        style("giftafy find --remote http://127.0.0.1:3000 --token <token>").dim()
    );
    println!(
        "  {}",
        style(format!("Expires {}", session.expires_at.format("%Y-%m-%d %H:%M UTC"))).dim()
    );
    println!();

    Ok(())
}
