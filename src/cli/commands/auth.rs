//! Sign-in, sign-out and session status

use super::{print_header, require_session};
use crate::{api_client, global_config};
use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use colored::*;
use forage_cli::auth::{self, ExpectedRole, SessionStore};
use forage_cli::ui::{self, prompts, with_spinner};

#[derive(Args)]
pub struct AuthCommands {
    #[command(subcommand)]
    pub command: AuthSubcommands,
}

#[derive(Subcommand)]
pub enum AuthSubcommands {
    /// Sign in to the manager or engineer console
    Login {
        #[arg(long)]
        email: Option<String>,
        /// Prompted with hidden input when omitted
        #[arg(long)]
        password: Option<String>,
        #[arg(long, value_enum)]
        role: Option<ExpectedRole>,
    },
    /// Forget the stored session
    Logout,
    /// Show who is signed in and where
    Status,
}

pub async fn auth_command(args: AuthCommands) -> Result<()> {
    match args.command {
        AuthSubcommands::Login { email, password, role } => login_command(email, password, role).await,
        AuthSubcommands::Logout => logout_command(),
        AuthSubcommands::Status => status_command(),
    }
}

async fn login_command(
    email: Option<String>,
    password: Option<String>,
    role: Option<ExpectedRole>,
) -> Result<()> {
    let (email, password, role) = if ui::is_interactive() {
        (
            prompts::prompt_email(email)?,
            prompts::prompt_password(password)?,
            prompts::prompt_role(role)?,
        )
    } else {
        let Some(role) = role else {
            bail!("--role is required in a non-interactive session");
        };
        (email.unwrap_or_default(), password.unwrap_or_default(), role)
    };

    let session = with_spinner(
        "Signing in...",
        auth::login(api_client(), &email, &password, role),
    )
    .await?;

    SessionStore::default_location()?.save(&session)?;

    println!(
        "  {} {} ({})",
        "✓ Signed in as".bright_green().bold(),
        session.user.full_name().bright_white().bold(),
        role.title().cyan()
    );
    Ok(())
}

fn logout_command() -> Result<()> {
    if SessionStore::default_location()?.clear()? {
        println!("  {}", "✓ Signed out".bright_green().bold());
    } else {
        println!("  {}", "Not signed in".dimmed());
    }
    Ok(())
}

fn status_command() -> Result<()> {
    print_header("Forage CLI session");

    let session = match require_session() {
        Ok(session) => session,
        Err(_) => {
            println!();
            println!("  {}", "⚠️  Not signed in".bright_yellow().bold());
            println!("    {}", "forage-cli auth login --help".cyan());
            println!("  {}: {}", "API".dimmed(), global_config().effective_base_url().cyan());
            return Ok(());
        }
    };

    println!();
    println!("  {}: {}", "User".dimmed(), session.user.full_name().bright_white().bold());
    if let Some(email) = &session.user.email {
        println!("  {}: {}", "Email".dimmed(), email.white());
    }
    println!("  {}: {}", "Role".dimmed(), session.user.role_label().bright_yellow());
    println!("  {}: {}", "API".dimmed(), session.api_url.cyan());
    println!(
        "  {}: {}",
        "Since".dimmed(),
        session.logged_in_at.format("%Y-%m-%d %H:%M UTC").to_string().white()
    );
    Ok(())
}
