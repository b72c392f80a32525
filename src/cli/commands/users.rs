use super::{print_header, print_json};
use crate::{api_client, global_config};
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::*;
use forage_cli::auth::{NewUser, register_user};
use forage_cli::listing::{export_users_csv, filter_users, paginate, unique_roles};
use forage_cli::ui::{Table, with_spinner};
use log::info;
use std::fs::File;
use std::io;
use std::path::PathBuf;

#[derive(Args)]
pub struct UsersCommands {
    #[command(subcommand)]
    pub command: UsersSubcommands,
}

#[derive(Subcommand)]
pub enum UsersSubcommands {
    /// List users, 8 per page
    List {
        /// Match on last name, first name or email
        #[arg(long)]
        search: Option<String>,
        /// Role to keep ("all" for every role)
        #[arg(long)]
        role: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long)]
        json: bool,
    },
    /// Register a new user
    Add {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        /// Engineer, Manager, Viewer, Admin or Supervisor
        #[arg(long)]
        role: String,
        /// A temporary password is generated when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Export every user as CSV
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub async fn users_command(args: UsersCommands) -> Result<()> {
    match args.command {
        UsersSubcommands::List { search, role, page, json } => list_command(search, role, page, json).await,
        UsersSubcommands::Add {
            first_name,
            last_name,
            email,
            role,
            password,
        } => {
            let user = NewUser {
                first_name,
                last_name,
                email,
                role,
                password,
            };
            add_command(user).await
        }
        UsersSubcommands::Export { output } => export_command(output).await,
    }
}

async fn list_command(search: Option<String>, role: Option<String>, page: usize, json: bool) -> Result<()> {
    let users = with_spinner("Loading users...", api_client().utilisateurs().list())
        .await
        .context("Failed to load users")?;

    let matching = filter_users(&users, search.as_deref(), role.as_deref());
    let page = paginate(matching, page, global_config().display.users_page_size);

    if json {
        return print_json(&page.items);
    }

    print_header("Users");
    if page.is_empty() {
        println!("  {}", "No users match.".dimmed());
        return Ok(());
    }

    let mut table = Table::new(["ID", "Name", "Email", "Role"]);
    for user in &page.items {
        table.row([
            user.id.to_string(),
            user.full_name(),
            user.email.clone().unwrap_or_default(),
            user.role_label(),
        ]);
    }
    table.print();

    println!();
    println!(
        "  {}  {}",
        page.range_label().dimmed(),
        format!("page {}/{}", page.page, page.total_pages).dimmed()
    );
    let roles = unique_roles(&users);
    if !roles.is_empty() {
        println!("  {}: {}", "Roles".dimmed(), roles.join(", ").cyan());
    }
    Ok(())
}

async fn add_command(user: NewUser) -> Result<()> {
    let generated = user.password.is_none();
    let password = with_spinner("Registering user...", register_user(api_client(), &user)).await?;

    println!(
        "  {} {} {} ({})",
        "✓ User added:".bright_green().bold(),
        user.first_name.bright_white(),
        user.last_name.bright_white(),
        user.email.cyan()
    );
    if generated {
        println!("  {}: {}", "Temporary password".dimmed(), password.bright_yellow().bold());
        println!("  {}", "Share it with the user; it will not be shown again.".dimmed());
    }
    Ok(())
}

async fn export_command(output: Option<PathBuf>) -> Result<()> {
    let users = with_spinner("Loading users...", api_client().utilisateurs().list())
        .await
        .context("Failed to load users")?;
    let all = filter_users(&users, None, None);

    match output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let count = export_users_csv(&all, file)?;
            info!("Exported {} users to {}", count, path.display());
            println!(
                "  {} {} users to {}",
                "✓ Exported".bright_green().bold(),
                count,
                path.display().to_string().cyan()
            );
        }
        None => {
            export_users_csv(&all, io::stdout().lock())?;
        }
    }
    Ok(())
}
