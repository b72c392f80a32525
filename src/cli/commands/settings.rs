use super::print_header;
use crate::global_config;
use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use colored::*;
use forage_cli::config::{self, Config};
use forage_cli::ui::{self, prompts};
use log::info;

#[derive(Args)]
pub struct SettingsCommands {
    #[command(subcommand)]
    pub command: SettingsSubcommands,
}

#[derive(Subcommand)]
pub enum SettingsSubcommands {
    /// Show current settings
    Show,
    /// Get the value of a specific setting
    Get {
        /// Setting name, e.g. api.base_url
        name: String,
    },
    /// Set the value of a specific setting
    Set {
        /// Setting name
        name: String,
        /// Setting value
        value: String,
    },
    /// Reset all settings to default values
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

pub fn settings_command(args: SettingsCommands) -> Result<()> {
    match args.command {
        SettingsSubcommands::Show => show_command(),
        SettingsSubcommands::Get { name } => {
            println!("{}", global_config().get(&name)?);
            Ok(())
        }
        SettingsSubcommands::Set { name, value } => {
            let mut config = global_config().clone();
            config.set(&name, &value)?;
            config.save()?;
            info!("Setting {} changed to {}", name, value);
            println!("  {} {} = {}", "✓".bright_green().bold(), name.bright_white(), value.cyan());
            Ok(())
        }
        SettingsSubcommands::Reset { force } => reset_command(force),
    }
}

fn show_command() -> Result<()> {
    let config = global_config();
    print_header("Settings");
    println!("  {}: {}", "File".dimmed(), Config::config_path()?.display().to_string().cyan());
    println!();
    for key in config::KEYS {
        println!("  {} {}", format!("{:<32}", key).bright_white(), config.get(key)?);
    }
    let effective = config.effective_base_url();
    if effective != config.api.base_url.trim_end_matches('/') {
        println!();
        println!("  {} {} ({})", "API URL in use:".dimmed(), effective.cyan(), config::API_URL_ENV);
    }
    Ok(())
}

fn reset_command(force: bool) -> Result<()> {
    if !force {
        if !ui::is_interactive() {
            bail!("Refusing to reset settings without --force in a non-interactive session");
        }
        if !prompts::prompt_confirmation("Reset every setting to its default?", false)? {
            println!("  {}", "Cancelled".dimmed());
            return Ok(());
        }
    }
    let mut config = global_config().clone();
    config.reset();
    config.save()?;
    println!("  {}", "✓ Settings reset to defaults".bright_green().bold());
    Ok(())
}
