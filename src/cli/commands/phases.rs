use super::{confirm_delete, print_header};
use crate::api_client;
use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, Subcommand};
use colored::*;
use forage_cli::api::models::dates::display_date;
use forage_cli::tracking::phase_status;
use forage_cli::ui::{Table, with_spinner};
use log::info;

#[derive(Args)]
pub struct PhasesCommands {
    #[command(subcommand)]
    pub command: PhasesSubcommands,
}

#[derive(Subcommand)]
pub enum PhasesSubcommands {
    /// List the phases of a forage
    List {
        #[arg(long)]
        forage: i64,
    },
    /// Delete a phase
    Delete {
        id: i64,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

pub async fn phases_command(args: PhasesCommands) -> Result<()> {
    match args.command {
        PhasesSubcommands::List { forage } => list_command(forage).await,
        PhasesSubcommands::Delete { id, force } => delete_command(id, force).await,
    }
}

async fn list_command(forage_id: i64) -> Result<()> {
    let phases = with_spinner("Loading phases...", api_client().phases().by_forage(forage_id))
        .await
        .with_context(|| format!("Failed to load phases of forage {}", forage_id))?;
    let today = Local::now().date_naive();

    print_header(&format!("Phases of forage {}", forage_id));
    if phases.is_empty() {
        println!("  {}", "No phases.".dimmed());
        return Ok(());
    }

    let mut table = Table::new(["ID", "Phase", "Description", "Planned start", "Planned end", "Status"]);
    for phase in &phases {
        table.row([
            phase.id.to_string(),
            phase.label(),
            phase.description.clone().unwrap_or_default(),
            display_date(phase.date_debut_prevue),
            display_date(phase.date_fin_prevue),
            phase_status(phase, today).label().to_string(),
        ]);
    }
    table.print();
    Ok(())
}

async fn delete_command(id: i64, force: bool) -> Result<()> {
    if !confirm_delete(&format!("phase {}", id), force)? {
        println!("  {}", "Cancelled".dimmed());
        return Ok(());
    }
    api_client()
        .phases()
        .delete(id)
        .await
        .with_context(|| format!("Failed to delete phase {}", id))?;
    info!("Deleted phase {}", id);
    println!("  {} {}", "✓ Deleted phase".bright_green().bold(), id);
    Ok(())
}
