use super::{confirm_delete, print_header};
use crate::{api_client, global_config};
use anyhow::{Context, Result};
use clap::{ArgGroup, Args, Subcommand};
use colored::*;
use forage_cli::tracking::format::{format_currency, group_thousands, truncate};
use forage_cli::ui::{Table, with_spinner};
use log::info;

#[derive(Args)]
pub struct OperationsCommands {
    #[command(subcommand)]
    pub command: OperationsSubcommands,
}

#[derive(Subcommand)]
pub enum OperationsSubcommands {
    /// List operations of a phase or a whole forage
    List(ListArgs),
    /// Delete an operation
    Delete {
        id: i64,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Args)]
#[command(group(ArgGroup::new("scope").required(true).args(["phase", "forage"])))]
pub struct ListArgs {
    #[arg(long)]
    pub phase: Option<i64>,
    #[arg(long)]
    pub forage: Option<i64>,
}

pub async fn operations_command(args: OperationsCommands) -> Result<()> {
    match args.command {
        OperationsSubcommands::List(list) => list_command(list).await,
        OperationsSubcommands::Delete { id, force } => delete_command(id, force).await,
    }
}

async fn list_command(args: ListArgs) -> Result<()> {
    let client = api_client();
    let (title, operations) = match args.phase {
        Some(phase) => (
            format!("Operations of phase {}", phase),
            with_spinner("Loading operations...", client.operations().by_phase(phase)).await,
        ),
        None => {
            let forage = args.forage.context("Either --phase or --forage is required")?;
            (
                format!("Operations of forage {}", forage),
                with_spinner("Loading operations...", client.operations().by_forage(forage)).await,
            )
        }
    };
    let operations = operations.context("Failed to load operations")?;

    print_header(&title);
    if operations.is_empty() {
        println!("  {}", "No operations.".dimmed());
        return Ok(());
    }

    let mut table = Table::new(["ID", "Operation", "Description", "Planned", "Actual", "Status"]);
    for op in &operations {
        table.row([
            op.id.to_string(),
            op.name(),
            truncate(op.description.as_deref().unwrap_or(""), 40),
            op.cout_prev.map(group_thousands).unwrap_or_else(|| "-".into()),
            op.cout_reel.map(group_thousands).unwrap_or_else(|| "-".into()),
            op.statut.map(|s| s.label()).unwrap_or("-").to_string(),
        ]);
    }
    table.print();

    let planned: f64 = operations.iter().filter_map(|op| op.cout_prev).sum();
    let actual: f64 = operations.iter().filter_map(|op| op.cout_reel).sum();
    let currency = &global_config().display.currency;
    println!(
        "\n  {}: {}  {}: {}",
        "Planned".dimmed(),
        format_currency(planned, currency).cyan(),
        "Actual".dimmed(),
        format_currency(actual, currency).cyan()
    );
    Ok(())
}

async fn delete_command(id: i64, force: bool) -> Result<()> {
    if !confirm_delete(&format!("operation {}", id), force)? {
        println!("  {}", "Cancelled".dimmed());
        return Ok(());
    }
    api_client()
        .operations()
        .delete(id)
        .await
        .with_context(|| format!("Failed to delete operation {}", id))?;
    info!("Deleted operation {}", id);
    println!("  {} {}", "✓ Deleted operation".bright_green().bold(), id);
    Ok(())
}
