use super::{print_header, print_json};
use crate::{api_client, global_config};
use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, Subcommand};
use colored::*;
use forage_cli::api::models::dates::display_date;
use forage_cli::tracking::format::{bar, format_currency, group_thousands};
use forage_cli::tracking::{WellDetail, phase_status, well_progress};
use forage_cli::ui::{Table, with_spinner};
use serde_json::json;

#[derive(Args)]
pub struct WellsCommands {
    #[command(subcommand)]
    pub command: WellsSubcommands,
}

#[derive(Subcommand)]
pub enum WellsSubcommands {
    /// List every well
    List,
    /// Progress, phases and operations of one well
    Show {
        puit_id: i64,
        /// Only show operations of this phase
        #[arg(long)]
        phase: Option<i64>,
        #[arg(long)]
        json: bool,
    },
}

pub async fn wells_command(args: WellsCommands) -> Result<()> {
    match args.command {
        WellsSubcommands::List => list_command().await,
        WellsSubcommands::Show { puit_id, phase, json } => show_command(puit_id, phase, json).await,
    }
}

async fn list_command() -> Result<()> {
    let puits = with_spinner("Loading wells...", api_client().puits().list())
        .await
        .context("Failed to load wells")?;

    print_header("Wells");
    if puits.is_empty() {
        println!("  {}", "No wells found.".dimmed());
        return Ok(());
    }

    let mut table = Table::new(["ID", "Name", "X", "Y"]);
    for puit in &puits {
        let coord = |c: Option<f64>| c.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
        table.row([puit.id.to_string(), puit.display_name(), coord(puit.coord_x), coord(puit.coord_y)]);
    }
    table.print();
    println!("\n  {}", format!("Total wells: {}", puits.len()).dimmed());
    Ok(())
}

async fn show_command(puit_id: i64, phase: Option<i64>, json: bool) -> Result<()> {
    let detail = with_spinner("Loading well...", WellDetail::load(api_client(), puit_id))
        .await
        .with_context(|| format!("Failed to load well {}", puit_id))?;
    let today = Local::now().date_naive();
    let currency = &global_config().display.currency;

    if json {
        let operations: Vec<_> = detail
            .operations_for(phase)
            .into_iter()
            .map(|op| json!({ "phaseLabel": op.phase_label, "operation": op.operation }))
            .collect();
        return print_json(&json!({
            "puit": detail.puit,
            "forage": detail.forage,
            "phases": detail.phases,
            "operations": operations,
        }));
    }

    print_header(&detail.puit.display_name());

    let progress = well_progress(detail.forage.as_ref(), &detail.phases, today);
    println!();
    println!("  {}: {}", "Begin".dimmed(), progress.begin_label().white());
    println!("  {}: {}", "Completion".dimmed(), progress.completion_label().white());
    if progress.total_days > 0 {
        let ratio = progress.completed_days as f64 / progress.total_days as f64;
        println!(
            "  {} {}/{} days, {} to go",
            bar(ratio, 30).bright_green(),
            progress.completed_days,
            progress.total_days,
            progress.countdown.to_string().bright_yellow()
        );
    }
    if let Some(forage) = &detail.forage {
        println!("  {}: {}", "Forage cost".dimmed(), format_currency(forage.cost(), currency).cyan());
    }

    if !detail.phases.is_empty() {
        println!();
        let mut table = Table::new(["ID", "Phase", "Planned", "Actual", "Depth (m)", "Status"]);
        for p in &detail.phases {
            table.row([
                p.id.to_string(),
                p.label(),
                format!("{} → {}", display_date(p.date_debut_prevue), display_date(p.date_fin_prevue)),
                format!("{} → {}", display_date(p.date_debut_reelle), display_date(p.date_fin_reelle)),
                format!(
                    "{} / {}",
                    p.profondeur_reelle.map(group_thousands).unwrap_or_else(|| "-".into()),
                    p.profondeur_prevue.map(group_thousands).unwrap_or_else(|| "-".into())
                ),
                phase_status(p, today).label().to_string(),
            ]);
        }
        table.print();
    }

    let operations = detail.operations_for(phase);
    println!();
    if operations.is_empty() {
        println!("  {}", "No operations.".dimmed());
        return Ok(());
    }
    let mut table = Table::new(["ID", "Phase", "Operation", "Planned", "Actual", "Status"]);
    for op in &operations {
        let o = &op.operation;
        table.row([
            o.id.to_string(),
            op.phase_label.clone(),
            o.name(),
            o.cout_prev.map(group_thousands).unwrap_or_else(|| "-".into()),
            o.cout_reel.map(group_thousands).unwrap_or_else(|| "-".into()),
            o.statut.map(|s| s.label()).unwrap_or("-").to_string(),
        ]);
    }
    table.print();

    if phase.is_none() {
        let (planned, actual) = detail.cost_totals();
        println!(
            "\n  {}: {}  {}: {}",
            "Planned".dimmed(),
            format_currency(planned, currency).cyan(),
            "Actual".dimmed(),
            format_currency(actual, currency).cyan()
        );
    }
    Ok(())
}
