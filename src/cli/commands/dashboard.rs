use super::{print_header, print_json};
use crate::{api_client, global_config};
use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use forage_cli::tracking::DashboardSummary;
use forage_cli::tracking::format::{bar, format_compact, format_currency};
use forage_cli::ui::with_spinner;

#[derive(Args)]
pub struct DashboardCommands {
    /// Print the raw dashboard data
    #[arg(long)]
    pub json: bool,
}

pub async fn dashboard_command(args: DashboardCommands) -> Result<()> {
    let data = with_spinner("Loading dashboard...", api_client().dashboard().data())
        .await
        .context("Failed to load dashboard data")?;

    if args.json {
        return print_json(&data);
    }

    let currency = &global_config().display.currency;
    let summary = DashboardSummary::from_data(&data);

    print_header("Phase costs");
    for card in &summary.phase_cards {
        println!("  {:<8} {}", card.label.bright_white(), format_currency(card.amount, currency).cyan());
    }
    println!(
        "  {:<8} {}",
        "Total".bright_white().bold(),
        format_currency(summary.total_amount, currency).cyan().bold()
    );

    let totals = &summary.totals;
    print_header(totals.caption());
    println!(
        "  {} across {} phases",
        format_currency(totals.amount, currency).cyan().bold(),
        totals.total_phases
    );
    if let Some(overrun) = totals.overrun_label(currency) {
        println!("  {}", overrun.bright_red());
    }
    if let Some(percentage) = totals.percentage_label() {
        println!("  {}", percentage.dimmed());
    }

    print_header("Overruns");
    for step in &summary.overruns {
        println!(
            "  {}: {}/{} phases ({}%), {} {}",
            step.label.bright_white(),
            step.value,
            step.total,
            step.top_percent.to_string().bright_yellow(),
            step.bottom_value,
            step.bottom_unit
        );
    }

    print_header("Most costly operations");
    if summary.costly.is_empty() {
        println!("  {}", "No operations yet.".dimmed());
    }
    for costly in &summary.costly {
        println!(
            "  {:<20} {} {}",
            costly.operation.operation_type,
            bar(costly.ratio, 24).bright_blue(),
            format_compact(costly.operation.total_cost).cyan()
        );
    }
    Ok(())
}
