use super::{print_header, print_json, require_session};
use crate::{api_client, global_config};
use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, Subcommand};
use colored::*;
use forage_cli::alerts;
use forage_cli::api::models::{Gravite, Probleme, ProblemeStatut};
use forage_cli::listing::{filter_alerts, paginate};
use forage_cli::tracking::format::{group_thousands, truncate};
use forage_cli::ui::{self, Table, prompts, with_spinner};

#[derive(Args)]
pub struct AlertsCommands {
    #[command(subcommand)]
    pub command: AlertsSubcommands,
}

#[derive(Subcommand)]
pub enum AlertsSubcommands {
    /// List detected problems, 4 per page
    List {
        /// Match on type, well name or description
        #[arg(long)]
        search: Option<String>,
        /// critical, major or minor
        #[arg(long, value_parser = parse_severity)]
        severity: Option<Gravite>,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long)]
        json: bool,
    },
    /// Full details of one alert
    Show { id: i64 },
    /// Take an alert: marks it in progress under your name
    Assign { id: i64 },
    /// Resolve an alert with the implemented solution
    Resolve {
        id: i64,
        /// Prompted when omitted
        #[arg(long)]
        solution: Option<String>,
    },
    /// Change the status of an alert
    Status {
        id: i64,
        /// OUVERT, EN_COURS, RESOLU or FERME
        #[arg(value_parser = parse_status)]
        status: ProblemeStatut,
    },
}

fn parse_severity(value: &str) -> Result<Gravite, String> {
    Gravite::parse(value).ok_or_else(|| format!("unknown severity '{}'", value))
}

fn parse_status(value: &str) -> Result<ProblemeStatut, String> {
    ProblemeStatut::parse(value).ok_or_else(|| format!("unknown status '{}'", value))
}

pub async fn alerts_command(args: AlertsCommands) -> Result<()> {
    match args.command {
        AlertsSubcommands::List {
            search,
            severity,
            page,
            json,
        } => list_command(search, severity, page, json).await,
        AlertsSubcommands::Show { id } => show_command(id).await,
        AlertsSubcommands::Assign { id } => {
            let session = require_session()?;
            let alert = fetch(id).await?;
            let updated = with_spinner("Assigning...", alerts::assign(api_client(), alert, session.user_id())).await?;
            print_updated(&updated);
            Ok(())
        }
        AlertsSubcommands::Resolve { id, solution } => {
            let session = require_session()?;
            let alert = fetch(id).await?;
            let solution = match solution {
                Some(solution) => solution,
                None if ui::is_interactive() => prompts::prompt_solution()?,
                None => String::new(),
            };
            let today = Local::now().date_naive();
            let updated = with_spinner(
                "Resolving...",
                alerts::resolve(api_client(), alert, &solution, session.user_id(), today),
            )
            .await?;
            print_updated(&updated);
            Ok(())
        }
        AlertsSubcommands::Status { id, status } => {
            let session = require_session()?;
            let alert = fetch(id).await?;
            let today = Local::now().date_naive();
            let updated = with_spinner(
                "Updating status...",
                alerts::change_status(api_client(), alert, status, session.user_id(), today),
            )
            .await?;
            print_updated(&updated);
            Ok(())
        }
    }
}

async fn fetch(id: i64) -> Result<Probleme> {
    with_spinner("Loading alert...", api_client().problemes().get(id))
        .await
        .with_context(|| format!("Failed to load alert {}", id))
}

fn status_label(alert: &Probleme) -> &'static str {
    alert.statut.map(ProblemeStatut::label).unwrap_or("-")
}

fn severity_colored(alert: &Probleme) -> ColoredString {
    match alert.gravite {
        Some(Gravite::Critique) => Gravite::Critique.label().bright_red().bold(),
        Some(Gravite::Majeur) => Gravite::Majeur.label().bright_yellow(),
        Some(Gravite::Mineur) => Gravite::Mineur.label().normal(),
        None => "-".dimmed(),
    }
}

fn print_updated(alert: &Probleme) {
    println!(
        "  {} alert {} is now {}",
        "✓".bright_green().bold(),
        alert.id,
        status_label(alert).bright_white().bold()
    );
}

async fn list_command(search: Option<String>, severity: Option<Gravite>, page: usize, json: bool) -> Result<()> {
    let all = with_spinner("Loading alerts...", api_client().problemes().list())
        .await
        .context("Failed to load alerts")?;

    let matching = filter_alerts(&all, search.as_deref(), severity);
    let page = paginate(matching, page, global_config().display.alerts_page_size);

    if json {
        return print_json(&page.items);
    }

    print_header("Alerts");
    if page.is_empty() {
        println!("  {}", "No alerts match.".dimmed());
        return Ok(());
    }

    let mut table = Table::new(["ID", "Type", "Severity", "Status", "Well", "Description"]);
    for alert in &page.items {
        table.row([
            alert.id.to_string(),
            alert.type_label().to_string(),
            alert.gravite.map(Gravite::label).unwrap_or("-").to_string(),
            status_label(alert).to_string(),
            alert.well_name().unwrap_or("-").to_string(),
            truncate(alert.description.as_deref().unwrap_or(""), 50),
        ]);
    }
    table.print();
    println!();
    println!(
        "  {}  {}",
        page.range_label().dimmed(),
        format!("page {}/{}", page.page, page.total_pages).dimmed()
    );
    Ok(())
}

async fn show_command(id: i64) -> Result<()> {
    let alert = fetch(id).await?;
    let currency = &global_config().display.currency;

    print_header(&format!("Alert #{} - {}", alert.id, alert.type_label()));
    println!();
    println!("  {}: {}", "Severity".dimmed(), severity_colored(&alert));
    println!("  {}: {}", "Status".dimmed(), status_label(&alert).bright_white());
    if let Some(well) = alert.well_name() {
        println!("  {}: {}", "Well".dimmed(), well.cyan());
    }
    if let Some(operation) = alert.operation_label() {
        println!("  {}: {}", "Operation".dimmed(), operation.cyan());
    }
    if let Some(description) = &alert.description {
        println!("  {}: {}", "Description".dimmed(), description);
    }
    if let Some(detected) = &alert.date_detection {
        println!("  {}: {}", "Detected".dimmed(), detected);
    }
    if let Some(reporter) = Probleme::person_name(&alert.signale_par) {
        println!("  {}: {}", "Reported by".dimmed(), reporter);
    }
    if let Some(cost) = alert.impact_cout {
        println!("  {}: {} {}", "Cost impact".dimmed(), group_thousands(cost).bright_red(), currency);
    }
    if let Some(delay) = alert.impact_delai {
        println!("  {}: {} days", "Delay impact".dimmed(), group_thousands(delay).bright_red());
    }
    if let Some(proposed) = &alert.solution_propose {
        println!("  {}: {}", "Proposed solution".dimmed(), proposed);
    }
    if let Some(implemented) = &alert.solution_implemente {
        println!("  {}: {}", "Implemented solution".dimmed(), implemented.bright_green());
    }
    if let Some(resolver) = Probleme::person_name(&alert.resolu_par) {
        let date = alert.date_resolution.as_deref().unwrap_or("");
        println!("  {}: {} {}", "Handled by".dimmed(), resolver, date.dimmed());
    }
    Ok(())
}
