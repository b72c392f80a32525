//! Daily and provisional report submission

use super::{current_session, print_header};
use crate::{api_client, global_config};
use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand, ValueEnum};
use colored::*;
use forage_cli::api::models::dates::display_date;
use forage_cli::reports::template::{DAILY_TEMPLATE, PROVISIONAL_TEMPLATE};
use forage_cli::reports::{
    DailyReportContext, DailyReportDraft, NO_ACTIVE_PHASES, PlanFile, ProvisionalPlan, submit_daily_report,
    submit_plan, validate_dates, validate_operations,
};
use forage_cli::tracking::format::{format_currency, group_thousands};
use forage_cli::ui::{self, Table, prompts, with_spinner};
use log::info;
use std::path::PathBuf;

#[derive(Args)]
pub struct ReportCommands {
    #[command(subcommand)]
    pub command: ReportSubcommands,
}

#[derive(Subcommand)]
pub enum ReportSubcommands {
    /// Submit the end-of-day report for a well
    Daily {
        puit_id: i64,
        /// TOML draft; prompts interactively when omitted
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Show or update the provisional plan of a well
    Provisional {
        puit_id: i64,
        /// TOML plan applied over the current plan
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Validate and show the merged plan without sending it
        #[arg(long)]
        dry_run: bool,
    },
    /// Print a starter file
    Template {
        #[arg(value_enum)]
        kind: TemplateKind,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TemplateKind {
    Daily,
    Provisional,
}

pub async fn report_command(args: ReportCommands) -> Result<()> {
    match args.command {
        ReportSubcommands::Daily { puit_id, file } => daily_command(puit_id, file).await,
        ReportSubcommands::Provisional { puit_id, file, dry_run } => {
            provisional_command(puit_id, file, dry_run).await
        }
        ReportSubcommands::Template { kind } => {
            match kind {
                TemplateKind::Daily => print!("{}", DAILY_TEMPLATE),
                TemplateKind::Provisional => print!("{}", PROVISIONAL_TEMPLATE),
            }
            Ok(())
        }
    }
}

async fn daily_command(puit_id: i64, file: Option<PathBuf>) -> Result<()> {
    let client = api_client();
    let ctx = with_spinner("Loading well data...", DailyReportContext::load(client, puit_id))
        .await
        .with_context(|| format!("Failed to load well {}", puit_id))?;

    let draft = match file {
        Some(path) => DailyReportDraft::from_file(&path)?,
        None if ui::is_interactive() => {
            let phases = ctx.active_phases();
            if phases.is_empty() && !ctx.phases.is_empty() {
                bail!(NO_ACTIVE_PHASES);
            }
            print_header(&format!("Daily report for {}", ctx.puit.display_name()));
            let mut draft = prompts::prompt_daily_header(&phases)?;
            if let Some(phase_id) = draft.phase_id {
                let available = with_spinner("Loading operations...", ctx.available_operations(client, phase_id))
                    .await
                    .context("Failed to load the operations of the current phase")?;
                prompts::prompt_draft_operations(&mut draft, &available, &ctx.indicator_types)?;
            }
            draft
        }
        None => bail!("No draft given; pass --file or run in an interactive terminal"),
    };

    let outcome = with_spinner("Submitting daily report...", submit_daily_report(client, &ctx, &draft)).await?;
    info!(
        "Daily report {} submitted with {} updated operations",
        outcome.report.id,
        outcome.updated_operation_ids.len()
    );

    println!();
    println!("  {}", outcome.summary(&global_config().display.currency).bright_green());
    Ok(())
}

fn print_plan(plan: &ProvisionalPlan, currency: &str) {
    print_header(&plan.title);
    for phase in &plan.phases {
        println!();
        println!(
            "  {} {}  {}",
            format!("Phase {} - {}", phase.number, phase.diametre.label()).bright_white().bold(),
            phase.description.as_deref().unwrap_or("").dimmed(),
            format!(
                "{} → {}, {} m",
                display_date(phase.start_date),
                display_date(phase.end_date),
                phase.planned_depth.map(group_thousands).unwrap_or_else(|| "-".into())
            )
            .cyan()
        );
        if phase.operations.is_empty() {
            continue;
        }
        let mut table = Table::new(["ID", "Operation", "Code", "Cost", "State"]);
        for op in &phase.operations {
            let cells = [
                op.id.map(|id| id.to_string()).unwrap_or_else(|| "new".into()),
                op.display_name().to_string(),
                op.code.clone().unwrap_or_default(),
                group_thousands(op.cost),
                if op.active { "active" } else { "closed" }.to_string(),
            ];
            if op.active {
                table.row(cells);
            } else {
                table.muted_row(cells);
            }
        }
        table.print();
    }
    println!();
    println!(
        "  {}: {}",
        "Total planned".dimmed(),
        format_currency(plan.total_planned_cost(), currency).cyan().bold()
    );
}

async fn provisional_command(puit_id: i64, file: Option<PathBuf>, dry_run: bool) -> Result<()> {
    let client = api_client();
    let currency = &global_config().display.currency;

    let (loaded, catalog) = with_spinner("Loading plan...", async {
        futures::try_join!(
            ProvisionalPlan::load(client, puit_id),
            async { client.catalog().type_operations().await.context("Failed to load operation types") }
        )
    })
    .await?;
    let (mut plan, mut snapshot) = loaded;

    let Some(path) = file else {
        print_plan(&plan, currency);
        return Ok(());
    };
    plan.merge(PlanFile::from_file(&path)?)?;
    print_plan(&plan, currency);

    let date_issues = validate_dates(&plan.phases);
    let operation_issues = validate_operations(&plan.phases, &catalog);
    if !date_issues.is_empty() || !operation_issues.is_empty() {
        println!();
        for issue in &date_issues {
            println!("  {} {}", "✗".bright_red(), issue.message.red());
        }
        for issue in &operation_issues {
            println!("  {} {}", "✗".bright_red(), issue.red());
        }
        bail!("The plan has validation errors; nothing was sent");
    }

    if dry_run {
        println!("\n  {}", "Dry run: plan is valid, nothing was sent.".dimmed());
        return Ok(());
    }

    let forage_id = plan.forage_id.context("No forages found for this well.")?;
    let created_by = current_session().map(|s| s.user_id());
    let outcome = with_spinner(
        "Saving plan...",
        submit_plan(client, forage_id, &mut plan, &mut snapshot, &catalog, created_by),
    )
    .await
    .context("Failed to save the provisional plan")?;

    println!();
    if outcome.issues.is_empty() {
        println!("  {}", outcome.summary().bright_green());
    } else {
        println!("  {}", outcome.summary().yellow());
    }
    Ok(())
}
