pub mod alerts;
pub mod auth;
pub mod dashboard;
pub mod operations;
pub mod phases;
pub mod report;
pub mod settings;
pub mod users;
pub mod wells;

use anyhow::{Result, bail};
use colored::*;
use forage_cli::api::resilience::RateLimiterStats;
use forage_cli::api::MetricsSnapshot;
use forage_cli::auth::{Session, SessionStore};
use forage_cli::ui;
use forage_cli::ui::prompts::prompt_delete_confirmation;
use serde::Serialize;

/// The signed-in session, or an error telling the user to log in
pub fn require_session() -> Result<Session> {
    match SessionStore::default_location()?.load()? {
        Some(session) => Ok(session),
        None => bail!("Not signed in. Run 'forage-cli auth login' first."),
    }
}

/// Current session if any; a broken session file is treated as signed out
pub fn current_session() -> Option<Session> {
    SessionStore::default_location()
        .and_then(|store| store.load())
        .unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable session: {}", e);
            None
        })
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Ask before a delete unless `--force` was given
pub fn confirm_delete(what: &str, force: bool) -> Result<bool> {
    if force {
        return Ok(true);
    }
    if !ui::is_interactive() {
        bail!("Refusing to delete {} without --force in a non-interactive session", what);
    }
    prompt_delete_confirmation(what)
}

pub fn print_header(title: &str) {
    println!();
    println!("  {}", title.bright_blue().bold());
    println!("  {}", "═".repeat(title.chars().count()).bright_blue());
}

pub fn print_stats(snapshot: &MetricsSnapshot, limiter: &RateLimiterStats) {
    let overall = &snapshot.overall;
    print_header("API statistics");
    println!(
        "  {}: {}  {}: {}  {}: {}",
        "Requests".dimmed(),
        overall.calls.to_string().cyan(),
        "Failed".dimmed(),
        overall.failed.to_string().cyan(),
        "Retries".dimmed(),
        overall.retries.to_string().cyan()
    );
    println!(
        "  {}: {:.1}%  {}: {:?}  {}: {:?}",
        "Error rate".dimmed(),
        overall.error_rate(),
        "Average".dimmed(),
        overall.average(),
        "p95".dimmed(),
        snapshot.p95
    );
    if limiter.enabled && limiter.requests_delayed > 0 {
        println!(
            "  {}: {:?} over {} waits ({:.0}% of requests, limit {}/min)",
            "Rate limited".dimmed(),
            snapshot.throttled_for,
            limiter.requests_delayed,
            limiter.delay_rate() * 100.0,
            limiter.requests_per_minute
        );
    }

    if snapshot.resources.is_empty() {
        return;
    }
    let mut table = ui::Table::new(["Resource", "Calls", "Success", "Average", "Max"]);
    for resource in &snapshot.resources {
        let counts = &resource.counts;
        table.row([
            resource.resource.clone(),
            counts.calls.to_string(),
            format!("{:.0}%", counts.success_rate()),
            format!("{:?}", counts.average()),
            format!("{:?}", counts.slowest),
        ]);
    }
    println!();
    table.print();
}
