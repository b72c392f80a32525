use super::commands::alerts::AlertsCommands;
use super::commands::auth::AuthCommands;
use super::commands::dashboard::DashboardCommands;
use super::commands::operations::OperationsCommands;
use super::commands::phases::PhasesCommands;
use super::commands::report::ReportCommands;
use super::commands::settings::SettingsCommands;
use super::commands::users::UsersCommands;
use super::commands::wells::WellsCommands;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "forage-cli")]
#[command(about = "Console for well-drilling operations: wells, phases, reports and alerts")]
#[command(version)]
pub struct Cli {
    /// Print API call metrics after the command
    #[arg(long, global = true)]
    pub stats: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in, sign out and session status
    Auth(AuthCommands),
    /// List, add and export users
    Users(UsersCommands),
    /// Wells and their drilling progress
    Wells(WellsCommands),
    /// Cost and overrun overview
    Dashboard(DashboardCommands),
    /// Phases of a forage
    Phases(PhasesCommands),
    /// Operations of a phase or forage
    Operations(OperationsCommands),
    /// Daily and provisional reports
    Report(ReportCommands),
    /// Detected problems and their resolution
    Alerts(AlertsCommands),
    /// Application settings management
    Settings(SettingsCommands),
}

