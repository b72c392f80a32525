use anyhow::Result;
use clap::Parser;
use forage_cli::api::ForageClient;
use forage_cli::config::Config;
use log::{debug, info};
use once_cell::sync::OnceCell;

mod cli;

use cli::Cli;
use cli::app::Commands;

// Global Config instance
static CONFIG: OnceCell<Config> = OnceCell::new();

/// Get a reference to the global Config
pub fn global_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

// Global API client, carrying the session token when signed in
static CLIENT: OnceCell<ForageClient> = OnceCell::new();

/// Get a reference to the global API client
pub fn api_client() -> &'static ForageClient {
    CLIENT.get().expect("API client not initialized")
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger to file (truncate on each run)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("forage-cli.log")?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    if let Ok(path) = dotenvy::dotenv() {
        debug!("Loaded environment from {}", path.display());
    }

    let cli = Cli::parse();
    info!("Starting forage-cli");
    forage_cli::ui::init_colors();

    let config = Config::load()?;
    CONFIG
        .set(config)
        .map_err(|_| anyhow::anyhow!("Failed to initialize global Config"))?;

    // Settings never touch the backend
    let command = match cli.command {
        Commands::Settings(args) => return cli::commands::settings::settings_command(args),
        command => command,
    };

    let config = global_config();
    let mut client = ForageClient::new(
        &config.effective_base_url(),
        config.resilience_config(),
        config.timeout(),
    )?;
    if let Some(session) = cli::commands::current_session() {
        debug!("Using session of user {}", session.user_id());
        client = client.with_token(session.token);
    }
    CLIENT
        .set(client)
        .map_err(|_| anyhow::anyhow!("Failed to initialize global API client"))?;

    use cli::commands::*;
    match command {
        Commands::Auth(args) => auth::auth_command(args).await?,
        Commands::Users(args) => users::users_command(args).await?,
        Commands::Wells(args) => wells::wells_command(args).await?,
        Commands::Dashboard(args) => dashboard::dashboard_command(args).await?,
        Commands::Phases(args) => phases::phases_command(args).await?,
        Commands::Operations(args) => operations::operations_command(args).await?,
        Commands::Report(args) => report::report_command(args).await?,
        Commands::Alerts(args) => alerts::alerts_command(args).await?,
        Commands::Settings(args) => settings::settings_command(args)?,
    }

    if cli.stats {
        print_stats(&api_client().metrics_snapshot(), &api_client().rate_limiter_stats());
    }

    Ok(())
}
