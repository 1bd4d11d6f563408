//! Entity Console - interactive record management over the bundled SQLite tables
//!
//! Configuration comes from the environment (and `.env`), then
//! `entity-console.yaml`, then defaults. Logs go to stderr so they never mix
//! with the menu on stdout.

use std::process::ExitCode;

use entity_console::session::check_coverage;
use entity_console::{models, App, AppConfig, Database, DbmsError, SessionFactory, TerminalConsole};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Load environment variables
    dotenv::dotenv().ok();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_console_closed() => {
            tracing::info!("Input closed, exiting");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &AppConfig) -> Result<(), DbmsError> {
    let catalog = models::catalog()?;

    let database = Database::new_with_config(
        &config.database_url,
        config.pool.clone(),
        models::TABLE_STORES,
    )?;
    database.initialize_schema()?;
    check_coverage(&catalog, database.open()?.as_ref())?;

    let mut console = TerminalConsole::new()
        .map_err(|e| DbmsError::Config(format!("Cannot open terminal: {}", e)))?;
    App::new(&catalog, &database, config.page_size).run(&mut console)
}
