mod cli;
mod config;
mod db;
mod engine;
mod migration;
mod models;
mod report;
mod session;
mod tui;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;

use cli::args::{Cli, Commands};
use cli::handlers;
use config::AppConfig;
use db::SqliteStore;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Loading config")?;
    ensure_config(&config)?;

    let db_path = config.ensure_db_dir()?;
    let store = SqliteStore::open(&db_path)
        .with_context(|| format!("Opening database at {:?}", db_path))?;

    match cli.command {
        Some(cmd) => match cmd {
            Commands::Prayer { action } => handlers::handle_prayer(&store, &config, action.as_ref())?,
            Commands::Qaza { action } => handlers::handle_qaza(&store, &config, action.as_ref())?,
            Commands::Growth { action } => handlers::handle_growth(&store, &config, action.as_ref())?,
            Commands::Task { action } => handlers::handle_task(&store, &config, action.as_ref())?,
            Commands::Contact { action } => handlers::handle_contact(&store, &config, action.as_ref())?,
            Commands::Report { period } => handlers::handle_report(&store, &config, &period)?,
            Commands::Settings { action } => handlers::handle_settings(&store, &config, action.as_ref())?,
            Commands::Import { file } => handlers::handle_import(&store, &config, &file)?,
            Commands::Wipe { yes } => handlers::handle_wipe(&store, &config, yes)?,
        },

        // No subcommand → launch TUI
        None => tui::app::run(&store, config)?,
    }

    Ok(())
}

/// Write the default config on first run so the user has a file to edit.
fn ensure_config(config: &AppConfig) -> Result<()> {
    let path = AppConfig::config_path()?;
    if !path.exists() {
        config.save()?;
        eprintln!("Created default config at {:?}", path);
        log::info!("Wrote default config for user {}", config.user.id);
    }
    Ok(())
}
