//! punchtracker library root.
//! Exposes the CLI parser, the high-level run() function, and the modules
//! behind it: preference and record stores, the capture session, the route
//! viewer and its export surfaces.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod prefs;
pub mod store;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::AppContext;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub async fn dispatch(cli: &Cli, ctx: &AppContext) -> AppResult<()> {
    use crate::cli::commands;

    match &cli.command {
        Commands::Init => commands::init::handle(cli, ctx),
        Commands::Config { .. } => commands::config::handle(&cli.command, ctx),
        Commands::Db { .. } => commands::db::handle(&cli.command, ctx),
        Commands::Log { .. } => commands::log::handle(&cli.command, ctx),
        Commands::Login { .. } => commands::auth::handle_login(&cli.command, ctx),
        Commands::Logout => commands::auth::handle_logout(ctx),
        Commands::Home => commands::home::handle(ctx),
        Commands::Permission { .. } => commands::permission::handle(&cli.command, ctx),
        Commands::Track { .. } => commands::track::handle(&cli.command, ctx).await,
        Commands::Route { .. } => commands::route::handle(&cli.command, ctx).await,
        Commands::Export { .. } => commands::export::handle(&cli.command, ctx),
    }
}

/// Entry point used by main.rs
pub async fn run() -> AppResult<()> {
    // 1️⃣ parse CLI
    let cli = Cli::parse();

    // 2️⃣ load config once
    let mut cfg = Config::load()?;

    // 3️⃣ command-line overrides
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }
    if let Some(custom_prefs) = &cli.prefs {
        cfg.preferences = custom_prefs.clone();
    }

    // 4️⃣ hand everything to the dispatcher
    let ctx = AppContext::new(cfg, cli.test);
    dispatch(&cli, &ctx).await
}
