use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use drupal_token::cache::store::build_store;
use drupal_token::config::proc_loader;
use drupal_token::manager::token_manager::TokenManager;
use drupal_token::server;
use drupal_token::utils::logging::{self, LogLevel};
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML config; without it the configuration is read from the environment
    #[arg(short, long, env = "CONFIG")]
    config: Option<String>,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Print the current token as JSON
    Token,
    /// Serve the current token over HTTP
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Load config
    // -------------------------------

    let args = Args::parse();
    let service_config = match &args.config {
        Some(path) => proc_loader::file_to_config(Path::new(path)).await?,
        None => proc_loader::env_to_config().await?,
    };
    logging::run(&service_config, args.log_level)?;

    // -------------------------------
    // 2. Build store and token manager
    // -------------------------------

    let store = build_store(&service_config.settings.storage);
    info!("token store '{}', key '{}'", store.name(), service_config.settings.storage.key());
    let manager = TokenManager::new(&service_config, store)?;
    info!("token endpoint '{}'", manager.token_url());

    // -------------------------------
    // 3. Run
    // -------------------------------

    match args.command.unwrap_or(Command::Token) {
        Command::Token => {
            let token = manager.get_token().await?;
            println!("{}", serde_json::to_string_pretty(&token)?);
        }
        Command::Serve => {
            server::server::start(&service_config.settings, Arc::new(manager)).await?;
        }
    }

    Ok(())
}
