//! campuscal CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use campuscal_client::cli::{Cli, Command, ConfigAction};
use campuscal_client::commands;
use campuscal_client::config::ClientConfig;
use campuscal_client::error::ClientResult;
use campuscal_core::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = if cli.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::cli_quiet()
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let config_path = cli.config.clone().unwrap_or_else(ClientConfig::default_path);
    let config = match cli.config {
        Some(ref path) => ClientConfig::load_from(path)?,
        None => ClientConfig::load()?,
    };

    match cli.command {
        Some(Command::Month {
            month,
            select,
            no_fallback,
        }) => commands::month::run(&config, month, select, no_fallback, cli.json).await,
        Some(Command::Day { date, no_fallback }) => {
            commands::day::run(&config, date, no_fallback, cli.json).await
        }
        Some(Command::Sources) => commands::sources::run(&config, cli.json).await,
        Some(Command::Config { action }) => match action {
            ConfigAction::Dump => commands::config::dump(&config, &config_path),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(&config_path),
        },
        None => commands::month::run(&config, None, None, false, cli.json).await,
    }
}
