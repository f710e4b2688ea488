//! Command-line interface definition.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use campuscal_core::DateKey;

use crate::error::{ClientError, ClientResult};

/// campuscal - School calendar in the terminal
#[derive(Debug, Parser)]
#[command(name = "campuscal")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "CAMPUSCAL_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show a month grid and the selected day's events
    Month {
        /// Month to show (YYYY-MM), defaults to the current month
        #[arg(long, short, value_parser = parse_month)]
        month: Option<NaiveDate>,

        /// Day to select (YYYY-MM-DD)
        #[arg(long, short)]
        select: Option<DateKey>,

        /// Do not show placeholder events when no source returns anything
        #[arg(long)]
        no_fallback: bool,
    },

    /// List the events of one day
    Day {
        /// Day to list (YYYY-MM-DD), defaults to today
        date: Option<DateKey>,

        /// Do not show placeholder events when no source returns anything
        #[arg(long)]
        no_fallback: bool,
    },

    /// Fetch every source and report what each contributed
    Sources,

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}

/// Parses a `YYYY-MM` argument into the first day of that month.
pub fn parse_month(value: &str) -> ClientResult<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", value.trim()), "%Y-%m-%d")
        .map_err(|_| ClientError::date_argument(value, "YYYY-MM"))
}
