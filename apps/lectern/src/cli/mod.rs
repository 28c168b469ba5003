//! # Lectern CLI Module
//!
//! This module implements the CLI interface for Lectern.
//!
//! ## Available Commands
//!
//! - `serve` - Start the HTTP server for the presentation UI
//! - `status` - Show deck and storage status
//! - `list` - List slides
//! - `refresh` - Refresh citations for every slide
//! - `export` - Write the printable deck layout to a file
//! - `reset` - Discard edits and reinstall the shipped content
//! - `quiz` - Print the quiz with answers

mod commands;

use crate::config::{AppConfig, DEFAULT_CONFIG_FILE};
use clap::{Parser, Subcommand, ValueEnum};
use lectern_core::LecternError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Lectern - clinical lecture deck server
///
/// Serves and maintains an evidence-referenced slide deck with
/// auto-saved edits and live bibliographic lookups.
#[derive(Parser, Debug)]
#[command(name = "lectern")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Path to the deck database (overrides config and LECTERN_DB)
    #[arg(short = 'D', long, global = true)]
    pub database: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Export file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Text,
    Json,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Serve {
        /// Host to bind to (overrides config)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show deck and storage status
    Status,

    /// List slides in order
    List,

    /// Refresh citations for every slide from the bibliographic services
    Refresh,

    /// Export the deck as printable pages
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Export format
        #[arg(short = 't', long, value_enum, default_value = "text")]
        format: ExportFormat,

        /// Leave the source list off each page
        #[arg(long)]
        no_citations: bool,
    },

    /// Discard stored edits and reinstall the shipped content
    Reset,

    /// Print the quiz questions with their answers
    Quiz,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Resolve configuration: defaults, then the file, then environment, then
/// command-line flags.
pub fn resolve_config(cli: &Cli) -> Result<AppConfig, LecternError> {
    let mut config = AppConfig::load(&cli.config)?;
    config.apply_env()?;
    if let Some(database) = &cli.database {
        config.store.path.clone_from(database);
    }
    Ok(config)
}

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), LecternError> {
    let mut config = resolve_config(&cli)?;
    let json_mode = cli.json;

    match cli.command {
        Some(Commands::Serve { host, port }) => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            cmd_serve(&config).await
        }
        Some(Commands::Status) => cmd_status(&config, json_mode),
        Some(Commands::List) => cmd_list(&config, json_mode),
        Some(Commands::Refresh) => cmd_refresh(&config, json_mode).await,
        Some(Commands::Export {
            output,
            format,
            no_citations,
        }) => cmd_export(&config, &output, format, !no_citations),
        Some(Commands::Reset) => cmd_reset(&config, json_mode),
        Some(Commands::Quiz) => cmd_quiz(json_mode),
        None => {
            // No subcommand - show status by default
            cmd_status(&config, json_mode)
        }
    }
}
