//! # Lectern - Clinical Lecture Deck Server
//!
//! The main binary for the Lectern deck engine.
//!
//! This application provides:
//! - HTTP REST API server (axum-based) for the presentation UI
//! - CLI interface for deck maintenance
//! - Live citation refresh from PubMed and CrossRef
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     apps/lectern (THE BINARY)                   │
//! │                                                                 │
//! │  ┌─────────────┐    ┌─────────────┐    ┌──────────────────┐    │
//! │  │   CLI       │    │   HTTP API  │    │ Citation Resolver│    │
//! │  │  (clap)     │    │   (axum)    │    │    (reqwest)     │    │
//! │  └──────┬──────┘    └──────┬──────┘    └────────┬─────────┘    │
//! │         └──────────────────┼────────────────────┘              │
//! │                            ▼                                   │
//! │                  ┌───────────────────┐                         │
//! │                  │  DeckController   │                         │
//! │                  │ (debounced saves) │                         │
//! │                  └─────────┬─────────┘                         │
//! │                            ▼                                   │
//! │                    ┌───────────────┐                           │
//! │                    │ lectern-core  │                           │
//! │                    │ (THE LOGIC)   │                           │
//! │                    └───────────────┘                           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! lectern serve --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! lectern status
//! lectern refresh
//! lectern export -o deck.txt
//! ```

use clap::Parser;
use lectern::cli;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "lectern=info,lectern_core=info,tower_http=debug";

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // LECTERN_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("LECTERN_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = EnvFilter::try_from_env("LECTERN_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_banner() {
    println!(
        r#"
  Lectern v{}
  Diabetic Foot Ulcer lecture deck · UNTH Burns, Plastic & Reconstructive Surgery
"#,
        env!("CARGO_PKG_VERSION")
    );
}
