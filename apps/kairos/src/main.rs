//! # Kairos - Phased Activation Orchestrator
//!
//! The main binary for the Kairos orchestrator.
//!
//! This application provides:
//! - The activation sequence and background cycle scheduler
//! - CLI interface for status, events and reports
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      apps/kairos (THE BINARY)                   │
//! │                                                                 │
//! │  ┌─────────────┐    ┌──────────────────┐    ┌──────────────┐   │
//! │  │   CLI       │    │   Orchestrator   │    │  Scheduler   │   │
//! │  │  (clap)     │───▶│ (Arc + RwLock)   │◀───│ (tokio x4)   │   │
//! │  └─────────────┘    └────────┬─────────┘    └──────────────┘   │
//! │                              ▼                                  │
//! │                      ┌───────────────┐                          │
//! │                      │  kairos-core  │                          │
//! │                      │ (THE LOGIC)   │                          │
//! │                      └───────────────┘                          │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Activate and keep the cycles running
//! kairos run --config kairos.toml
//!
//! # One-shot inspection
//! kairos status
//! kairos events --limit 5
//! kairos --json-mode report
//! ```

mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // KAIROS_LOG_FORMAT=json enables machine-parseable output.
    // Logs go to stderr; stdout carries only command output.
    let log_format = std::env::var("KAIROS_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "kairos=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Display startup banner
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Kairos startup banner.
fn print_banner() {
    println!(
        r#"
  ██╗  ██╗ █████╗ ██╗██████╗  ██████╗ ███████╗
  ██║ ██╔╝██╔══██╗██║██╔══██╗██╔═══██╗██╔════╝
  █████╔╝ ███████║██║██████╔╝██║   ██║███████╗
  ██╔═██╗ ██╔══██║██║██╔══██╗██║   ██║╚════██║
  ██║  ██╗██║  ██║██║██║  ██║╚██████╔╝███████║
  ╚═╝  ╚═╝╚═╝  ╚═╝╚═╝╚═╝  ╚═╝ ╚═════╝ ╚══════╝

  Phased Activation Orchestrator v{}

  Ordered • Bounded • Self-Tuning
"#,
        env!("CARGO_PKG_VERSION")
    );
}
