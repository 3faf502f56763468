//! # Kairos CLI Module
//!
//! This module implements the CLI interface for Kairos.
//!
//! ## Available Commands
//!
//! - `run` - Activate and keep the cycles running until Ctrl+C
//! - `status` - Show orchestrator status
//! - `component` - Show one component
//! - `events` - Show the most recent events
//! - `report` - Show the full report with recommendations
//! - `simulate` - Drive cycle ticks manually
//! - `evolve` - Evolve beyond supreme

mod commands;

use clap::{Parser, Subcommand};
use kairos::{Orchestrator, load_config};
use kairos_core::KairosError;
use std::path::PathBuf;
use std::sync::Arc;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Kairos - Phased Activation Orchestrator
///
/// Brings a fixed set of components online in order, then keeps tuning them
/// with periodic background cycles.
#[derive(Parser, Debug)]
#[command(name = "kairos")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML configuration file
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Activate and run the background cycles until Ctrl+C
    Run {
        /// Evolve beyond supreme right after activation
        #[arg(long)]
        evolve_beyond: bool,
    },

    /// Show orchestrator status
    Status,

    /// Show one component
    Component {
        /// Component name (core, security, harmony, ambient, unified)
        name: String,
    },

    /// Show the most recent events
    Events {
        /// Maximum number of events to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show the full report with recommendations
    Report,

    /// Drive every cycle manually and show the resulting status
    Simulate {
        /// Ticks per cycle
        #[arg(short, long, default_value = "10")]
        ticks: u32,
    },

    /// Evolve beyond supreme into the infinite phase
    Evolve,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), KairosError> {
    let config = load_config(cli.config.as_deref())?;
    let orchestrator = Arc::new(Orchestrator::new(config)?);
    let out = Output {
        json_mode: cli.json_mode,
        verbose: cli.verbose,
    };

    let result = match cli.command {
        Some(Commands::Run { evolve_beyond }) => {
            cmd_run(&orchestrator, out, evolve_beyond).await
        }
        Some(Commands::Status) => cmd_status(&orchestrator, out).await,
        Some(Commands::Component { name }) => cmd_component(&orchestrator, out, &name).await,
        Some(Commands::Events { limit }) => cmd_events(&orchestrator, out, limit).await,
        Some(Commands::Report) => cmd_report(&orchestrator, out).await,
        Some(Commands::Simulate { ticks }) => cmd_simulate(&orchestrator, out, ticks).await,
        Some(Commands::Evolve) => cmd_evolve(&orchestrator, out).await,
        None => {
            // No subcommand - show status by default
            cmd_status(&orchestrator, out).await
        }
    };

    orchestrator.stop().await;
    result
}
