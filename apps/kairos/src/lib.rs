//! # kairos
//!
//! The async shell around `kairos-core`: the shared [`Orchestrator`] facade,
//! the background [`CycleScheduler`] and configuration loading.
//!
//! The binary in `main.rs` adds the CLI and tracing setup on top.

pub mod config;
pub mod orchestrator;
pub mod scheduler;

pub use config::load_config;
pub use orchestrator::Orchestrator;
pub use scheduler::{CycleScheduler, SharedState};
