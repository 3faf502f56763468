//! # System Module
//!
//! Orchestrator-wide phase and capability definitions.
//!
//! The phase ASSESSMENT is pure and deterministic; the transitions themselves
//! are driven by [`crate::state::OrchestratorState`].

mod phase;

pub use phase::*;
