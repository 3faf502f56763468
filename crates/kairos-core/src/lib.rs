//! # kairos-core
//!
//! The deterministic orchestration engine for Kairos - THE LOGIC.
//!
//! This crate owns the single [`OrchestratorState`]: a fixed registry of
//! capability components, the phase machine that activates them, the four
//! background cycle bodies, the bounded event bus and the metrics derived
//! from all of it.
//!
//! ## Layout
//!
//! - `types` → scores, component status, event types, errors
//! - `system` → phase machine and capability flags
//! - `registry` / `events` / `metrics` → the three stores behind the state
//! - `activation` / `cycles` → every operation that mutates the state
//! - `report` → serializable read models
//!
//! ## Architectural Constraints
//!
//! The CORE:
//! - Is the ONLY place where orchestrator state lives
//! - Never initiates work; the app layer decides when a cycle fires
//! - Has NO async, NO I/O and NO logging
//! - Reports failures as values; the caller decides how loudly to log them

// =============================================================================
// MODULES
// =============================================================================

pub mod activation;
pub mod config;
pub mod cycles;
pub mod events;
pub mod metrics;
pub mod registry;
pub mod report;
pub mod state;
pub mod system;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    ComponentStatus, EventType, KairosError, SCORE_CEILING, SCORE_FLOOR, clamp_score,
};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use activation::{ActivationOutcome, ActivationPlan, ActivationRoutine, ProfileRoutine};
pub use config::{CycleSchedule, OrchestratorConfig, Tuning};
pub use cycles::{CycleFailure, CycleKind, CycleReport};
pub use events::{ALL_COMPONENTS, DEFAULT_EVENT_CAPACITY, Event, EventBus, EventDraft, EventSink};
pub use metrics::{MetricsAggregator, SystemMetrics};
pub use registry::{COMPONENT_ORDER, Component, ComponentRegistry};
pub use report::{ComponentSnapshot, Report, StatusSnapshot};
pub use state::OrchestratorState;

// =============================================================================
// RE-EXPORTS: System (from system module)
// =============================================================================

pub use system::{CapabilityFlag, CapabilityFlags, Phase};
