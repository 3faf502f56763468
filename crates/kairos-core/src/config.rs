//! # Orchestrator Configuration
//!
//! Tunable periods and per-cycle deltas.
//!
//! Every field has a default, so an empty document is a valid configuration.
//! Parsing happens in the app layer (TOML); this module only defines the
//! shape and validates it.

use crate::cycles::CycleKind;
use crate::events::DEFAULT_EVENT_CAPACITY;
use crate::types::KairosError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// =============================================================================
// DEFAULTS
// =============================================================================

pub const DEFAULT_EVOLUTION_SECS: u64 = 300;
pub const DEFAULT_HARMONIZATION_SECS: u64 = 600;
pub const DEFAULT_INNOVATION_SECS: u64 = 900;
pub const DEFAULT_MONITORING_SECS: u64 = 120;

pub const DEFAULT_EVOLUTION_DELTA: f64 = 0.1;
pub const DEFAULT_HARMONIZATION_BONUS: f64 = 2.0;
pub const DEFAULT_CREATIVITY_STEP: f64 = 0.5;
pub const DEFAULT_EVOLUTION_SPEED_STEP: f64 = 0.5;

/// Largest accepted event-bus capacity.
pub const MAX_EVENT_CAPACITY: usize = 1_000_000;

// =============================================================================
// SCHEDULE
// =============================================================================

/// Firing period of each background cycle, in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CycleSchedule {
    pub evolution_secs: u64,
    pub harmonization_secs: u64,
    pub innovation_secs: u64,
    pub monitoring_secs: u64,
}

impl Default for CycleSchedule {
    fn default() -> Self {
        Self {
            evolution_secs: DEFAULT_EVOLUTION_SECS,
            harmonization_secs: DEFAULT_HARMONIZATION_SECS,
            innovation_secs: DEFAULT_INNOVATION_SECS,
            monitoring_secs: DEFAULT_MONITORING_SECS,
        }
    }
}

impl CycleSchedule {
    /// Same period for every cycle (handy for tests and demos).
    #[must_use]
    pub fn uniform(secs: u64) -> Self {
        Self {
            evolution_secs: secs,
            harmonization_secs: secs,
            innovation_secs: secs,
            monitoring_secs: secs,
        }
    }

    #[must_use]
    pub fn period(&self, kind: CycleKind) -> Duration {
        let secs = match kind {
            CycleKind::Evolution => self.evolution_secs,
            CycleKind::Harmonization => self.harmonization_secs,
            CycleKind::Innovation => self.innovation_secs,
            CycleKind::Monitoring => self.monitoring_secs,
        };
        Duration::from_secs(secs)
    }
}

// =============================================================================
// TUNING
// =============================================================================

/// Per-cycle adjustment constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Score added to each below-ceiling component per evolution tick.
    pub evolution_delta: f64,
    /// Alignment bonus added to the mean score for the harmonization index.
    pub harmonization_bonus: f64,
    /// Creativity gained per innovation tick.
    pub creativity_step: f64,
    /// Evolution speed gained per evolution event.
    pub evolution_speed_step: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            evolution_delta: DEFAULT_EVOLUTION_DELTA,
            harmonization_bonus: DEFAULT_HARMONIZATION_BONUS,
            creativity_step: DEFAULT_CREATIVITY_STEP,
            evolution_speed_step: DEFAULT_EVOLUTION_SPEED_STEP,
        }
    }
}

// =============================================================================
// ORCHESTRATOR CONFIG
// =============================================================================

/// Complete orchestrator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    pub schedule: CycleSchedule,
    pub tuning: Tuning,
    /// Ring-buffer capacity of the event bus.
    pub event_capacity: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            schedule: CycleSchedule::default(),
            tuning: Tuning::default(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl OrchestratorConfig {
    /// Reject values that would stall the scheduler or break the score bounds.
    pub fn validate(&self) -> Result<(), KairosError> {
        for kind in CycleKind::ALL {
            if self.schedule.period(kind).is_zero() {
                return Err(KairosError::ConfigError(format!(
                    "schedule period for {} cycle must be greater than zero",
                    kind
                )));
            }
        }

        let steps = [
            ("evolution_delta", self.tuning.evolution_delta),
            ("harmonization_bonus", self.tuning.harmonization_bonus),
            ("creativity_step", self.tuning.creativity_step),
            ("evolution_speed_step", self.tuning.evolution_speed_step),
        ];
        for (name, value) in steps {
            if !value.is_finite() || value < 0.0 {
                return Err(KairosError::ConfigError(format!(
                    "tuning.{} must be a finite, non-negative number (got {})",
                    name, value
                )));
            }
        }

        if self.event_capacity == 0 || self.event_capacity > MAX_EVENT_CAPACITY {
            return Err(KairosError::ConfigError(format!(
                "event_capacity must be between 1 and {} (got {})",
                MAX_EVENT_CAPACITY, self.event_capacity
            )));
        }

        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
