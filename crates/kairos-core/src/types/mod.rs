//! # Core Type Definitions
//!
//! This module contains the shared vocabulary of the orchestrator:
//! - Component lifecycle status (`ComponentStatus`)
//! - Event classification (`EventType`)
//! - Error types (`KairosError`)
//!
//! ## Ordering Guarantees
//!
//! Every enum here implements `Ord` so that "never regresses" rules can be
//! enforced with a plain `max`.

use crate::system::Phase;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// SCORE BOUNDS
// =============================================================================

/// Lower bound of every component score and metric.
pub const SCORE_FLOOR: f64 = 0.0;

/// Upper bound of every component score and metric.
pub const SCORE_CEILING: f64 = 100.0;

/// Clamp a value into `[SCORE_FLOOR, SCORE_CEILING]`.
///
/// NaN collapses to the floor so a corrupted input can never escape the range.
#[must_use]
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        return SCORE_FLOOR;
    }
    value.clamp(SCORE_FLOOR, SCORE_CEILING)
}

// =============================================================================
// COMPONENT STATUS
// =============================================================================

/// Lifecycle status of a component.
///
/// Ordered: `Dormant < Activating < Active < Transcendent`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum ComponentStatus {
    /// Created, never activated.
    #[default]
    Dormant,
    /// Activation routine is running.
    Activating,
    /// Activated below the transcendence threshold.
    Active,
    /// Activated at or above the transcendence threshold.
    Transcendent,
}

impl ComponentStatus {
    /// Score at or above which an activated component is `Transcendent`.
    pub const TRANSCENDENCE_THRESHOLD: f64 = 95.0;

    /// Status reached by a component that finished activation with `score`.
    #[must_use]
    pub fn for_activated_score(score: f64) -> Self {
        if score >= Self::TRANSCENDENCE_THRESHOLD {
            Self::Transcendent
        } else {
            Self::Active
        }
    }

    /// Lowercase name used in reports.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dormant => "dormant",
            Self::Activating => "activating",
            Self::Active => "active",
            Self::Transcendent => "transcendent",
        }
    }
}

impl std::fmt::Display for ComponentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// EVENT TYPE
// =============================================================================

/// Classification of a published event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Activation,
    Evolution,
    Harmonization,
    Innovation,
    Transcendence,
    Monitoring,
}

impl EventType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Activation => "activation",
            Self::Evolution => "evolution",
            Self::Harmonization => "harmonization",
            Self::Innovation => "innovation",
            Self::Transcendence => "transcendence",
            Self::Monitoring => "monitoring",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Kairos system.
///
/// - No silent failures outside background cycle bodies
/// - Use `Result<T, KairosError>` for fallible operations
/// - The core never panics; all errors are recoverable
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KairosError {
    /// The requested component is not in the registry.
    #[error("Component not found: {0}")]
    NotFound(String),

    /// The operation is not valid in the current phase.
    #[error("Operation '{operation}' is invalid in phase {phase}")]
    InvalidPhase {
        operation: &'static str,
        phase: Phase,
    },

    /// A per-component activation routine failed; the sequence was aborted.
    #[error("Activation failed at component '{component}': {source}")]
    ActivationFailed {
        component: String,
        #[source]
        source: Box<KairosError>,
    },

    /// An activation routine reported an error of its own.
    #[error("Activation routine failed: {0}")]
    RoutineFailed(String),

    /// A score adjustment was rejected (non-finite delta).
    #[error("Invalid adjustment {delta} for component '{component}'")]
    InvalidAdjustment { component: String, delta: f64 },

    /// Configuration could not be parsed or failed validation.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An I/O error occurred (app layer only).
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_score_bounds() {
        assert_eq!(clamp_score(-5.0), SCORE_FLOOR);
        assert_eq!(clamp_score(150.0), SCORE_CEILING);
        assert_eq!(clamp_score(42.5), 42.5);
        assert_eq!(clamp_score(f64::NAN), SCORE_FLOOR);
        assert_eq!(clamp_score(f64::INFINITY), SCORE_CEILING);
    }

    #[test]
    fn status_ordering() {
        assert!(ComponentStatus::Dormant < ComponentStatus::Activating);
        assert!(ComponentStatus::Activating < ComponentStatus::Active);
        assert!(ComponentStatus::Active < ComponentStatus::Transcendent);
    }

    #[test]
    fn status_for_activated_score() {
        assert_eq!(
            ComponentStatus::for_activated_score(94.9),
            ComponentStatus::Active
        );
        assert_eq!(
            ComponentStatus::for_activated_score(95.0),
            ComponentStatus::Transcendent
        );
    }

    #[test]
    fn event_type_serializes_snake_case() {
        let json = serde_json::to_string(&EventType::Harmonization).expect("serialize");
        assert_eq!(json, "\"harmonization\"");
    }

    #[test]
    fn activation_failed_wraps_source() {
        let err = KairosError::ActivationFailed {
            component: "security".to_string(),
            source: Box::new(KairosError::RoutineFailed("sensor offline".to_string())),
        };
        let message = err.to_string();
        assert!(message.contains("security"));
        assert!(message.contains("sensor offline"));
    }
}
