//! # Status and Reports
//!
//! Serializable read models. A [`StatusSnapshot`] is the short form shown by
//! `status`; a [`Report`] adds every component row, the tail of the event
//! history and rule-based recommendations.

use crate::events::Event;
use crate::metrics::SystemMetrics;
use crate::registry::Component;
use crate::state::OrchestratorState;
use crate::system::{CapabilityFlags, Phase};
use crate::types::{ComponentStatus, SCORE_CEILING};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of events included in a [`Report`].
pub const REPORT_EVENT_LIMIT: usize = 10;

// =============================================================================
// STATUS SNAPSHOT
// =============================================================================

/// One registry row, without tags or timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSnapshot {
    pub name: String,
    pub score: f64,
    pub status: ComponentStatus,
    pub evolution_count: u64,
}

impl From<&Component> for ComponentSnapshot {
    fn from(component: &Component) -> Self {
        Self {
            name: component.name.clone(),
            score: component.capability_score,
            status: component.status,
            evolution_count: component.evolution_count,
        }
    }
}

/// Point-in-time status of the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub phase: Phase,
    pub overall_level: f64,
    pub components: Vec<ComponentSnapshot>,
    pub capability_flags: CapabilityFlags,
    pub metrics: SystemMetrics,
    pub is_activated: bool,
    pub activated_at: Option<DateTime<Utc>>,
    pub events_published: u64,
    pub timestamp: DateTime<Utc>,
}

impl StatusSnapshot {
    #[must_use]
    pub fn capture(state: &OrchestratorState) -> Self {
        Self {
            phase: state.phase(),
            overall_level: state.overall_level(),
            components: state.registry().iter().map(ComponentSnapshot::from).collect(),
            capability_flags: state.capability_flags(),
            metrics: state.metrics(),
            is_activated: state.is_activated(),
            activated_at: state.activated_at(),
            events_published: state.events_published(),
            timestamp: Utc::now(),
        }
    }
}

// =============================================================================
// REPORT
// =============================================================================

/// Full orchestrator report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub status: StatusSnapshot,
    pub components: Vec<Component>,
    /// The newest events, oldest first.
    pub recent_events: Vec<Event>,
    pub recommendations: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl Report {
    #[must_use]
    pub fn generate(state: &OrchestratorState) -> Self {
        let status = StatusSnapshot::capture(state);
        let recommendations = recommendations(&status);
        Self {
            components: state.registry().iter().cloned().collect(),
            recent_events: state.recent_events(REPORT_EVENT_LIMIT),
            recommendations,
            generated_at: status.timestamp,
            status,
        }
    }
}

/// Derive recommendations from a snapshot.
///
/// Metric hints come first in [`SystemMetrics::fields`] order, then
/// components below `active`, then the phase hint.
#[must_use]
pub fn recommendations(status: &StatusSnapshot) -> Vec<String> {
    let mut out: Vec<String> = status
        .metrics
        .fields()
        .into_iter()
        .filter(|(_, value)| *value < SCORE_CEILING)
        .map(|(name, value)| format!("raise {} (currently {:.1})", name, value))
        .collect();

    for row in &status.components {
        if row.status < ComponentStatus::Active {
            out.push(format!("component '{}' is still {}", row.name, row.status));
        }
    }

    if status.phase == Phase::Supreme {
        out.push("run evolve-beyond to reach the infinite phase".to_string());
    } else if !status.phase.is_terminal() {
        let next = status
            .capability_flags
            .next_locked()
            .map(|flag| flag.description())
            .unwrap_or("supreme");
        out.push(format!("complete activation (next capability: {})", next));
    }

    if out.is_empty() {
        out.push("no action required".to_string());
    }
    out
}

impl OrchestratorState {
    /// Short-form status.
    #[must_use]
    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot::capture(self)
    }

    /// Full report.
    #[must_use]
    pub fn report(&self) -> Report {
        Report::generate(self)
    }
}

// =============================================================================
// TESTS
// =============================================================================
