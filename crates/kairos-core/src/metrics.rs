//! # Metrics Aggregator
//!
//! System-wide scalar metrics derived from the registry and the event stream.
//!
//! ## Rules
//!
//! `intelligence_quotient` = mean(core, unified) and `system_health` =
//! mean(security, harmony) are recomputed on every call. The latest event
//! selects which other field moves:
//!
//! | Latest event | Field recomputed |
//! |--------------|------------------|
//! | evolution | `evolution_speed` += `evolution_speed_step` |
//! | harmonization | `harmonization_index` = min(100, mean score + `harmonization_bonus`) |
//! | innovation | `creativity_index` += `creativity_step` |
//! | activation, monitoring, transcendence | none |
//!
//! Every field is clamped to `[0, 100]` on every recomputation. Once frozen
//! (phase `supreme` or later) every field is pinned at the ceiling.

use crate::config::Tuning;
use crate::events::Event;
use crate::registry::{CORE, ComponentRegistry, HARMONY, SECURITY, UNIFIED};
use crate::types::{EventType, SCORE_CEILING, SCORE_FLOOR, clamp_score};
use serde::{Deserialize, Serialize};

/// Components whose mean is the intelligence quotient.
pub const INTELLIGENCE_PAIR: (&str, &str) = (CORE, UNIFIED);

/// Components whose mean is the system health.
pub const HEALTH_PAIR: (&str, &str) = (SECURITY, HARMONY);

// =============================================================================
// SYSTEM METRICS
// =============================================================================

/// The five system-wide metrics, each in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemMetrics {
    pub intelligence_quotient: f64,
    pub evolution_speed: f64,
    pub harmonization_index: f64,
    pub creativity_index: f64,
    pub system_health: f64,
}

impl Default for SystemMetrics {
    fn default() -> Self {
        Self {
            intelligence_quotient: SCORE_FLOOR,
            evolution_speed: SCORE_FLOOR,
            harmonization_index: SCORE_FLOOR,
            creativity_index: SCORE_FLOOR,
            system_health: SCORE_FLOOR,
        }
    }
}

impl SystemMetrics {
    /// Every metric at the ceiling.
    #[must_use]
    pub fn saturated() -> Self {
        Self {
            intelligence_quotient: SCORE_CEILING,
            evolution_speed: SCORE_CEILING,
            harmonization_index: SCORE_CEILING,
            creativity_index: SCORE_CEILING,
            system_health: SCORE_CEILING,
        }
    }

    /// Clamp every field into range.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            intelligence_quotient: clamp_score(self.intelligence_quotient),
            evolution_speed: clamp_score(self.evolution_speed),
            harmonization_index: clamp_score(self.harmonization_index),
            creativity_index: clamp_score(self.creativity_index),
            system_health: clamp_score(self.system_health),
        }
    }

    /// Named view of every field, in a stable order.
    #[must_use]
    pub fn fields(&self) -> [(&'static str, f64); 5] {
        [
            ("intelligence_quotient", self.intelligence_quotient),
            ("evolution_speed", self.evolution_speed),
            ("harmonization_index", self.harmonization_index),
            ("creativity_index", self.creativity_index),
            ("system_health", self.system_health),
        ]
    }
}

// =============================================================================
// AGGREGATOR
// =============================================================================

/// Pure recomputation of [`SystemMetrics`].
#[derive(Debug, Clone, Default)]
pub struct MetricsAggregator {
    tuning: Tuning,
}

impl MetricsAggregator {
    #[must_use]
    pub fn new(tuning: Tuning) -> Self {
        Self { tuning }
    }

    #[must_use]
    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Rounded mean of all component scores, clamped to range.
    #[must_use]
    pub fn overall_level(registry: &ComponentRegistry) -> f64 {
        clamp_score(registry.mean_score().round())
    }

    /// Harmonization index for the current registry.
    #[must_use]
    pub fn harmonization_index(&self, registry: &ComponentRegistry) -> f64 {
        clamp_score((registry.mean_score() + self.tuning.harmonization_bonus).min(SCORE_CEILING))
    }

    /// Recompute metrics from the registry and the most recent event.
    #[must_use]
    pub fn recompute(
        &self,
        registry: &ComponentRegistry,
        previous: &SystemMetrics,
        latest: Option<&Event>,
        frozen: bool,
    ) -> SystemMetrics {
        if frozen {
            return SystemMetrics::saturated();
        }

        let mut next = *previous;
        let (iq_a, iq_b) = INTELLIGENCE_PAIR;
        let (health_a, health_b) = HEALTH_PAIR;
        next.intelligence_quotient = registry
            .pair_mean(iq_a, iq_b)
            .unwrap_or(previous.intelligence_quotient);
        next.system_health = registry
            .pair_mean(health_a, health_b)
            .unwrap_or(previous.system_health);

        match latest.map(|e| e.event_type) {
            Some(EventType::Evolution) => {
                next.evolution_speed += self.tuning.evolution_speed_step;
            }
            Some(EventType::Harmonization) => {
                next.harmonization_index = self.harmonization_index(registry);
            }
            Some(EventType::Innovation) => {
                next.creativity_index += self.tuning.creativity_step;
            }
            Some(EventType::Activation | EventType::Monitoring | EventType::Transcendence)
            | None => {}
        }

        next.clamped()
    }
}

// =============================================================================
// TESTS
// =============================================================================
