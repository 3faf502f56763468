//! # Cycle Bodies
//!
//! One tick of each background cycle. Timing lives in the app layer; this
//! module only defines what a tick does to the state.
//!
//! | Cycle | Effect | Event |
//! |-------|--------|-------|
//! | evolution | `+evolution_delta` on every below-ceiling component | `evolution` |
//! | harmonization | harmonization index from mean score + bonus | `harmonization` |
//! | innovation | `+creativity_step` on the creativity index | `innovation` |
//! | monitoring | overall level, IQ and health from component pairs | `monitoring` |
//!
//! A tick is one call on `&mut OrchestratorState`, so it is atomic with
//! respect to anything else holding the state's lock. Per-component failures
//! are collected into the [`CycleReport`] and the tick continues with the
//! remaining components.

use crate::events::{ALL_COMPONENTS, EventDraft};
use crate::state::OrchestratorState;
use crate::types::{EventType, KairosError};
use serde::{Deserialize, Serialize};

// =============================================================================
// CYCLE KIND
// =============================================================================

/// The four background cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleKind {
    Evolution,
    Harmonization,
    Innovation,
    Monitoring,
}

impl CycleKind {
    pub const ALL: [CycleKind; 4] = [
        CycleKind::Evolution,
        CycleKind::Harmonization,
        CycleKind::Innovation,
        CycleKind::Monitoring,
    ];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            CycleKind::Evolution => "evolution",
            CycleKind::Harmonization => "harmonization",
            CycleKind::Innovation => "innovation",
            CycleKind::Monitoring => "monitoring",
        }
    }

    /// Type of the event a tick of this cycle publishes.
    #[must_use]
    pub fn event_type(&self) -> EventType {
        match self {
            CycleKind::Evolution => EventType::Evolution,
            CycleKind::Harmonization => EventType::Harmonization,
            CycleKind::Innovation => EventType::Innovation,
            CycleKind::Monitoring => EventType::Monitoring,
        }
    }
}

impl std::fmt::Display for CycleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for CycleKind {
    type Err = KairosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CycleKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| KairosError::ConfigError(format!("unknown cycle '{}'", s)))
    }
}

// =============================================================================
// CYCLE REPORT
// =============================================================================

/// A component the tick could not adjust.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleFailure {
    pub component: String,
    pub error: KairosError,
}

/// Outcome of one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub kind: CycleKind,
    /// Components whose score was mutated.
    pub adjusted: Vec<String>,
    /// Components skipped because their adjustment failed.
    pub failures: Vec<CycleFailure>,
    /// Id of the event the tick published.
    pub event_id: u64,
}

// =============================================================================
// TICKS
// =============================================================================

impl OrchestratorState {
    /// Execute one tick of `kind`.
    ///
    /// Fails with [`KairosError::InvalidPhase`] before `transcending`.
    pub fn run_cycle(&mut self, kind: CycleKind) -> Result<CycleReport, KairosError> {
        if !self.phase.cycles_enabled() {
            return Err(KairosError::InvalidPhase {
                operation: "run_cycle",
                phase: self.phase,
            });
        }

        Ok(match kind {
            CycleKind::Evolution => self.evolution_tick(),
            CycleKind::Harmonization => self.harmonization_tick(),
            CycleKind::Innovation => self.innovation_tick(),
            CycleKind::Monitoring => self.monitoring_tick(),
        })
    }

    fn evolution_tick(&mut self) -> CycleReport {
        let delta = self.aggregator.tuning().evolution_delta;
        let growing: Vec<String> = self
            .registry
            .iter()
            .filter(|c| c.below_ceiling())
            .map(|c| c.name.clone())
            .collect();

        let mut adjusted = Vec::new();
        let mut failures = Vec::new();
        for name in growing {
            match self.registry.mutate(&name, delta, Vec::<String>::new()) {
                Ok(_) => adjusted.push(name),
                Err(error) => failures.push(CycleFailure {
                    component: name,
                    error,
                }),
            }
        }
        self.refresh_overall_level();

        let event_id = self.publish(
            EventDraft::new(
                EventType::Evolution,
                ALL_COMPONENTS,
                self.overall_level,
                "incremental-improvement",
            )
            .with("total_evolutions", self.registry.total_evolutions())
            .with("adjusted", adjusted.len())
            .with("failed", failures.len()),
        );

        CycleReport {
            kind: CycleKind::Evolution,
            adjusted,
            failures,
            event_id,
        }
    }

    fn harmonization_tick(&mut self) -> CycleReport {
        let event_id = self.publish(
            EventDraft::new(
                EventType::Harmonization,
                ALL_COMPONENTS,
                self.overall_level,
                "cross-component-alignment",
            )
            .with("mean_score", self.registry.mean_score())
            .with("bonus", self.aggregator.tuning().harmonization_bonus),
        );
        Self::quiet_report(CycleKind::Harmonization, event_id)
    }

    fn innovation_tick(&mut self) -> CycleReport {
        let event_id = self.publish(
            EventDraft::new(
                EventType::Innovation,
                ALL_COMPONENTS,
                self.overall_level,
                "creative-breakthrough",
            )
            .with("previous_creativity", self.metrics.creativity_index)
            .with("step", self.aggregator.tuning().creativity_step),
        );
        Self::quiet_report(CycleKind::Innovation, event_id)
    }

    fn monitoring_tick(&mut self) -> CycleReport {
        self.refresh_overall_level();
        let event_id = self.publish(
            EventDraft::new(
                EventType::Monitoring,
                ALL_COMPONENTS,
                self.overall_level,
                "health-check",
            )
            .with("phase", self.phase),
        );
        Self::quiet_report(CycleKind::Monitoring, event_id)
    }

    fn quiet_report(kind: CycleKind, event_id: u64) -> CycleReport {
        CycleReport {
            kind,
            adjusted: Vec::new(),
            failures: Vec::new(),
            event_id,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::ActivationPlan;
    use crate::config::OrchestratorConfig;
    use crate::registry::{AMBIENT, COMPONENT_ORDER};
    use crate::system::Phase;
    use crate::types::{SCORE_CEILING, SCORE_FLOOR};
    use proptest::prelude::*;

    fn activated(config: &OrchestratorConfig) -> OrchestratorState {
        let mut state = OrchestratorState::new(config);
        state.activate(&ActivationPlan::standard()).expect("activate");
        state
    }

    /// Drive the state into `transcending` without reaching the ceiling, so
    /// cycles have room to move scores and metrics.
    fn transcending_below_ceiling() -> OrchestratorState {
        transcending_with(&OrchestratorConfig::default())
    }

    fn transcending_with(config: &OrchestratorConfig) -> OrchestratorState {
        let mut state = OrchestratorState::new(config);
        for name in COMPONENT_ORDER {
            state
                .registry
                .mutate(name, 50.0, Vec::<String>::new())
                .expect("mutate");
        }
        state.advance_to(Phase::Transcending);
        state.refresh_overall_level();
        state
    }

    #[test]
    fn cycles_rejected_before_transcending() {
        let mut state = OrchestratorState::default();
        for kind in CycleKind::ALL {
            assert!(matches!(
                state.run_cycle(kind),
                Err(KairosError::InvalidPhase { .. })
            ));
        }
        assert_eq!(state.events_published(), 0);
    }

    #[test]
    fn each_tick_publishes_its_event_type() {
        let mut state = activated(&OrchestratorConfig::default());
        for kind in CycleKind::ALL {
            let report = state.run_cycle(kind).expect("tick");
            let latest = state.recent_events(1);
            assert_eq!(latest[0].id, report.event_id);
            assert_eq!(latest[0].event_type, kind.event_type());
        }
    }

    #[test]
    fn evolution_adjusts_only_below_ceiling() {
        let mut state = transcending_below_ceiling();
        let report = state.run_cycle(CycleKind::Evolution).expect("tick");

        assert_eq!(report.adjusted.len(), 5);
        assert!(report.failures.is_empty());
        let ambient = state.component(AMBIENT).expect("ambient");
        assert!((ambient.capability_score - 50.1).abs() < 1e-9);
        assert_eq!(ambient.evolution_count, 2);
        assert!(state.metrics().evolution_speed > 0.0);

        let mut saturated = activated(&OrchestratorConfig::default());
        let report = saturated.run_cycle(CycleKind::Evolution).expect("tick");
        assert!(report.adjusted.is_empty());
    }

    #[test]
    fn evolution_event_reports_total_evolutions() {
        let mut state = transcending_below_ceiling();
        state.run_cycle(CycleKind::Evolution).expect("tick");

        let event = &state.recent_events(1)[0];
        assert_eq!(
            event.metadata.get("total_evolutions").map(String::as_str),
            Some("10")
        );
    }

    #[test]
    fn evolution_failures_do_not_stop_the_tick() {
        let mut config = OrchestratorConfig::default();
        config.tuning.evolution_delta = f64::NAN;
        let mut state = OrchestratorState::new(&config);
        state.advance_to(Phase::Transcending);

        let report = state.run_cycle(CycleKind::Evolution).expect("tick");
        assert_eq!(report.failures.len(), 5);
        assert!(report.adjusted.is_empty());
        assert!(matches!(
            report.failures[0].error,
            KairosError::InvalidAdjustment { .. }
        ));
        assert_eq!(state.recent_events(1)[0].event_type, EventType::Evolution);
    }

    #[test]
    fn harmonization_tick_uses_mean_plus_bonus() {
        let mut state = transcending_below_ceiling();
        state.run_cycle(CycleKind::Harmonization).expect("tick");
        assert_eq!(state.metrics().harmonization_index, 52.0);
    }

    #[test]
    fn innovation_tick_raises_creativity() {
        let mut state = transcending_below_ceiling();
        state.run_cycle(CycleKind::Innovation).expect("tick");
        state.run_cycle(CycleKind::Innovation).expect("tick");
        assert_eq!(state.metrics().creativity_index, 1.0);
    }

    #[test]
    fn monitoring_tick_recomputes_pairs() {
        let plan = ActivationPlan::standard();
        let mut state = OrchestratorState::default();
        state.activate(&plan).expect("activate");
        state.run_cycle(CycleKind::Monitoring).expect("tick");

        assert_eq!(state.overall_level(), 100.0);
        assert_eq!(state.metrics().system_health, 100.0);
        assert_eq!(state.metrics().intelligence_quotient, 100.0);
    }

    #[test]
    fn monitoring_tick_below_ceiling() {
        let mut state = transcending_below_ceiling();
        state
            .registry
            .mutate(crate::registry::CORE, 30.0, Vec::<String>::new())
            .expect("mutate");
        state.run_cycle(CycleKind::Monitoring).expect("tick");

        assert_eq!(state.overall_level(), 56.0);
        assert_eq!(state.metrics().intelligence_quotient, 65.0);
        assert_eq!(state.metrics().system_health, 50.0);
    }

    fn scores(state: &OrchestratorState) -> Vec<(f64, u64)> {
        state
            .registry()
            .iter()
            .map(|c| (c.capability_score, c.evolution_count))
            .collect()
    }

    proptest! {
        /// Random tick sequences below `supreme` push scores and metrics into
        /// the ceiling without crossing it.
        #[test]
        fn random_ticks_stay_clamped_below_supreme(
            lifts in proptest::collection::vec(0.0f64..50.0, COMPONENT_ORDER.len()),
            kinds in proptest::collection::vec(
                proptest::sample::select(CycleKind::ALL.to_vec()),
                200..400,
            ),
        ) {
            let mut config = OrchestratorConfig::default();
            config.tuning.evolution_delta = 0.5;
            config.tuning.creativity_step = 2.0;
            config.tuning.evolution_speed_step = 2.0;
            config.tuning.harmonization_bonus = 5.0;

            let mut state = transcending_with(&config);
            for (name, lift) in COMPONENT_ORDER.iter().zip(&lifts) {
                state
                    .registry
                    .mutate(name, *lift, Vec::<String>::new())
                    .expect("mutate");
            }
            state.refresh_overall_level();

            let mut before = scores(&state);
            for kind in kinds {
                state.run_cycle(kind).expect("tick");
                prop_assert_eq!(state.phase(), Phase::Transcending);

                for (_, value) in state.metrics().fields() {
                    prop_assert!((SCORE_FLOOR..=SCORE_CEILING).contains(&value));
                }
                prop_assert!((SCORE_FLOOR..=SCORE_CEILING).contains(&state.overall_level()));

                let after = scores(&state);
                for ((score, count), (prev_score, prev_count)) in after.iter().zip(&before) {
                    prop_assert!((SCORE_FLOOR..=SCORE_CEILING).contains(score));
                    prop_assert!(score >= prev_score);
                    prop_assert!(count >= prev_count);
                }
                before = after;
            }
        }
    }

    #[test]
    fn cycle_kind_parses() {
        assert_eq!(
            "Monitoring".parse::<CycleKind>().ok(),
            Some(CycleKind::Monitoring)
        );
        assert!("nap".parse::<CycleKind>().is_err());
    }
}
