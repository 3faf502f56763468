//! # Phase State Machine
//!
//! Drives the registry from `uninitialized` to `supreme`:
//!
//! 1. `initializing`: one activation routine per component, in declared order
//! 2. `harmonizing`: one harmonization pass
//! 3. `transcending`: cycles enabled, capability flags 1-4 unlocked
//! 4. `supreme`: flag 5 unlocked, every score and metric at the ceiling
//!
//! `infinite` is only reachable through [`OrchestratorState::evolve_beyond`].
//!
//! ## Failure Semantics
//!
//! The first routine error aborts the sequence with
//! [`KairosError::ActivationFailed`]. Components activated before the failure
//! keep their scores (no rollback) and `is_activated` stays false, so the
//! caller may retry.

use crate::events::{ALL_COMPONENTS, EventDraft};
use crate::registry::{AMBIENT, COMPONENT_ORDER, CORE, Component, HARMONY, SECURITY, UNIFIED};
use crate::state::OrchestratorState;
use crate::system::Phase;
use crate::types::{ComponentStatus, EventType, KairosError, SCORE_CEILING};
use chrono::Utc;
use std::collections::BTreeMap;

// =============================================================================
// ACTIVATION ROUTINES
// =============================================================================

/// What an activation routine brought online.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivationOutcome {
    /// Score the component should reach; must be within `[0, 100]`.
    pub target_score: f64,
    /// Capabilities unlocked by this activation.
    pub tags: Vec<String>,
}

/// Component-specific bring-up step.
///
/// Routines inspect the component (status `activating`) and report the
/// confidence band it reached. They must not block.
pub trait ActivationRoutine: Send + Sync {
    fn activate(&self, component: &Component) -> Result<ActivationOutcome, KairosError>;
}

/// Fixed-band routine used for the standard components.
#[derive(Debug, Clone)]
pub struct ProfileRoutine {
    target_score: f64,
    tags: &'static [&'static str],
}

impl ProfileRoutine {
    #[must_use]
    pub const fn new(target_score: f64, tags: &'static [&'static str]) -> Self {
        Self { target_score, tags }
    }

    #[must_use]
    pub fn target_score(&self) -> f64 {
        self.target_score
    }
}

impl ActivationRoutine for ProfileRoutine {
    fn activate(&self, _component: &Component) -> Result<ActivationOutcome, KairosError> {
        Ok(ActivationOutcome {
            target_score: self.target_score,
            tags: self.tags.iter().map(|t| (*t).to_string()).collect(),
        })
    }
}

/// Standard bands: different subsystems reach different confidence at the
/// same bring-up step, so no two targets are equal.
pub const CORE_PROFILE: ProfileRoutine =
    ProfileRoutine::new(96.0, &["unified-reasoning", "self-reflection"]);
pub const SECURITY_PROFILE: ProfileRoutine =
    ProfileRoutine::new(93.0, &["threat-modeling", "integrity-audit"]);
pub const HARMONY_PROFILE: ProfileRoutine =
    ProfileRoutine::new(94.0, &["cross-component-alignment", "conflict-resolution"]);
pub const AMBIENT_PROFILE: ProfileRoutine =
    ProfileRoutine::new(91.0, &["context-sensing", "background-adaptation"]);
pub const UNIFIED_PROFILE: ProfileRoutine =
    ProfileRoutine::new(98.0, &["holistic-synthesis", "meta-orchestration"]);

// =============================================================================
// ACTIVATION PLAN
// =============================================================================

/// Routine table keyed by component name.
pub struct ActivationPlan {
    routines: BTreeMap<String, Box<dyn ActivationRoutine>>,
}

impl std::fmt::Debug for ActivationPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivationPlan")
            .field("components", &self.routines.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for ActivationPlan {
    fn default() -> Self {
        Self::standard()
    }
}

impl ActivationPlan {
    /// The standard profile for every declared component.
    #[must_use]
    pub fn standard() -> Self {
        Self::empty()
            .with_routine(CORE, CORE_PROFILE)
            .with_routine(SECURITY, SECURITY_PROFILE)
            .with_routine(HARMONY, HARMONY_PROFILE)
            .with_routine(AMBIENT, AMBIENT_PROFILE)
            .with_routine(UNIFIED, UNIFIED_PROFILE)
    }

    /// A plan with no routines; every activation step will fail.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            routines: BTreeMap::new(),
        }
    }

    /// Install or replace the routine for one component.
    #[must_use]
    pub fn with_routine(
        mut self,
        component: impl Into<String>,
        routine: impl ActivationRoutine + 'static,
    ) -> Self {
        self.routines.insert(component.into(), Box::new(routine));
        self
    }

    fn routine_for(&self, component: &str) -> Result<&dyn ActivationRoutine, KairosError> {
        self.routines
            .get(component)
            .map(|r| r.as_ref())
            .ok_or_else(|| {
                KairosError::RoutineFailed(format!("no activation routine for '{}'", component))
            })
    }
}

// =============================================================================
// PHASE MACHINE
// =============================================================================

impl OrchestratorState {
    /// Run the full activation sequence once.
    ///
    /// Returns `Ok(true)` when this call performed the activation and
    /// `Ok(false)` when the state was already activated.
    pub fn activate(&mut self, plan: &ActivationPlan) -> Result<bool, KairosError> {
        if self.is_activated {
            return Ok(false);
        }

        if self.advance_to(Phase::Initializing) {
            self.publish(
                EventDraft::new(
                    EventType::Activation,
                    ALL_COMPONENTS,
                    self.overall_level,
                    "activation-started",
                )
                .with("phase", Phase::Initializing),
            );
        }

        for name in COMPONENT_ORDER {
            self.activate_component(plan, name)
                .map_err(|source| KairosError::ActivationFailed {
                    component: name.to_string(),
                    source: Box::new(source),
                })?;
        }

        self.harmonize();
        self.transcend();
        self.ascend_supreme()?;

        self.is_activated = true;
        self.activated_at = Some(Utc::now());
        Ok(true)
    }

    /// Move from `supreme` to the terminal `infinite` phase.
    ///
    /// Fails with [`KairosError::InvalidPhase`] in any other phase and
    /// leaves the state untouched.
    pub fn evolve_beyond(&mut self) -> Result<(), KairosError> {
        if self.phase != Phase::Supreme {
            return Err(KairosError::InvalidPhase {
                operation: "evolve_beyond",
                phase: self.phase,
            });
        }

        self.advance_to(Phase::Infinite);
        self.publish(
            EventDraft::new(
                EventType::Transcendence,
                ALL_COMPONENTS,
                self.overall_level,
                "infinite-evolution",
            )
            .with("phase", Phase::Infinite),
        );
        Ok(())
    }

    fn activate_component(
        &mut self,
        plan: &ActivationPlan,
        name: &str,
    ) -> Result<(), KairosError> {
        self.registry.promote(name, ComponentStatus::Activating)?;

        let outcome = plan.routine_for(name)?.activate(self.registry.get(name)?)?;
        if !(0.0..=SCORE_CEILING).contains(&outcome.target_score) {
            return Err(KairosError::RoutineFailed(format!(
                "target score {} for '{}' is outside [0, 100]",
                outcome.target_score, name
            )));
        }

        let current = self.registry.get(name)?.capability_score;
        let score = self
            .registry
            .mutate(name, outcome.target_score - current, outcome.tags)?
            .capability_score;
        let status = self
            .registry
            .promote(name, ComponentStatus::for_activated_score(score))?
            .status;

        self.publish(
            EventDraft::new(EventType::Activation, name, score, "component-online")
                .with("status", status)
                .with("target", outcome.target_score),
        );
        self.refresh_overall_level();
        Ok(())
    }

    fn harmonize(&mut self) {
        self.advance_to(Phase::Harmonizing);
        self.refresh_overall_level();
        self.publish(
            EventDraft::new(
                EventType::Harmonization,
                ALL_COMPONENTS,
                self.overall_level,
                "initial-harmonization",
            )
            .with("phase", Phase::Harmonizing)
            .with("mean_score", self.registry.mean_score()),
        );
    }

    fn transcend(&mut self) {
        self.advance_to(Phase::Transcending);

        let mut unlocked = Vec::new();
        while self.flags.unlocked_count() < 4 {
            match self.flags.unlock_next() {
                Some(flag) => unlocked.push(format!("{:?}", flag)),
                None => break,
            }
        }

        self.publish(
            EventDraft::new(
                EventType::Transcendence,
                ALL_COMPONENTS,
                self.overall_level,
                "cycles-enabled",
            )
            .with("phase", Phase::Transcending)
            .with("unlocked", unlocked.join(",")),
        );
    }

    fn ascend_supreme(&mut self) -> Result<(), KairosError> {
        self.advance_to(Phase::Supreme);
        self.flags.unlock_next();

        for name in COMPONENT_ORDER {
            let current = self.registry.get(name)?.capability_score;
            if current < SCORE_CEILING {
                self.registry
                    .mutate(name, SCORE_CEILING - current, ["supreme-alignment"])?;
            }
            self.registry.promote(name, ComponentStatus::Transcendent)?;
        }
        self.refresh_overall_level();

        self.publish(
            EventDraft::new(
                EventType::Transcendence,
                ALL_COMPONENTS,
                self.overall_level,
                "supreme-reached",
            )
            .with("phase", Phase::Supreme),
        );
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::SystemMetrics;
    use crate::system::CapabilityFlag;

    struct FailingRoutine;

    impl ActivationRoutine for FailingRoutine {
        fn activate(&self, _component: &Component) -> Result<ActivationOutcome, KairosError> {
            Err(KairosError::RoutineFailed("calibration timeout".to_string()))
        }
    }

    #[test]
    fn standard_targets_are_distinct() {
        let mut targets: Vec<f64> = [
            CORE_PROFILE,
            SECURITY_PROFILE,
            HARMONY_PROFILE,
            AMBIENT_PROFILE,
            UNIFIED_PROFILE,
        ]
        .iter()
        .map(ProfileRoutine::target_score)
        .collect();
        targets.sort_by(f64::total_cmp);
        targets.dedup();
        assert_eq!(targets.len(), 5);
    }

    #[test]
    fn full_activation_reaches_supreme() {
        let mut state = OrchestratorState::default();
        let ran = state.activate(&ActivationPlan::standard()).expect("activate");

        assert!(ran);
        assert!(state.is_activated());
        assert_eq!(state.phase(), Phase::Supreme);
        assert_eq!(state.overall_level(), 100.0);
        assert!(state.capability_flags().all_set());
        assert_eq!(state.metrics(), SystemMetrics::saturated());
        state.registry().for_each(|c| {
            assert_eq!(c.capability_score, 100.0);
            assert_eq!(c.status, ComponentStatus::Transcendent);
        });
    }

    #[test]
    fn activation_publishes_one_event_per_step() {
        let mut state = OrchestratorState::default();
        state.activate(&ActivationPlan::standard()).expect("activate");

        let types: Vec<EventType> = state
            .recent_events(100)
            .iter()
            .map(|e| e.event_type)
            .collect();
        assert_eq!(
            types,
            vec![
                EventType::Activation,
                EventType::Activation,
                EventType::Activation,
                EventType::Activation,
                EventType::Activation,
                EventType::Activation,
                EventType::Harmonization,
                EventType::Transcendence,
                EventType::Transcendence,
            ]
        );
    }

    #[test]
    fn components_activate_in_declared_order() {
        let mut state = OrchestratorState::default();
        state.activate(&ActivationPlan::standard()).expect("activate");

        let order: Vec<String> = state
            .recent_events(100)
            .iter()
            .filter(|e| e.impact == "component-online")
            .map(|e| e.component.clone())
            .collect();
        assert_eq!(order, COMPONENT_ORDER.to_vec());
    }

    #[test]
    fn activation_sets_status_by_band() {
        let mut state = OrchestratorState::default();
        state.activate(&ActivationPlan::standard()).expect("activate");

        let statuses: BTreeMap<String, String> = state
            .recent_events(100)
            .iter()
            .filter(|e| e.impact == "component-online")
            .filter_map(|e| Some((e.component.clone(), e.metadata.get("status")?.clone())))
            .collect();
        assert_eq!(statuses.get(CORE).map(String::as_str), Some("transcendent"));
        assert_eq!(statuses.get(AMBIENT).map(String::as_str), Some("active"));
    }

    #[test]
    fn second_activation_is_noop() {
        let mut state = OrchestratorState::default();
        state.activate(&ActivationPlan::standard()).expect("first");
        let published = state.events_published();

        let ran = state.activate(&ActivationPlan::standard()).expect("second");
        assert!(!ran);
        assert_eq!(state.events_published(), published);
    }

    #[test]
    fn failing_routine_aborts_without_rollback() {
        let plan = ActivationPlan::standard().with_routine(HARMONY, FailingRoutine);
        let mut state = OrchestratorState::default();

        let err = state.activate(&plan).expect_err("must fail");
        assert!(matches!(
            &err,
            KairosError::ActivationFailed { component, source }
                if component == HARMONY && matches!(**source, KairosError::RoutineFailed(_))
        ));

        assert!(!state.is_activated());
        assert_eq!(state.phase(), Phase::Initializing);
        let core = state.component(CORE).expect("core");
        assert_eq!(core.capability_score, 96.0);
        let harmony = state.component(HARMONY).expect("harmony");
        assert_eq!(harmony.status, ComponentStatus::Activating);
        let ambient = state.component(AMBIENT).expect("ambient");
        assert_eq!(ambient.status, ComponentStatus::Dormant);
        assert_eq!(state.capability_flags().unlocked_count(), 0);
    }

    #[test]
    fn retry_after_failure_succeeds() {
        let mut state = OrchestratorState::default();
        let broken = ActivationPlan::standard().with_routine(UNIFIED, FailingRoutine);
        assert!(state.activate(&broken).is_err());

        let ran = state.activate(&ActivationPlan::standard()).expect("retry");
        assert!(ran);
        assert_eq!(state.phase(), Phase::Supreme);
    }

    #[test]
    fn missing_routine_fails() {
        let mut state = OrchestratorState::default();
        let err = state.activate(&ActivationPlan::empty()).expect_err("no routines");
        assert!(matches!(err, KairosError::ActivationFailed { component, .. } if component == CORE));
    }

    #[test]
    fn out_of_range_target_rejected() {
        let plan = ActivationPlan::standard()
            .with_routine(SECURITY, ProfileRoutine::new(140.0, &["overdrive"]));
        let mut state = OrchestratorState::default();
        assert!(state.activate(&plan).is_err());
        assert_eq!(state.component(SECURITY).expect("security").capability_score, 0.0);
    }

    #[test]
    fn evolve_beyond_requires_supreme() {
        let mut state = OrchestratorState::default();
        let err = state.evolve_beyond().expect_err("not supreme");
        assert_eq!(
            err,
            KairosError::InvalidPhase {
                operation: "evolve_beyond",
                phase: Phase::Uninitialized,
            }
        );
        assert_eq!(state.phase(), Phase::Uninitialized);
        assert_eq!(state.events_published(), 0);
    }

    #[test]
    fn evolve_beyond_from_supreme() {
        let mut state = OrchestratorState::default();
        state.activate(&ActivationPlan::standard()).expect("activate");
        state.evolve_beyond().expect("evolve");

        assert_eq!(state.phase(), Phase::Infinite);
        assert!(state.evolve_beyond().is_err());
        assert!(
            state
                .capability_flags()
                .is_set(CapabilityFlag::InfinitePotential)
        );
    }
}
