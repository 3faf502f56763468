//! # Property-Based Tests
//!
//! Invariants that must hold for any sequence of adjustments, publications
//! and ticks.

use kairos_core::{
    ActivationPlan, COMPONENT_ORDER, CapabilityFlags, ComponentRegistry, CycleKind, EventBus,
    EventDraft, EventType, OrchestratorState, Phase, SCORE_CEILING, SCORE_FLOOR, SystemMetrics,
};
use proptest::collection::vec;
use proptest::prelude::*;

fn activated() -> OrchestratorState {
    let mut state = OrchestratorState::default();
    state
        .activate(&ActivationPlan::standard())
        .expect("activate");
    state
}

fn cycle_kind() -> impl Strategy<Value = CycleKind> {
    prop::sample::select(CycleKind::ALL.to_vec())
}

fn metrics_in_range(metrics: &SystemMetrics) -> bool {
    metrics
        .fields()
        .iter()
        .all(|(_, v)| (SCORE_FLOOR..=SCORE_CEILING).contains(v))
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// A score never decreases, whatever the sign of the delta.
    #[test]
    fn scores_never_decrease(
        deltas in vec(-500.0f64..500.0, 1..60),
        pick in vec(0usize..5, 1..60)
    ) {
        let mut registry = ComponentRegistry::new();

        for (delta, idx) in deltas.iter().zip(pick.iter().cycle()) {
            let name = COMPONENT_ORDER[*idx];
            let before = registry.get(name).expect("get").capability_score;
            let after = registry
                .mutate(name, *delta, Vec::<String>::new())
                .expect("mutate")
                .capability_score;

            prop_assert!(after >= before);
            prop_assert!((SCORE_FLOOR..=SCORE_CEILING).contains(&after));
        }
    }

    /// Evolution counts grow by exactly one per successful mutation.
    #[test]
    fn evolution_count_tracks_mutations(deltas in vec(0.0f64..10.0, 0..40)) {
        let mut registry = ComponentRegistry::new();
        for delta in &deltas {
            registry
                .mutate(COMPONENT_ORDER[0], *delta, Vec::<String>::new())
                .expect("mutate");
        }
        prop_assert_eq!(
            registry.get(COMPONENT_ORDER[0]).expect("get").evolution_count,
            deltas.len() as u64
        );
    }

    /// The bus never holds more than its capacity and keeps the newest events.
    #[test]
    fn bus_is_bounded(capacity in 1usize..64, publishes in 0usize..300) {
        let mut bus = EventBus::new(capacity);
        let mut last_id = 0;
        for _ in 0..publishes {
            last_id = bus.publish(EventDraft::new(EventType::Monitoring, "all", 0.0, "test"));
        }

        prop_assert_eq!(bus.recent(usize::MAX).len(), publishes.min(capacity));
        prop_assert_eq!(bus.published(), publishes as u64);
        if publishes > 0 {
            prop_assert_eq!(bus.latest().map(|e| e.id), Some(last_id));
        }

        let ids: Vec<u64> = bus.recent(capacity).iter().map(|e| e.id).collect();
        prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    /// Any interleaving of ticks keeps every metric in range and never
    /// moves the phase backward.
    #[test]
    fn ticks_preserve_bounds(kinds in vec(cycle_kind(), 0..80)) {
        let mut state = activated();
        let start = state.phase();

        for kind in kinds {
            state.run_cycle(kind).expect("tick");
            prop_assert!(metrics_in_range(&state.metrics()));
            prop_assert!(state.phase() >= start);
            prop_assert_eq!(state.overall_level(), SCORE_CEILING);
        }
    }

    /// Flags unlock strictly in causal order.
    #[test]
    fn flags_unlock_causally(steps in 0usize..8) {
        let mut flags = CapabilityFlags::default();
        for _ in 0..steps {
            flags.unlock_next();
            prop_assert!(flags.is_causal());
        }
        prop_assert_eq!(flags.unlocked_count(), steps.min(5));
    }

    /// `next` always moves forward; only the terminal phase has none.
    #[test]
    fn phase_order_is_total(idx in 0usize..6) {
        let phase = Phase::ALL[idx];
        if let Some(next) = phase.next() {
            prop_assert!(next > phase);
        } else {
            prop_assert!(phase.is_terminal());
        }
    }
}

// =============================================================================
// SATURATION
// =============================================================================

/// One hundred monitoring ticks after activation leave every metric pinned.
#[test]
fn monitoring_ticks_stay_saturated() {
    let mut state = activated();
    for _ in 0..100 {
        state.run_cycle(CycleKind::Monitoring).expect("tick");
    }
    assert_eq!(state.metrics(), SystemMetrics::saturated());
    assert_eq!(state.overall_level(), SCORE_CEILING);
}

/// More than a full ring of publications still leaves exactly `capacity`.
#[test]
fn event_history_caps_at_default_capacity() {
    let mut state = activated();
    for _ in 0..1200 {
        state.run_cycle(CycleKind::Innovation).expect("tick");
    }
    assert_eq!(state.recent_events(usize::MAX).len(), 1000);
    assert_eq!(state.events_published(), 1209);
}
