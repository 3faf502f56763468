//! # Orchestrator State
//!
//! The aggregate root. The registry, event bus, metrics and phase are only
//! reachable through [`OrchestratorState`]; nothing outside the crate can
//! mutate them directly.
//!
//! The phase machine lives in [`crate::activation`] and the cycle bodies in
//! [`crate::cycles`]; both are `impl OrchestratorState` blocks so that every
//! mutation goes through the same publish-then-recompute path defined here.
//!
//! `OrchestratorState` is not synchronized. The app layer wraps it in a lock
//! so that each activation run and each cycle tick is one critical section.

use crate::config::OrchestratorConfig;
use crate::events::{Event, EventBus, EventDraft, EventSink};
use crate::metrics::{MetricsAggregator, SystemMetrics};
use crate::registry::{Component, ComponentRegistry};
use crate::system::{CapabilityFlags, Phase};
use crate::types::KairosError;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Process-lifetime orchestrator state.
#[derive(Debug)]
pub struct OrchestratorState {
    pub(crate) registry: ComponentRegistry,
    pub(crate) bus: EventBus,
    pub(crate) aggregator: MetricsAggregator,
    pub(crate) phase: Phase,
    pub(crate) overall_level: f64,
    pub(crate) flags: CapabilityFlags,
    pub(crate) metrics: SystemMetrics,
    pub(crate) is_activated: bool,
    pub(crate) activated_at: Option<DateTime<Utc>>,
}

impl Default for OrchestratorState {
    fn default() -> Self {
        Self::new(&OrchestratorConfig::default())
    }
}

impl OrchestratorState {
    /// Create a fresh state: every component dormant at zero, phase
    /// `uninitialized`, no events.
    ///
    /// The configuration is taken as-is; call
    /// [`OrchestratorConfig::validate`] first when it comes from user input.
    #[must_use]
    pub fn new(config: &OrchestratorConfig) -> Self {
        Self {
            registry: ComponentRegistry::new(),
            bus: EventBus::new(config.event_capacity),
            aggregator: MetricsAggregator::new(config.tuning.clone()),
            phase: Phase::Uninitialized,
            overall_level: 0.0,
            flags: CapabilityFlags::default(),
            metrics: SystemMetrics::default(),
            is_activated: false,
            activated_at: None,
        }
    }

    // =========================================================================
    // READ ACCESS
    // =========================================================================

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn is_activated(&self) -> bool {
        self.is_activated
    }

    #[must_use]
    pub fn activated_at(&self) -> Option<DateTime<Utc>> {
        self.activated_at
    }

    /// Rounded mean of all component scores.
    #[must_use]
    pub fn overall_level(&self) -> f64 {
        self.overall_level
    }

    #[must_use]
    pub fn capability_flags(&self) -> CapabilityFlags {
        self.flags
    }

    #[must_use]
    pub fn metrics(&self) -> SystemMetrics {
        self.metrics
    }

    /// Read-only view of the registry.
    #[must_use]
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Owned copy of one component.
    pub fn component(&self, name: &str) -> Result<Component, KairosError> {
        self.registry.get(name).cloned()
    }

    /// Up to `limit` newest events, oldest first.
    #[must_use]
    pub fn recent_events(&self, limit: usize) -> Vec<Event> {
        self.bus.recent(limit)
    }

    /// Total number of events ever published.
    #[must_use]
    pub fn events_published(&self) -> u64 {
        self.bus.published()
    }

    // =========================================================================
    // EVENT PLUMBING
    // =========================================================================

    /// Register a live event subscriber.
    pub fn subscribe(&mut self, sink: Arc<dyn EventSink>) {
        self.bus.subscribe(sink);
    }

    /// Publish an event, then recompute metrics from the registry and that
    /// event. Returns the event id.
    pub(crate) fn publish(&mut self, draft: EventDraft) -> u64 {
        let id = self.bus.publish(draft);
        self.metrics = self.aggregator.recompute(
            &self.registry,
            &self.metrics,
            self.bus.latest(),
            self.phase.metrics_frozen(),
        );
        id
    }

    /// Recompute `overall_level` from the current scores.
    pub(crate) fn refresh_overall_level(&mut self) {
        self.overall_level = MetricsAggregator::overall_level(&self.registry);
    }

    /// Move to `phase` if it is ahead of the current one.
    ///
    /// Returns `false` (and changes nothing) for a backward or same-phase
    /// request.
    pub(crate) fn advance_to(&mut self, phase: Phase) -> bool {
        if phase <= self.phase {
            return false;
        }
        self.phase = phase;
        true
    }
}

// =============================================================================
// TESTS
// =============================================================================
