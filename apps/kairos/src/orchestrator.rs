//! # Orchestrator Facade
//!
//! The process-wide handle around [`OrchestratorState`]. Built once at start
//! and shared by `Arc`; every method takes `&self`.
//!
//! ## Locking
//!
//! One `tokio::sync::RwLock` guards the state. Activation, `evolve_beyond`
//! and every cycle tick take the write lock for their whole duration, so
//! they are atomic with respect to each other. Read-only calls return owned
//! snapshots and never hold the lock past the call.

use crate::scheduler::{CycleScheduler, SharedState, log_tick};
use kairos_core::{
    ActivationPlan, ComponentSnapshot, CycleKind, CycleReport, Event, EventSink, KairosError,
    OrchestratorConfig, OrchestratorState, Report, StatusSnapshot,
};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock, broadcast};

// =============================================================================
// EVENT FAN-OUT
// =============================================================================

/// Forwards core events to a broadcast channel. Never blocks; with no
/// receivers the event is dropped.
struct BroadcastSink {
    sender: broadcast::Sender<Event>,
}

impl EventSink for BroadcastSink {
    fn deliver(&self, event: &Event) {
        let _ = self.sender.send(event.clone());
    }
}

// =============================================================================
// TIMERS
// =============================================================================

#[derive(Debug)]
enum Timers {
    Idle,
    Running(CycleScheduler),
    Stopped,
}

// =============================================================================
// ORCHESTRATOR
// =============================================================================

/// Shared orchestrator handle.
pub struct Orchestrator {
    state: SharedState,
    plan: ActivationPlan,
    config: OrchestratorConfig,
    events: broadcast::Sender<Event>,
    timers: Mutex<Timers>,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("plan", &self.plan)
            .field("config", &self.config)
            .finish()
    }
}

impl Orchestrator {
    /// Create an orchestrator with the standard activation plan.
    pub fn new(config: OrchestratorConfig) -> Result<Self, KairosError> {
        Self::with_plan(config, ActivationPlan::standard())
    }

    /// Create an orchestrator with a custom activation plan.
    ///
    /// Fails with `ConfigError` when `config` does not validate.
    pub fn with_plan(
        config: OrchestratorConfig,
        plan: ActivationPlan,
    ) -> Result<Self, KairosError> {
        config.validate()?;
        let (events, _) = broadcast::channel(config.event_capacity);

        let mut state = OrchestratorState::new(&config);
        state.subscribe(Arc::new(BroadcastSink {
            sender: events.clone(),
        }));

        Ok(Self {
            state: Arc::new(RwLock::new(state)),
            plan,
            config,
            events,
            timers: Mutex::new(Timers::Idle),
        })
    }

    #[must_use]
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Activate once and start the background cycles.
    ///
    /// Safe to call from any number of tasks: the check and the whole
    /// activation run happen under the write lock, so exactly one caller
    /// performs the sequence and the rest return after it completes. On
    /// failure nothing is rolled back and a later call retries.
    pub async fn ensure_activated(&self) -> Result<(), KairosError> {
        {
            let mut state = self.state.write().await;
            match state.activate(&self.plan) {
                Ok(true) => {
                    tracing::info!(
                        phase = %state.phase(),
                        overall_level = state.overall_level(),
                        events = state.events_published(),
                        "activation complete"
                    );
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::error!(phase = %state.phase(), error = %e, "activation failed");
                    return Err(e);
                }
            }
        }

        self.start_cycles().await;
        Ok(())
    }

    async fn start_cycles(&self) {
        let mut timers = self.timers.lock().await;
        if matches!(*timers, Timers::Idle) {
            *timers = Timers::Running(CycleScheduler::start(
                Arc::clone(&self.state),
                &self.config.schedule,
            ));
            tracing::info!(
                evolution_secs = self.config.schedule.evolution_secs,
                harmonization_secs = self.config.schedule.harmonization_secs,
                innovation_secs = self.config.schedule.innovation_secs,
                monitoring_secs = self.config.schedule.monitoring_secs,
                "cycle scheduler started"
            );
        }
    }

    /// Whether the background cycles are currently scheduled.
    pub async fn cycles_running(&self) -> bool {
        match &*self.timers.lock().await {
            Timers::Running(scheduler) => scheduler.running_tasks() > 0,
            Timers::Idle | Timers::Stopped => false,
        }
    }

    /// Stop the background cycles and wait for in-flight ticks.
    ///
    /// Idempotent. The cycles are never restarted afterwards; status and
    /// report calls keep working.
    pub async fn stop(&self) {
        let mut timers = self.timers.lock().await;
        if let Timers::Running(scheduler) = std::mem::replace(&mut *timers, Timers::Stopped) {
            scheduler.shutdown().await;
        }
    }

    /// Move from `supreme` to `infinite`.
    pub async fn evolve_beyond(&self) -> Result<(), KairosError> {
        let mut state = self.state.write().await;
        state.evolve_beyond()?;
        tracing::info!(phase = %state.phase(), "evolved beyond supreme");
        Ok(())
    }

    /// Run one tick of `kind` right now, under the same lock the scheduler
    /// uses.
    pub async fn run_cycle(&self, kind: CycleKind) -> Result<CycleReport, KairosError> {
        let result = self.state.write().await.run_cycle(kind);
        log_tick(kind, &result);
        result
    }

    // =========================================================================
    // READ ACCESS
    // =========================================================================

    pub async fn status(&self) -> StatusSnapshot {
        self.state.read().await.status()
    }

    pub async fn component(&self, name: &str) -> Result<ComponentSnapshot, KairosError> {
        let state = self.state.read().await;
        state.registry().get(name).map(ComponentSnapshot::from)
    }

    /// Up to `limit` newest events, oldest first.
    pub async fn recent_events(&self, limit: usize) -> Vec<Event> {
        self.state.read().await.recent_events(limit)
    }

    pub async fn generate_report(&self) -> Report {
        self.state.read().await.report()
    }

    /// Receive every event published from now on. A receiver that falls more
    /// than `event_capacity` events behind loses the oldest ones.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }
}
