//! # Cycle Scheduler
//!
//! Four independent tokio tasks, one per [`CycleKind`], each firing on its
//! own period from the [`CycleSchedule`].
//!
//! Every tick takes the state's write lock for the whole
//! mutate-recompute-publish sequence. Shutdown is cooperative: a watch
//! channel tells each task to leave its loop, and a tick that already
//! started always runs to completion before the task exits.

use kairos_core::{CycleKind, CycleReport, CycleSchedule, KairosError, OrchestratorState};
use std::sync::Arc;
use tokio::sync::{RwLock, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// State shared between the facade and the cycle tasks.
pub type SharedState = Arc<RwLock<OrchestratorState>>;

// =============================================================================
// SCHEDULER
// =============================================================================

/// Handles of the running cycle tasks.
#[derive(Debug)]
pub struct CycleScheduler {
    shutdown: watch::Sender<bool>,
    handles: Vec<(CycleKind, JoinHandle<()>)>,
}

impl CycleScheduler {
    /// Spawn one task per cycle. The first tick of each cycle fires one full
    /// period after start.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn start(state: SharedState, schedule: &CycleSchedule) -> Self {
        let (shutdown, _) = watch::channel(false);

        let handles = CycleKind::ALL
            .into_iter()
            .map(|kind| {
                let period = schedule.period(kind);
                let handle = tokio::spawn(cycle_loop(
                    kind,
                    period,
                    Arc::clone(&state),
                    shutdown.subscribe(),
                ));
                tracing::debug!(cycle = %kind, period_secs = period.as_secs(), "cycle task spawned");
                (kind, handle)
            })
            .collect();

        Self { shutdown, handles }
    }

    /// Number of cycle tasks still alive.
    #[must_use]
    pub fn running_tasks(&self) -> usize {
        self.handles.iter().filter(|(_, h)| !h.is_finished()).count()
    }

    /// Signal every task and wait for in-flight ticks to finish.
    pub async fn shutdown(self) {
        // Receivers observe the change even if every task is mid-tick.
        let _ = self.shutdown.send(true);

        for (kind, handle) in self.handles {
            if let Err(e) = handle.await {
                tracing::warn!(cycle = %kind, error = %e, "cycle task ended abnormally");
            }
        }
        tracing::info!("cycle scheduler stopped");
    }
}

async fn cycle_loop(
    kind: CycleKind,
    period: std::time::Duration,
    state: SharedState,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        if *shutdown.borrow() {
            break;
        }

        tokio::select! {
            biased;
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                let result = state.write().await.run_cycle(kind);
                log_tick(kind, &result);
            }
        }
    }

    tracing::debug!(cycle = %kind, "cycle task exiting");
}

// =============================================================================
// LOGGING
// =============================================================================

/// Log the outcome of one tick: the tick itself at `debug`, each skipped
/// component at `warn`.
pub fn log_tick(kind: CycleKind, result: &Result<CycleReport, KairosError>) {
    match result {
        Ok(report) => {
            for failure in &report.failures {
                tracing::warn!(
                    cycle = %kind,
                    component = %failure.component,
                    error = %failure.error,
                    "component skipped during cycle"
                );
            }
            tracing::debug!(
                cycle = %kind,
                event_id = report.event_id,
                adjusted = report.adjusted.len(),
                failed = report.failures.len(),
                "cycle tick"
            );
        }
        Err(e) => {
            tracing::warn!(cycle = %kind, error = %e, "cycle tick rejected");
        }
    }
}
