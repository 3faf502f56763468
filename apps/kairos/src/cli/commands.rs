//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.
//! Every command activates the orchestrator first (a no-op when already
//! activated), then prints either plain text or, with `--json-mode`, one
//! pretty-printed JSON document.

use kairos::Orchestrator;
use kairos_core::{
    CapabilityFlag, ComponentSnapshot, CycleKind, Event, KairosError, Report, StatusSnapshot,
};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;

/// Output switches shared by every command.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json_mode: bool,
    pub verbose: bool,
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_default()
    );
}

// =============================================================================
// RUN COMMAND
// =============================================================================

/// Activate, keep the cycles running until Ctrl+C, then print the report.
pub async fn cmd_run(
    orchestrator: &Orchestrator,
    out: Output,
    evolve_beyond: bool,
) -> Result<(), KairosError> {
    let mut events = orchestrator.subscribe();
    let listener = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => log_event(&event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event listener lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let result = run_until_interrupted(orchestrator, evolve_beyond).await;
    orchestrator.stop().await;
    listener.abort();
    result?;

    let report = orchestrator.generate_report().await;
    print_report(&report, out);
    Ok(())
}

async fn run_until_interrupted(
    orchestrator: &Orchestrator,
    evolve_beyond: bool,
) -> Result<(), KairosError> {
    orchestrator.ensure_activated().await?;
    if evolve_beyond {
        orchestrator.evolve_beyond().await?;
    }

    let schedule = &orchestrator.config().schedule;
    println!("Kairos Orchestrator Running...");
    println!();
    println!("Cycles:");
    for kind in CycleKind::ALL {
        println!(
            "  {:<14} every {}s",
            kind.name(),
            schedule.period(kind).as_secs()
        );
    }
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| KairosError::IoError(format!("Signal handler failed: {}", e)))?;
    tracing::info!("shutdown requested");
    Ok(())
}

fn log_event(event: &Event) {
    tracing::info!(
        id = event.id,
        event_type = %event.event_type,
        component = %event.component,
        level = event.level,
        impact = %event.impact,
        "event"
    );
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show orchestrator status.
pub async fn cmd_status(orchestrator: &Orchestrator, out: Output) -> Result<(), KairosError> {
    orchestrator.ensure_activated().await?;
    let status = orchestrator.status().await;

    if out.json_mode {
        print_json(&status);
        return Ok(());
    }

    print_status(&status, out.verbose);
    Ok(())
}

fn print_status(status: &StatusSnapshot, verbose: bool) {
    println!("Kairos Orchestrator Status");
    println!("==========================");
    println!("Phase:         {}", status.phase);
    println!("Overall Level: {:.0}", status.overall_level);
    println!("Events:        {}", status.events_published);
    if let Some(at) = status.activated_at {
        println!("Activated At:  {}", at.to_rfc3339());
    }
    println!();
    println!("Components:");
    for component in &status.components {
        print_component_row(component);
    }
    println!();
    println!("Metrics:");
    for (name, value) in status.metrics.fields() {
        println!("  {:<22} {:>6.1}", name, value);
    }

    if verbose {
        println!();
        println!("Capabilities:");
        for flag in CapabilityFlag::ORDER {
            let mark = if status.capability_flags.is_set(flag) {
                "x"
            } else {
                " "
            };
            println!("  [{}] {:?} - {}", mark, flag, flag.description());
        }
    }
}

fn print_component_row(component: &ComponentSnapshot) {
    println!(
        "  {:<10} {:>6.1}  {:<12} evolutions: {}",
        component.name,
        component.score,
        component.status.as_str(),
        component.evolution_count
    );
}

// =============================================================================
// COMPONENT COMMAND
// =============================================================================

/// Show one component.
pub async fn cmd_component(
    orchestrator: &Orchestrator,
    out: Output,
    name: &str,
) -> Result<(), KairosError> {
    orchestrator.ensure_activated().await?;
    let component = orchestrator.component(name).await?;

    if out.json_mode {
        print_json(&component);
        return Ok(());
    }

    println!("Component: {}", component.name);
    println!("  Score:      {:.1}", component.score);
    println!("  Status:     {}", component.status);
    println!("  Evolutions: {}", component.evolution_count);
    Ok(())
}

// =============================================================================
// EVENTS COMMAND
// =============================================================================

/// Show the most recent events, oldest first.
pub async fn cmd_events(
    orchestrator: &Orchestrator,
    out: Output,
    limit: usize,
) -> Result<(), KairosError> {
    orchestrator.ensure_activated().await?;
    let events = orchestrator.recent_events(limit).await;

    if out.json_mode {
        print_json(&events);
        return Ok(());
    }

    if events.is_empty() {
        println!("No events");
        return Ok(());
    }
    for event in &events {
        print_event(event, out.verbose);
    }
    Ok(())
}

fn print_event(event: &Event, verbose: bool) {
    println!(
        "#{:<5} {} {:<14} {:<10} {:>6.1}  {}",
        event.id,
        event.timestamp.format("%H:%M:%S%.3f"),
        event.event_type.as_str(),
        event.component,
        event.level,
        event.impact
    );
    if verbose {
        for (key, value) in &event.metadata {
            println!("         {} = {}", key, value);
        }
    }
}

// =============================================================================
// REPORT COMMAND
// =============================================================================

/// Show the full report.
pub async fn cmd_report(orchestrator: &Orchestrator, out: Output) -> Result<(), KairosError> {
    orchestrator.ensure_activated().await?;
    let report = orchestrator.generate_report().await;
    print_report(&report, out);
    Ok(())
}

fn print_report(report: &Report, out: Output) {
    if out.json_mode {
        print_json(report);
        return;
    }

    print_status(&report.status, out.verbose);
    println!();
    println!("Recent Events:");
    for event in &report.recent_events {
        print_event(event, out.verbose);
    }
    println!();
    println!("Recommendations:");
    for recommendation in &report.recommendations {
        println!("  - {}", recommendation);
    }
}

// =============================================================================
// SIMULATE COMMAND
// =============================================================================

/// Drive `ticks` ticks of every cycle immediately, then show status.
pub async fn cmd_simulate(
    orchestrator: &Orchestrator,
    out: Output,
    ticks: u32,
) -> Result<(), KairosError> {
    orchestrator.ensure_activated().await?;

    let mut failures = 0usize;
    for _ in 0..ticks {
        for kind in CycleKind::ALL {
            failures += orchestrator.run_cycle(kind).await?.failures.len();
        }
    }
    tracing::info!(ticks, failures, "simulation finished");

    cmd_status(orchestrator, out).await
}

// =============================================================================
// EVOLVE COMMAND
// =============================================================================

/// Evolve beyond supreme, then show status.
pub async fn cmd_evolve(orchestrator: &Orchestrator, out: Output) -> Result<(), KairosError> {
    orchestrator.ensure_activated().await?;
    orchestrator.evolve_beyond().await?;
    cmd_status(orchestrator, out).await
}
