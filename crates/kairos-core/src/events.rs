//! # Event Bus
//!
//! Bounded, in-process publish/subscribe channel for audit events.
//!
//! Every phase transition and every cycle tick publishes exactly one
//! [`Event`]. The bus keeps the newest `capacity` events in a FIFO ring;
//! publishing past capacity silently drops the oldest. Publishing never
//! blocks: sinks receive a reference and must not wait on anything.

use crate::types::EventType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

/// Default ring-buffer capacity.
pub const DEFAULT_EVENT_CAPACITY: usize = 1000;

/// Component field value for events that concern the whole system.
pub const ALL_COMPONENTS: &str = "all";

// =============================================================================
// EVENT
// =============================================================================

/// An immutable record of a state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Unique, monotonically increasing identifier.
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Component name, or [`ALL_COMPONENTS`].
    pub component: String,
    /// Level snapshot at publication time.
    pub level: f64,
    /// Human-readable impact tag.
    pub impact: String,
    pub metadata: BTreeMap<String, String>,
}

/// Event contents before the bus assigns an id and timestamp.
#[derive(Debug, Clone)]
pub struct EventDraft {
    pub event_type: EventType,
    pub component: String,
    pub level: f64,
    pub impact: String,
    pub metadata: BTreeMap<String, String>,
}

impl EventDraft {
    #[must_use]
    pub fn new(
        event_type: EventType,
        component: impl Into<String>,
        level: f64,
        impact: impl Into<String>,
    ) -> Self {
        Self {
            event_type,
            component: component.into(),
            level,
            impact: impact.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// Attach a metadata entry.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.metadata.insert(key.into(), value.to_string());
        self
    }
}

// =============================================================================
// EVENT SINK TRAIT
// =============================================================================

/// Subscriber interface for live events.
///
/// # Extension Point
///
/// The core ships no implementation. The app layer forwards events to an
/// async channel. Implementations must return immediately; a slow consumer
/// must drop events rather than block the publisher.
pub trait EventSink: Send + Sync {
    fn deliver(&self, event: &Event);
}

// =============================================================================
// EVENT BUS
// =============================================================================

/// Bounded FIFO event history plus live subscribers.
pub struct EventBus {
    capacity: usize,
    next_id: u64,
    history: VecDeque<Event>,
    sinks: Vec<Arc<dyn EventSink>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("capacity", &self.capacity)
            .field("next_id", &self.next_id)
            .field("len", &self.history.len())
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl EventBus {
    /// Create a bus keeping at most `capacity` events (minimum 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            next_id: 1,
            history: VecDeque::with_capacity(capacity),
            sinks: Vec::new(),
        }
    }

    /// Register a live subscriber.
    pub fn subscribe(&mut self, sink: Arc<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Stamp, store and fan out an event. Returns the assigned id.
    pub fn publish(&mut self, draft: EventDraft) -> u64 {
        let id = self.next_id;
        let event = Event {
            id,
            timestamp: Utc::now(),
            event_type: draft.event_type,
            component: draft.component,
            level: draft.level,
            impact: draft.impact,
            metadata: draft.metadata,
        };
        self.next_id = self.next_id.saturating_add(1);

        for sink in &self.sinks {
            sink.deliver(&event);
        }

        if self.history.len() >= self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(event);
        id
    }

    /// The most recently published event still in history.
    #[must_use]
    pub fn latest(&self) -> Option<&Event> {
        self.history.back()
    }

    /// Up to `limit` newest events, oldest first.
    #[must_use]
    pub fn recent(&self, limit: usize) -> Vec<Event> {
        let skip = self.history.len().saturating_sub(limit);
        self.history.iter().skip(skip).cloned().collect()
    }

    /// Total number of events ever published.
    #[must_use]
    pub fn published(&self) -> u64 {
        self.next_id.saturating_sub(1)
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

// =============================================================================
// TESTS
// =============================================================================
