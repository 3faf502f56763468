//! # Component Registry
//!
//! The fixed set of named components and the single mutation point for
//! their scores.
//!
//! ## Invariants
//!
//! - Scores stay within `[0, 100]` and never decrease: [`ComponentRegistry::mutate`]
//!   clamps negative deltas to zero.
//! - `evolution_count` grows by exactly one per successful mutation.
//! - Status never regresses: [`ComponentRegistry::promote`] only raises it.
//! - Components are never added or removed after construction.

use crate::types::{ComponentStatus, KairosError, SCORE_CEILING, clamp_score};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// COMPONENT NAMES
// =============================================================================

pub const CORE: &str = "core";
pub const SECURITY: &str = "security";
pub const HARMONY: &str = "harmony";
pub const AMBIENT: &str = "ambient";
pub const UNIFIED: &str = "unified";

/// Declared activation order.
pub const COMPONENT_ORDER: [&str; 5] = [CORE, SECURITY, HARMONY, AMBIENT, UNIFIED];

// =============================================================================
// COMPONENT
// =============================================================================

/// One named subsystem slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub name: String,
    pub capability_score: f64,
    pub status: ComponentStatus,
    pub capability_tags: BTreeSet<String>,
    pub last_evolved_at: Option<DateTime<Utc>>,
    pub evolution_count: u64,
}

impl Component {
    /// Create a dormant component with a zero score.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capability_score: 0.0,
            status: ComponentStatus::Dormant,
            capability_tags: BTreeSet::new(),
            last_evolved_at: None,
            evolution_count: 0,
        }
    }

    /// Whether the score can still grow.
    #[must_use]
    pub fn below_ceiling(&self) -> bool {
        self.capability_score < SCORE_CEILING
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

/// Registry of components, kept in declared order.
#[derive(Debug, Clone)]
pub struct ComponentRegistry {
    components: Vec<Component>,
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentRegistry {
    /// Create the registry with every component in [`COMPONENT_ORDER`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            components: COMPONENT_ORDER.iter().map(|n| Component::new(*n)).collect(),
        }
    }

    /// Look up a component by name.
    pub fn get(&self, name: &str) -> Result<&Component, KairosError> {
        self.components
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| KairosError::NotFound(name.to_string()))
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut Component, KairosError> {
        self.components
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| KairosError::NotFound(name.to_string()))
    }

    /// Visit every component in declared order.
    pub fn for_each<F: FnMut(&Component)>(&self, f: F) {
        self.components.iter().for_each(f);
    }

    /// Iterate over components in declared order.
    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.components.iter()
    }

    /// Component names in declared order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(|c| c.name.as_str())
    }

    /// Apply a score delta and append tags.
    ///
    /// Negative deltas are clamped to zero and the result is clamped to the
    /// ceiling. Non-finite deltas are rejected without touching the row.
    pub fn mutate<I, S>(
        &mut self,
        name: &str,
        delta: f64,
        new_tags: I,
    ) -> Result<&Component, KairosError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !delta.is_finite() {
            return Err(KairosError::InvalidAdjustment {
                component: name.to_string(),
                delta,
            });
        }

        let component = self.get_mut(name)?;
        let applied = delta.max(0.0);
        component.capability_score = clamp_score(component.capability_score + applied);
        component
            .capability_tags
            .extend(new_tags.into_iter().map(Into::into));
        component.evolution_count = component.evolution_count.saturating_add(1);
        component.last_evolved_at = Some(Utc::now());

        Ok(component)
    }

    /// Raise a component's status. Lower targets are ignored.
    pub fn promote(
        &mut self,
        name: &str,
        status: ComponentStatus,
    ) -> Result<&Component, KairosError> {
        let component = self.get_mut(name)?;
        component.status = component.status.max(status);
        Ok(component)
    }

    /// Arithmetic mean of all scores (0 for an empty registry).
    #[must_use]
    pub fn mean_score(&self) -> f64 {
        if self.components.is_empty() {
            return 0.0;
        }
        let total: f64 = self.components.iter().map(|c| c.capability_score).sum();
        total / self.components.len() as f64
    }

    /// Mean of two named components' scores.
    pub fn pair_mean(&self, a: &str, b: &str) -> Result<f64, KairosError> {
        let first = self.get(a)?.capability_score;
        let second = self.get(b)?.capability_score;
        Ok((first + second) / 2.0)
    }

    /// Sum of evolution counters across all components.
    #[must_use]
    pub fn total_evolutions(&self) -> u64 {
        self.components
            .iter()
            .fold(0u64, |acc, c| acc.saturating_add(c.evolution_count))
    }
}

// =============================================================================
// TESTS
// =============================================================================
