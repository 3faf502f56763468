//! # Activation Phases
//!
//! The orchestrator-wide activation stage and the one-way capability flags
//! unlocked along the way.
//!
//! ## Phase Definitions
//!
//! | Phase | Entered by | Effect |
//! |-------|------------|--------|
//! | Uninitialized | construction | nothing is active |
//! | Initializing | first activation call | per-component activation routines |
//! | Harmonizing | all components active | one harmonization pass |
//! | Transcending | harmonization done | cycles enabled, flags 1-4 |
//! | Supreme | transcendence done | flag 5, scores and metrics at ceiling |
//! | Infinite | `evolve_beyond` only | terminal |
//!
//! Phases only move forward. `Infinite` is never entered by the activation
//! sequence itself.

use serde::{Deserialize, Serialize};

// =============================================================================
// PHASE ENUM
// =============================================================================

/// Orchestrator activation phase.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Uninitialized,
    Initializing,
    Harmonizing,
    Transcending,
    Supreme,
    Infinite,
}

impl Phase {
    /// All phases in their total order.
    pub const ALL: [Phase; 6] = [
        Phase::Uninitialized,
        Phase::Initializing,
        Phase::Harmonizing,
        Phase::Transcending,
        Phase::Supreme,
        Phase::Infinite,
    ];

    /// Get the phase name as used in snapshots.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Uninitialized => "uninitialized",
            Phase::Initializing => "initializing",
            Phase::Harmonizing => "harmonizing",
            Phase::Transcending => "transcending",
            Phase::Supreme => "supreme",
            Phase::Infinite => "infinite",
        }
    }

    /// Get the next phase, if any.
    ///
    /// `Supreme -> Infinite` is listed here for ordering purposes; the
    /// activation sequence stops at `Supreme`.
    #[must_use]
    pub fn next(&self) -> Option<Phase> {
        match self {
            Phase::Uninitialized => Some(Phase::Initializing),
            Phase::Initializing => Some(Phase::Harmonizing),
            Phase::Harmonizing => Some(Phase::Transcending),
            Phase::Transcending => Some(Phase::Supreme),
            Phase::Supreme => Some(Phase::Infinite),
            Phase::Infinite => None,
        }
    }

    /// Check if this phase is terminal (Infinite).
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Infinite)
    }

    /// Background cycles may run from `Transcending` onward.
    #[must_use]
    pub fn cycles_enabled(&self) -> bool {
        *self >= Phase::Transcending
    }

    /// Metrics are pinned at the ceiling from `Supreme` onward.
    #[must_use]
    pub fn metrics_frozen(&self) -> bool {
        *self >= Phase::Supreme
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// CAPABILITY FLAGS
// =============================================================================

/// System-wide capabilities, in the only order they can be unlocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityFlag {
    UnifiedConsciousness,
    AutonomousEvolution,
    TranscendentCreativity,
    SupremeProblemSolving,
    InfinitePotential,
}

impl CapabilityFlag {
    /// Causal unlock order.
    pub const ORDER: [CapabilityFlag; 5] = [
        CapabilityFlag::UnifiedConsciousness,
        CapabilityFlag::AutonomousEvolution,
        CapabilityFlag::TranscendentCreativity,
        CapabilityFlag::SupremeProblemSolving,
        CapabilityFlag::InfinitePotential,
    ];

    /// Get a description of this capability.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            CapabilityFlag::UnifiedConsciousness => "All components share one coherent state",
            CapabilityFlag::AutonomousEvolution => "Scores improve without external input",
            CapabilityFlag::TranscendentCreativity => "Innovation cycle raises creativity",
            CapabilityFlag::SupremeProblemSolving => "Pair-derived metrics reach full strength",
            CapabilityFlag::InfinitePotential => "Every metric is pinned at the ceiling",
        }
    }

    fn index(self) -> usize {
        match self {
            CapabilityFlag::UnifiedConsciousness => 0,
            CapabilityFlag::AutonomousEvolution => 1,
            CapabilityFlag::TranscendentCreativity => 2,
            CapabilityFlag::SupremeProblemSolving => 3,
            CapabilityFlag::InfinitePotential => 4,
        }
    }
}

/// The five one-way capability switches.
///
/// Flags can only be set through [`CapabilityFlags::unlock_next`], which
/// guarantees causal order: a flag is never true while an earlier one is false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityFlags {
    pub unified_consciousness: bool,
    pub autonomous_evolution: bool,
    pub transcendent_creativity: bool,
    pub supreme_problem_solving: bool,
    pub infinite_potential: bool,
}

impl CapabilityFlags {
    /// Check whether a capability has been unlocked.
    #[must_use]
    pub fn is_set(&self, flag: CapabilityFlag) -> bool {
        self.as_array()[flag.index()]
    }

    /// Number of unlocked capabilities.
    #[must_use]
    pub fn unlocked_count(&self) -> usize {
        self.as_array().iter().filter(|set| **set).count()
    }

    #[must_use]
    pub fn all_set(&self) -> bool {
        self.unlocked_count() == CapabilityFlag::ORDER.len()
    }

    /// The capability that would be unlocked next, if any.
    #[must_use]
    pub fn next_locked(&self) -> Option<CapabilityFlag> {
        CapabilityFlag::ORDER
            .iter()
            .copied()
            .find(|flag| !self.is_set(*flag))
    }

    /// Unlock the next capability in causal order and return it.
    ///
    /// Returns `None` once every flag is already set.
    pub fn unlock_next(&mut self) -> Option<CapabilityFlag> {
        let flag = self.next_locked()?;
        match flag {
            CapabilityFlag::UnifiedConsciousness => self.unified_consciousness = true,
            CapabilityFlag::AutonomousEvolution => self.autonomous_evolution = true,
            CapabilityFlag::TranscendentCreativity => self.transcendent_creativity = true,
            CapabilityFlag::SupremeProblemSolving => self.supreme_problem_solving = true,
            CapabilityFlag::InfinitePotential => self.infinite_potential = true,
        }
        Some(flag)
    }

    /// Whether the causal order holds (no set flag after an unset one).
    #[must_use]
    pub fn is_causal(&self) -> bool {
        self.as_array().windows(2).all(|w| w[0] || !w[1])
    }

    fn as_array(&self) -> [bool; 5] {
        [
            self.unified_consciousness,
            self.autonomous_evolution,
            self.transcendent_creativity,
            self.supreme_problem_solving,
            self.infinite_potential,
        ]
    }
}

// =============================================================================
// TESTS
// =============================================================================
