//! Consensus types

use crate::signal::{Asset, Direction};
use serde::{Deserialize, Serialize};

/// The single trade intention derived from all strategy signals for one
/// asset in one cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusDecision {
    /// Target asset
    pub asset: Asset,
    /// Agreed direction
    pub direction: Direction,
    /// Net weighted confidence in [0, 1]
    pub aggregate_confidence: f64,
    /// Weighted mean of the agreeing strategies' suggested fractions
    pub target_size_fraction: f64,
}

/// Outcome of one asset's vote
///
/// "No decision" is an expected, frequent result and is modeled as a
/// plain variant rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VoteOutcome {
    /// Consensus reached; trade intention emitted
    Decision(ConsensusDecision),
    /// Net confidence fell short of the threshold
    BelowThreshold {
        asset: Asset,
        aggregate_confidence: f64,
    },
    /// Weighted directions cancelled exactly; resolves to no trade
    Tie { asset: Asset },
    /// Every strategy abstained (or carried zero weight)
    NoSignals { asset: Asset },
}

impl VoteOutcome {
    /// The decision, if one was emitted
    pub fn decision(&self) -> Option<&ConsensusDecision> {
        match self {
            VoteOutcome::Decision(d) => Some(d),
            _ => None,
        }
    }
}
