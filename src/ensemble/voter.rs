//! Weighted ensemble voting

use super::{ConsensusDecision, VoteOutcome};
use crate::allocator::AllocationWeights;
use crate::signal::{Direction, StrategySignal};

/// Aggregates weighted strategy signals into one decision per asset
///
/// Each signal is weighted by its strategy's allocation. Dissenting
/// signals subtract from aggregate confidence rather than being
/// discarded, so a strong minority can veto a weak majority.
pub struct EnsembleVoter {
    /// Minimum aggregate confidence to emit a decision (inclusive)
    confidence_threshold: f64,
}

impl EnsembleVoter {
    /// Create a voter with the given confidence threshold
    pub fn new(confidence_threshold: f64) -> Self {
        Self {
            confidence_threshold,
        }
    }

    /// Vote over one asset's signals for this cycle
    pub fn vote(
        &self,
        asset: &str,
        signals: &[StrategySignal],
        weights: &AllocationWeights,
    ) -> VoteOutcome {
        let weighted: Vec<(&StrategySignal, f64)> = signals
            .iter()
            .filter(|s| s.asset == asset)
            .filter_map(|s| {
                let w = weights.get(&s.strategy_id).copied().unwrap_or(0.0);
                (w > 0.0).then_some((s, w))
            })
            .collect();

        if weighted.is_empty() {
            return VoteOutcome::NoSignals {
                asset: asset.to_string(),
            };
        }

        // Majority direction by net weighted confidence; flat signals
        // contribute nothing here but dissent below
        let net: f64 = weighted
            .iter()
            .map(|(s, w)| w * s.confidence * s.direction.sign())
            .sum();

        let majority = if net > 0.0 {
            Direction::Long
        } else if net < 0.0 {
            Direction::Short
        } else {
            return VoteOutcome::Tie {
                asset: asset.to_string(),
            };
        };

        // Dissenters (including explicit flats) count against consensus
        let mut aggregate_confidence = 0.0;
        let mut size_sum = 0.0;
        let mut size_weight = 0.0;
        for (signal, weight) in &weighted {
            let agreement = if signal.direction == majority { 1.0 } else { -1.0 };
            aggregate_confidence += weight * signal.confidence * agreement;
            if agreement > 0.0 {
                size_sum += weight * signal.suggested_size_fraction;
                size_weight += weight;
            }
        }

        if aggregate_confidence < self.confidence_threshold {
            return VoteOutcome::BelowThreshold {
                asset: asset.to_string(),
                aggregate_confidence,
            };
        }

        VoteOutcome::Decision(ConsensusDecision {
            asset: asset.to_string(),
            direction: majority,
            aggregate_confidence: aggregate_confidence.min(1.0),
            target_size_fraction: if size_weight > 0.0 {
                size_sum / size_weight
            } else {
                0.0
            },
        })
    }
}
