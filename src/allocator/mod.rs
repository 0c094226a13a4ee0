//! Adaptive strategy allocation
//!
//! Turns Sharpe estimates and correlation penalties into smoothed
//! per-strategy weights summing to 1.

use crate::perf::{CorrelationMatrix, PerformanceTracker};
use crate::signal::StrategyId;
use std::collections::HashMap;

/// Per-strategy allocation weights for one cycle
pub type AllocationWeights = HashMap<StrategyId, f64>;

/// Performance- and correlation-aware weight allocator
///
/// Raw score per strategy = `sharpe × (1 − correlation_penalty)`,
/// floored at a small epsilon so a losing strategy keeps a foothold to
/// rebound from. Scores are normalized to sum to 1, then exponentially
/// smoothed against the previous cycle with a per-cycle delta clamp.
///
/// `Σw = 1` takes precedence over the delta clamp: renormalization runs
/// after clamping, so a weight's realized per-cycle move can exceed
/// `max_delta` by the renormalization factor. The clamp bounds the
/// pre-normalization step, not the final weight.
pub struct AdaptiveAllocator {
    alpha: f64,
    max_delta: f64,
    score_epsilon: f64,
    prev: AllocationWeights,
}

impl AdaptiveAllocator {
    /// Create an allocator with smoothing factor `alpha`, max per-cycle
    /// weight delta, and the negative-score floor
    pub fn new(alpha: f64, max_delta: f64, score_epsilon: f64) -> Self {
        Self {
            alpha,
            max_delta,
            score_epsilon,
            prev: HashMap::new(),
        }
    }

    /// Weights from the previous cycle
    pub fn current_weights(&self) -> &AllocationWeights {
        &self.prev
    }

    /// Compute this cycle's weights over the active strategy set
    ///
    /// Returns an empty map when no strategy is active; downstream
    /// consensus is skipped in that case. Strategies disabled mid-run
    /// simply drop out of `active` and the remainder renormalizes.
    pub fn compute(
        &mut self,
        active: &[StrategyId],
        tracker: &PerformanceTracker,
        correlation: &CorrelationMatrix,
    ) -> AllocationWeights {
        if active.is_empty() {
            self.prev.clear();
            return HashMap::new();
        }

        // Penalties use the previous cycle's allocation
        let mut raw: AllocationWeights = HashMap::with_capacity(active.len());
        for id in active {
            let penalty = correlation.penalty(id, &self.prev);
            let score = tracker.sharpe(id) * (1.0 - penalty);
            raw.insert(id.clone(), score.max(self.score_epsilon));
        }
        normalize(&mut raw);

        // Exponential smoothing against last cycle, clamped so no
        // weight swings more than max_delta per cycle
        let mut smoothed: AllocationWeights = HashMap::with_capacity(active.len());
        for id in active {
            let target = raw[id];
            let prev = self.prev.get(id).copied().unwrap_or(target);
            let blended = self.alpha * target + (1.0 - self.alpha) * prev;
            let clamped = blended.clamp(prev - self.max_delta, prev + self.max_delta);
            smoothed.insert(id.clone(), clamped.max(0.0));
        }
        normalize(&mut smoothed);

        self.prev = smoothed.clone();
        smoothed
    }
}

/// Scale weights in place so they sum to 1; uniform fallback when the
/// total is degenerate
fn normalize(weights: &mut AllocationWeights) {
    let total: f64 = weights.values().sum();
    if total > 0.0 {
        for w in weights.values_mut() {
            *w /= total;
        }
    } else if !weights.is_empty() {
        let uniform = 1.0 / weights.len() as f64;
        for w in weights.values_mut() {
            *w = uniform;
        }
    }
}
