//! Per-strategy rolling return tracking
//!
//! Fixed-capacity windows of realized returns feed the Sharpe estimates
//! that drive allocation.

use crate::signal::StrategyId;
use std::collections::{HashMap, VecDeque};

/// Tracks trailing realized returns per strategy
pub struct PerformanceTracker {
    capacity: usize,
    min_samples: usize,
    annualization: f64,
    windows: HashMap<StrategyId, VecDeque<f64>>,
}

impl PerformanceTracker {
    /// Create a tracker with the given window capacity and minimum
    /// sample count for a meaningful Sharpe estimate
    pub fn new(capacity: usize, min_samples: usize, annualization: f64) -> Self {
        Self {
            capacity,
            min_samples,
            annualization,
            windows: HashMap::new(),
        }
    }

    /// Append a realized return for a strategy, evicting the oldest
    /// sample once the window is full
    pub fn record_return(&mut self, strategy_id: &str, ret: f64) {
        let window = self
            .windows
            .entry(strategy_id.to_string())
            .or_insert_with(|| VecDeque::with_capacity(self.capacity));
        if window.len() == self.capacity {
            window.pop_front();
        }
        window.push_back(ret);
    }

    /// Return window for a strategy, if any samples exist
    pub fn returns(&self, strategy_id: &str) -> Option<&VecDeque<f64>> {
        self.windows.get(strategy_id)
    }

    /// Number of samples recorded for a strategy
    pub fn sample_count(&self, strategy_id: &str) -> usize {
        self.windows.get(strategy_id).map_or(0, |w| w.len())
    }

    /// Annualized Sharpe estimate over the window
    ///
    /// Returns a neutral 0.0 on cold start (fewer than `min_samples`
    /// observations) or when the window has zero variance, so early
    /// estimates never divide by zero or dominate allocation.
    pub fn sharpe(&self, strategy_id: &str) -> f64 {
        let Some(window) = self.windows.get(strategy_id) else {
            return 0.0;
        };
        if window.len() < self.min_samples {
            return 0.0;
        }

        let n = window.len() as f64;
        let mean = window.iter().sum::<f64>() / n;
        let variance = window.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();

        if std_dev == 0.0 {
            return 0.0;
        }

        (mean / std_dev) * self.annualization.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> PerformanceTracker {
        PerformanceTracker::new(5, 3, 1.0)
    }

    #[test]
    fn test_cold_start_returns_neutral() {
        let mut t = tracker();
        assert_eq!(t.sample_count("a"), 0);
        assert_eq!(t.sharpe("a"), 0.0);

        t.record_return("a", 0.01);
        t.record_return("a", 0.02);
        // Still below min_samples
        assert_eq!(t.sample_count("a"), 2);
        assert_eq!(t.sharpe("a"), 0.0);
    }

    #[test]
    fn test_zero_variance_returns_neutral() {
        let mut t = tracker();
        for _ in 0..5 {
            t.record_return("a", 0.01);
        }
        assert_eq!(t.sharpe("a"), 0.0);
    }

    #[test]
    fn test_positive_returns_positive_sharpe() {
        let mut t = tracker();
        for ret in [0.01, 0.02, 0.015, 0.01, 0.02] {
            t.record_return("a", ret);
        }
        assert!(t.sharpe("a") > 0.0);
    }

    #[test]
    fn test_window_evicts_oldest() {
        let mut t = tracker();
        for i in 0..8 {
            t.record_return("a", i as f64);
        }
        assert_eq!(t.sample_count("a"), 5);
        let window = t.returns("a").unwrap();
        assert_eq!(window.len(), 5);
        assert_eq!(*window.front().unwrap(), 3.0);
        assert_eq!(*window.back().unwrap(), 7.0);
    }

    #[test]
    fn test_losing_strategy_has_negative_sharpe() {
        let mut t = tracker();
        for ret in [-0.01, -0.02, -0.01, -0.03, -0.02] {
            t.record_return("a", ret);
        }
        assert!(t.sharpe("a") < 0.0);
    }
}
