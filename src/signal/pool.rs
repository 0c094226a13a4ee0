//! Strategy pool management
//!
//! The engine never sees strategy internals; it polls a pool of
//! `SignalSource` trait objects once per cycle and works with the
//! signals they emit.

use super::{Asset, SignalSource, StrategySignal};
use crate::market::MarketSnapshot;
use std::collections::{HashMap, HashSet};

/// Arena of pluggable strategies polled each cycle
pub struct StrategyPool {
    sources: Vec<Box<dyn SignalSource>>,
    disabled: HashSet<String>,
}

impl StrategyPool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self {
            sources: vec![],
            disabled: HashSet::new(),
        }
    }

    /// Register a strategy
    pub fn register(&mut self, source: Box<dyn SignalSource>) {
        self.sources.push(source);
    }

    /// Disable a strategy mid-run; it stops being polled and drops out
    /// of the active set used for allocation
    pub fn disable(&mut self, strategy_id: &str) {
        self.disabled.insert(strategy_id.to_string());
        tracing::info!(strategy_id, "Strategy disabled");
    }

    /// Re-enable a previously disabled strategy
    pub fn enable(&mut self, strategy_id: &str) {
        if self.disabled.remove(strategy_id) {
            tracing::info!(strategy_id, "Strategy enabled");
        }
    }

    /// IDs of currently active strategies
    pub fn active_ids(&self) -> Vec<String> {
        self.sources
            .iter()
            .map(|s| s.id().to_string())
            .filter(|id| !self.disabled.contains(id))
            .collect()
    }

    /// Number of active strategies
    pub fn active_count(&self) -> usize {
        self.active_ids().len()
    }

    /// Poll all active strategies, grouping signals by asset
    ///
    /// A strategy returning no signal for an asset is abstaining for
    /// that asset this cycle.
    pub fn poll(&mut self, market: &MarketSnapshot) -> HashMap<Asset, Vec<StrategySignal>> {
        let mut by_asset: HashMap<Asset, Vec<StrategySignal>> = HashMap::new();
        for source in self.sources.iter_mut() {
            if self.disabled.contains(source.id()) {
                continue;
            }
            for signal in source.poll(market) {
                by_asset.entry(signal.asset.clone()).or_default().push(signal);
            }
        }
        by_asset
    }
}

impl Default for StrategyPool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Direction;

    struct OneShot {
        id: String,
        asset: String,
    }

    impl SignalSource for OneShot {
        fn id(&self) -> &str {
            &self.id
        }

        fn poll(&mut self, _market: &MarketSnapshot) -> Vec<StrategySignal> {
            vec![StrategySignal::new(
                self.id.clone(),
                self.asset.clone(),
                Direction::Long,
                0.8,
                0.1,
            )]
        }
    }

    fn pool_with(ids: &[&str]) -> StrategyPool {
        let mut pool = StrategyPool::new();
        for id in ids {
            pool.register(Box::new(OneShot {
                id: id.to_string(),
                asset: "BTC".to_string(),
            }));
        }
        pool
    }

    #[test]
    fn test_poll_groups_by_asset() {
        let mut pool = pool_with(&["a", "b"]);
        let market = MarketSnapshot::empty();
        let signals = pool.poll(&market);
        assert_eq!(signals["BTC"].len(), 2);
    }

    #[test]
    fn test_disable_removes_from_active_set() {
        let mut pool = pool_with(&["a", "b"]);
        pool.disable("a");
        assert_eq!(pool.active_ids(), vec!["b".to_string()]);

        let market = MarketSnapshot::empty();
        let signals = pool.poll(&market);
        assert_eq!(signals["BTC"].len(), 1);
        assert_eq!(signals["BTC"][0].strategy_id, "b");
    }

    #[test]
    fn test_enable_restores_strategy() {
        let mut pool = pool_with(&["a"]);
        pool.disable("a");
        assert_eq!(pool.active_count(), 0);
        pool.enable("a");
        assert_eq!(pool.active_count(), 1);
    }
}
