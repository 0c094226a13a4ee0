//! Market snapshot types
//!
//! Current price and modeled book depth per asset, consumed by the
//! execution simulator's friction models. Where the snapshot comes from
//! is abstracted behind `MarketDataSource`.

mod synthetic;

pub use synthetic::RandomWalkMarket;

use crate::signal::Asset;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Price and modeled liquidity for one asset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetDepth {
    /// Mid price
    pub mid_price: Decimal,
    /// Full bid-ask spread as a fraction of mid
    pub spread_pct: Decimal,
    /// Modeled one-sided book depth in notional terms
    pub depth: Decimal,
}

/// Point-in-time view of all tradeable assets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Snapshot timestamp
    pub timestamp: DateTime<Utc>,
    /// Per-asset price/depth
    pub assets: HashMap<Asset, AssetDepth>,
}

impl MarketSnapshot {
    /// Create an empty snapshot stamped now
    pub fn empty() -> Self {
        Self {
            timestamp: Utc::now(),
            assets: HashMap::new(),
        }
    }

    /// Depth entry for an asset, if quoted this cycle
    pub fn depth(&self, asset: &str) -> Option<&AssetDepth> {
        self.assets.get(asset)
    }

    /// Mid price for an asset, if quoted this cycle
    pub fn price(&self, asset: &str) -> Option<Decimal> {
        self.assets.get(asset).map(|d| d.mid_price)
    }
}

/// Trait for market snapshot providers
pub trait MarketDataSource: Send + Sync {
    /// Produce the current market snapshot
    fn snapshot(&mut self) -> MarketSnapshot;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_snapshot_lookup() {
        let mut snapshot = MarketSnapshot::empty();
        snapshot.assets.insert(
            "BTC".to_string(),
            AssetDepth {
                mid_price: dec!(50000),
                spread_pct: dec!(0.001),
                depth: dec!(100000),
            },
        );

        assert_eq!(snapshot.price("BTC"), Some(dec!(50000)));
        assert!(snapshot.price("ETH").is_none());
        assert_eq!(snapshot.depth("BTC").unwrap().depth, dec!(100000));
    }
}
