//! Seeded random-walk market data
//!
//! Stand-in market source for paper runs and tests; real deployments
//! plug their own `MarketDataSource` in at the crate boundary.

use super::{AssetDepth, MarketDataSource, MarketSnapshot};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Random-walk price process with static spread/depth per asset
pub struct RandomWalkMarket {
    rng: StdRng,
    step_pct: f64,
    assets: HashMap<String, AssetDepth>,
}

impl RandomWalkMarket {
    /// Create a market with the given seed and per-step move size
    pub fn new(seed: u64, step_pct: f64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            step_pct,
            assets: HashMap::new(),
        }
    }

    /// Add an asset with its starting quote
    pub fn with_asset(
        mut self,
        asset: impl Into<String>,
        mid_price: Decimal,
        spread_pct: Decimal,
        depth: Decimal,
    ) -> Self {
        self.assets.insert(
            asset.into(),
            AssetDepth {
                mid_price,
                spread_pct,
                depth,
            },
        );
        self
    }
}

impl MarketDataSource for RandomWalkMarket {
    fn snapshot(&mut self) -> MarketSnapshot {
        for quote in self.assets.values_mut() {
            let step: f64 = self.rng.gen_range(-self.step_pct..=self.step_pct);
            let multiplier = Decimal::try_from(1.0 + step).unwrap_or(Decimal::ONE);
            quote.mid_price *= multiplier;
        }
        MarketSnapshot {
            timestamp: Utc::now(),
            assets: self.assets.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_same_seed_same_walk() {
        let mut a = RandomWalkMarket::new(7, 0.01).with_asset(
            "BTC",
            dec!(50000),
            dec!(0.001),
            dec!(100000),
        );
        let mut b = RandomWalkMarket::new(7, 0.01).with_asset(
            "BTC",
            dec!(50000),
            dec!(0.001),
            dec!(100000),
        );

        for _ in 0..10 {
            let pa = a.snapshot().price("BTC").unwrap();
            let pb = b.snapshot().price("BTC").unwrap();
            assert_eq!(pa, pb);
        }
    }

    #[test]
    fn test_prices_stay_positive() {
        let mut market = RandomWalkMarket::new(1, 0.02).with_asset(
            "ETH",
            dec!(3000),
            dec!(0.002),
            dec!(50000),
        );
        for _ in 0..100 {
            let price = market.snapshot().price("ETH").unwrap();
            assert!(price > dec!(0));
        }
    }
}
