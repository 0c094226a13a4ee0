//! Portfolio accounting
//!
//! Cash and signed position tracking; the in-memory side of the
//! durable `PortfolioSnapshot`. Mutated only between a cycle's read
//! phase and its snapshot write.

use crate::execution::{ExecutionResult, ExecutionStatus};
use crate::market::MarketSnapshot;
use crate::signal::{Asset, Direction};
use crate::state::PortfolioSnapshot;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Cash plus signed positions (units per asset)
pub struct Portfolio {
    cash: Decimal,
    positions: HashMap<Asset, Decimal>,
}

impl Portfolio {
    /// Start a portfolio from initial cash
    pub fn new(initial_cash: Decimal) -> Self {
        Self {
            cash: initial_cash,
            positions: HashMap::new(),
        }
    }

    /// Rebuild from a recovered snapshot
    pub fn from_snapshot(snapshot: &PortfolioSnapshot) -> Self {
        Self {
            cash: snapshot.cash,
            positions: snapshot.positions.clone(),
        }
    }

    /// Current cash balance
    pub fn cash(&self) -> Decimal {
        self.cash
    }

    /// Signed position in units for an asset
    pub fn position(&self, asset: &str) -> Decimal {
        self.positions.get(asset).copied().unwrap_or(Decimal::ZERO)
    }

    /// Cash plus positions marked at current mid prices
    ///
    /// Assets without a quote this cycle are carried at zero mark, so a
    /// missing feed cannot inflate equity.
    pub fn equity(&self, market: &MarketSnapshot) -> Decimal {
        let marked: Decimal = self
            .positions
            .iter()
            .map(|(asset, units)| {
                market
                    .price(asset)
                    .map(|price| *units * price)
                    .unwrap_or(Decimal::ZERO)
            })
            .sum();
        self.cash + marked
    }

    /// Apply an execution result
    ///
    /// Filled notional converts to signed units at the fill price;
    /// rejected orders and zero fills leave state untouched.
    pub fn apply_execution(&mut self, result: &ExecutionResult) {
        if result.status == ExecutionStatus::Rejected
            || result.filled_size.is_zero()
            || result.fill_price.is_zero()
        {
            return;
        }

        let units = result.filled_size / result.fill_price;
        let signed_units = match result.direction {
            Direction::Long => units,
            Direction::Short => -units,
            Direction::Flat => return,
        };

        self.cash -= signed_units * result.fill_price;
        let entry = self
            .positions
            .entry(result.asset.clone())
            .or_insert(Decimal::ZERO);
        *entry += signed_units;
        if entry.is_zero() {
            self.positions.remove(&result.asset);
        }
    }

    /// Close the whole position in an asset at the given price,
    /// forced by a liquidation cascade
    pub fn flatten(&mut self, asset: &str, price: Decimal) {
        if let Some(units) = self.positions.remove(asset) {
            self.cash += units * price;
            tracing::warn!(asset, units = %units, price = %price, "Position flattened");
        }
    }

    /// Snapshot current state for the durable store
    pub fn snapshot(
        &self,
        cycle: u64,
        equity: Decimal,
        timestamp: DateTime<Utc>,
    ) -> PortfolioSnapshot {
        PortfolioSnapshot {
            cycle,
            timestamp,
            cash: self.cash,
            equity,
            positions: self.positions.clone(),
        }
    }
}
