//! Execution types

use crate::signal::{Asset, Direction};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order identifier
pub type OrderId = Uuid;

/// A breaker-gated order handed to the simulator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Target asset
    pub asset: Asset,
    /// Trade direction
    pub direction: Direction,
    /// Requested notional size
    pub notional: Decimal,
}

/// Terminal order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    /// Fully filled
    Filled,
    /// Filled for less than requested
    Partial,
    /// No liquidity; nothing filled
    Rejected,
    /// Order would trigger cascading liquidations; position flattened
    Liquidated,
}

/// Outcome of one simulated order, immutable once created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Order identifier
    pub order_id: OrderId,
    /// Target asset
    pub asset: Asset,
    /// Trade direction
    pub direction: Direction,
    /// Requested notional
    pub requested_size: Decimal,
    /// Filled notional
    pub filled_size: Decimal,
    /// Realized fill price after friction
    pub fill_price: Decimal,
    /// Total friction as a fraction of mid
    pub slippage_pct: Decimal,
    /// Whether the fill was partial
    pub partial: bool,
    /// Terminal status
    pub status: ExecutionStatus,
    /// Execution timestamp
    pub timestamp: DateTime<Utc>,
}

impl ExecutionResult {
    /// Fill ratio in [0, 1]
    pub fn fill_ratio(&self) -> f64 {
        if self.requested_size.is_zero() {
            return 0.0;
        }
        f64::try_from(self.filled_size / self.requested_size).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fill_ratio() {
        let result = ExecutionResult {
            order_id: Uuid::new_v4(),
            asset: "BTC".to_string(),
            direction: Direction::Long,
            requested_size: dec!(100),
            filled_size: dec!(25),
            fill_price: dec!(50000),
            slippage_pct: dec!(0.001),
            partial: true,
            status: ExecutionStatus::Partial,
            timestamp: Utc::now(),
        };
        assert!((result.fill_ratio() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_result_serde_round_trip() {
        let result = ExecutionResult {
            order_id: Uuid::new_v4(),
            asset: "ETH".to_string(),
            direction: Direction::Short,
            requested_size: dec!(200),
            filled_size: dec!(200),
            fill_price: dec!(3000.25),
            slippage_pct: dec!(0.0015),
            partial: false,
            status: ExecutionStatus::Filled,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&result).unwrap();
        let back: ExecutionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
