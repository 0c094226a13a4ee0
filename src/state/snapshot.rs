//! Durable portfolio snapshot

use crate::signal::Asset;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Complete portfolio state at the end of one cycle
///
/// The only entity that outlives a process restart. Written atomically
/// once per cycle; superseded snapshots are retained as read-only
/// history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    /// Cycle that produced this snapshot
    pub cycle: u64,
    /// Snapshot timestamp
    pub timestamp: DateTime<Utc>,
    /// Cash balance
    pub cash: Decimal,
    /// Marked equity at write time
    pub equity: Decimal,
    /// Signed positions in units per asset
    pub positions: HashMap<Asset, Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_snapshot_serde_round_trip() {
        let mut positions = HashMap::new();
        positions.insert("BTC".to_string(), dec!(0.5));
        positions.insert("ETH".to_string(), dec!(-3.2));

        let snapshot = PortfolioSnapshot {
            cycle: 42,
            timestamp: Utc::now(),
            cash: dec!(9876.54),
            equity: dec!(10321.99),
            positions,
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: PortfolioSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
