//! Strategy signal types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Strategy identifier
pub type StrategyId = String;

/// Asset identifier
pub type Asset = String;

/// Signal direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Increase long exposure
    Long,
    /// Increase short exposure
    Short,
    /// Hold no position
    Flat,
}

impl Direction {
    /// Numeric sign used in weighted voting and return attribution
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Long => 1.0,
            Direction::Short => -1.0,
            Direction::Flat => 0.0,
        }
    }
}

/// A single strategy's opinion for one asset in one cycle
///
/// Immutable once emitted. A strategy with no opinion this cycle abstains
/// by producing no signal at all, which is distinct from emitting
/// `Direction::Flat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategySignal {
    /// Producing strategy
    pub strategy_id: StrategyId,
    /// Target asset
    pub asset: Asset,
    /// Emission timestamp
    pub timestamp: DateTime<Utc>,
    /// Trade direction
    pub direction: Direction,
    /// Confidence score in [0, 1]
    pub confidence: f64,
    /// Suggested capital fraction in [0, 1]
    pub suggested_size_fraction: f64,
}

impl StrategySignal {
    /// Create a new signal, clamping confidence and size into [0, 1]
    pub fn new(
        strategy_id: impl Into<StrategyId>,
        asset: impl Into<Asset>,
        direction: Direction,
        confidence: f64,
        suggested_size_fraction: f64,
    ) -> Self {
        Self {
            strategy_id: strategy_id.into(),
            asset: asset.into(),
            timestamp: Utc::now(),
            direction,
            confidence: confidence.clamp(0.0, 1.0),
            suggested_size_fraction: suggested_size_fraction.clamp(0.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_sign() {
        assert_eq!(Direction::Long.sign(), 1.0);
        assert_eq!(Direction::Short.sign(), -1.0);
        assert_eq!(Direction::Flat.sign(), 0.0);
    }

    #[test]
    fn test_signal_clamps_bounds() {
        let signal = StrategySignal::new("momo", "BTC", Direction::Long, 1.4, -0.2);
        assert_eq!(signal.confidence, 1.0);
        assert_eq!(signal.suggested_size_fraction, 0.0);
    }

    #[test]
    fn test_signal_serde_round_trip() {
        let signal = StrategySignal::new("momo", "BTC", Direction::Short, 0.7, 0.1);
        let json = serde_json::to_string(&signal).unwrap();
        let back: StrategySignal = serde_json::from_str(&json).unwrap();
        assert_eq!(back.strategy_id, signal.strategy_id);
        assert_eq!(back.direction, Direction::Short);
        assert_eq!(back.confidence, signal.confidence);
    }
}
