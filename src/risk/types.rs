//! Risk types

use crate::signal::{Asset, Direction};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Circuit breaker severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakerLevel {
    /// Normal trading
    Normal,
    /// Elevated drawdown; log and watch
    Caution,
    /// Deep drawdown; all sizes halved
    Reduce,
    /// Severe drawdown; all new orders blocked
    Halt,
}

impl BreakerLevel {
    /// Numeric level (0-3)
    pub fn as_u8(&self) -> u8 {
        match self {
            BreakerLevel::Normal => 0,
            BreakerLevel::Caution => 1,
            BreakerLevel::Reduce => 2,
            BreakerLevel::Halt => 3,
        }
    }

    /// Multiplier applied to every computed position size at this level
    pub fn size_multiplier(&self) -> Decimal {
        match self {
            BreakerLevel::Normal | BreakerLevel::Caution => Decimal::ONE,
            BreakerLevel::Reduce => Decimal::new(5, 1),
            BreakerLevel::Halt => Decimal::ZERO,
        }
    }
}

/// Why the breaker moved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BreakerReason {
    /// Drawdown from peak equity crossed a level threshold
    DrawdownBreach {
        /// Drawdown at the time of the breach (positive fraction)
        drawdown_pct: Decimal,
    },
    /// Equity recovered above the hysteresis threshold
    Recovery,
}

/// Current breaker state, owned exclusively by the `CircuitBreaker`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitBreakerState {
    /// Current level
    pub level: BreakerLevel,
    /// Drawdown from peak equity as a positive fraction
    pub current_drawdown_pct: Decimal,
    /// When the current non-normal episode began
    pub triggered_at: Option<DateTime<Utc>>,
    /// Reason for the last transition
    pub reason: Option<BreakerReason>,
}

/// A discrete breaker level change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakerTransition {
    pub from: BreakerLevel,
    pub to: BreakerLevel,
    pub drawdown_pct: Decimal,
    pub reason: BreakerReason,
    pub at: DateTime<Utc>,
}

/// A sized, breaker-gated order intention
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSize {
    pub asset: Asset,
    pub direction: Direction,
    /// Final capital fraction after caps, penalty, and breaker scaling
    pub fraction: Decimal,
    /// Fraction applied to current equity
    pub notional: Decimal,
}

/// Outcome of sizing one consensus decision
///
/// The no-trade paths are expected results, cheap to construct and
/// inspect, never errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SizingOutcome {
    /// Order ready for execution
    Sized(PositionSize),
    /// Confidence at or below the Kelly break-even point; fail-safe
    BelowBreakEven { asset: Asset, confidence: f64 },
    /// Breaker at halt level; new orders blocked
    Halted { asset: Asset, level: BreakerLevel },
}

impl SizingOutcome {
    /// The sized order, if one was produced
    pub fn sized(&self) -> Option<&PositionSize> {
        match self {
            SizingOutcome::Sized(s) => Some(s),
            _ => None,
        }
    }
}
