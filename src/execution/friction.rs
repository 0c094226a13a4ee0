//! Market friction models
//!
//! Independent cost components composed by the simulator: spread
//! crossing, size-driven market impact, and a time-of-day liquidity
//! multiplier.

use chrono::{DateTime, Timelike, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Half-spread crossing cost for an aggressive order
pub fn spread_cost(spread_pct: Decimal) -> Decimal {
    spread_pct / dec!(2)
}

/// Market impact proportional to order size relative to book depth
#[derive(Debug, Clone)]
pub struct ImpactModel {
    /// Impact in price fraction per unit of size/depth ratio
    pub coefficient: Decimal,
}

impl ImpactModel {
    pub fn new(coefficient: Decimal) -> Self {
        Self { coefficient }
    }

    /// Impact cost as a fraction of mid
    pub fn cost(&self, notional: Decimal, depth: Decimal) -> Decimal {
        if depth <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        self.coefficient * (notional / depth)
    }
}

impl Default for ImpactModel {
    fn default() -> Self {
        Self::new(dec!(0.10))
    }
}

/// Time-of-day volatility/liquidity multiplier on total friction
///
/// Overnight hours are thinnest, the open/close shoulders somewhat
/// thin, midday normal. Hours are UTC.
#[derive(Debug, Clone)]
pub struct TimeOfDayModel {
    /// Multiplier during overnight hours (00-05, 21-23 UTC)
    pub overnight_multiplier: Decimal,
    /// Multiplier during shoulder hours (06-08, 17-20 UTC)
    pub shoulder_multiplier: Decimal,
}

impl TimeOfDayModel {
    pub fn new(overnight_multiplier: Decimal, shoulder_multiplier: Decimal) -> Self {
        Self {
            overnight_multiplier,
            shoulder_multiplier,
        }
    }

    /// Friction multiplier for the given timestamp
    pub fn multiplier(&self, at: DateTime<Utc>) -> Decimal {
        match at.hour() {
            0..=5 | 21..=23 => self.overnight_multiplier,
            6..=8 | 17..=20 => self.shoulder_multiplier,
            _ => Decimal::ONE,
        }
    }
}

impl Default for TimeOfDayModel {
    fn default() -> Self {
        Self::new(dec!(1.5), dec!(1.2))
    }
}
