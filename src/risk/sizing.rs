//! Consensus position sizing
//!
//! Fractional Kelly from aggregate confidence, clamped to absolute
//! position limits, shrunk by the correlation penalty, then scaled by
//! the circuit breaker's gate.

use super::{BreakerLevel, KellyCalculator, PositionSize, SizingOutcome};
use crate::ensemble::ConsensusDecision;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Converts consensus decisions into breaker-gated capital fractions
pub struct PositionSizer {
    kelly: KellyCalculator,
    /// Clamp floor as a fraction of equity
    pub min_position_pct: Decimal,
    /// Clamp ceiling as a fraction of equity
    pub max_position_pct: Decimal,
}

impl PositionSizer {
    /// Create a sizer with the given Kelly fraction and clamp bounds
    pub fn new(kelly_fraction: f64, min_position_pct: Decimal, max_position_pct: Decimal) -> Self {
        Self {
            kelly: KellyCalculator::new(kelly_fraction),
            min_position_pct,
            max_position_pct,
        }
    }

    /// Size one consensus decision
    ///
    /// `correlation_penalty` is the allocation-weighted penalty of the
    /// agreeing strategies; highly correlated consensus bets come out
    /// structurally smaller.
    pub fn size(
        &self,
        decision: &ConsensusDecision,
        correlation_penalty: f64,
        equity: Decimal,
        breaker_level: BreakerLevel,
    ) -> SizingOutcome {
        if breaker_level == BreakerLevel::Halt {
            return SizingOutcome::Halted {
                asset: decision.asset.clone(),
                level: breaker_level,
            };
        }

        let Some(raw_fraction) = self.kelly.size_fraction(decision.aggregate_confidence) else {
            return SizingOutcome::BelowBreakEven {
                asset: decision.asset.clone(),
                confidence: decision.aggregate_confidence,
            };
        };

        let fraction = Decimal::try_from(raw_fraction)
            .unwrap_or(Decimal::ZERO)
            .clamp(self.min_position_pct, self.max_position_pct);

        let penalty_scale = Decimal::try_from((1.0 - correlation_penalty).clamp(0.0, 1.0))
            .unwrap_or(Decimal::ONE);

        let gated = fraction * penalty_scale * breaker_level.size_multiplier();

        SizingOutcome::Sized(PositionSize {
            asset: decision.asset.clone(),
            direction: decision.direction,
            fraction: gated,
            notional: gated * equity,
        })
    }
}

impl Default for PositionSizer {
    fn default() -> Self {
        Self::new(0.25, dec!(0.01), dec!(0.15))
    }
}
