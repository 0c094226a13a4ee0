//! Drawdown-driven circuit breaker
//!
//! Staged safety state machine. The level only ratchets upward within a
//! drawdown episode and resets to normal solely through the hysteresis
//! recovery path, so it cannot flap at a threshold boundary. This is
//! the one authority that can veto or scale every downstream size.

use super::{BreakerLevel, BreakerReason, BreakerTransition, CircuitBreakerState};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Drawdown thresholds (positive fractions of peak equity)
#[derive(Debug, Clone)]
pub struct BreakerThresholds {
    /// Level 1 at this drawdown
    pub caution_pct: Decimal,
    /// Level 2 (sizes halved)
    pub reduce_pct: Decimal,
    /// Level 3 (new orders blocked)
    pub halt_pct: Decimal,
    /// Reset to level 0 once drawdown recovers below this
    pub recovery_pct: Decimal,
}

impl Default for BreakerThresholds {
    fn default() -> Self {
        Self {
            caution_pct: dec!(0.05),
            reduce_pct: dec!(0.10),
            halt_pct: dec!(0.15),
            recovery_pct: dec!(0.02),
        }
    }
}

/// Circuit breaker state machine, evaluated once per cycle
pub struct CircuitBreaker {
    thresholds: BreakerThresholds,
    peak_equity: Decimal,
    state: CircuitBreakerState,
}

impl CircuitBreaker {
    /// Create a breaker at level 0 with the given starting equity
    pub fn new(thresholds: BreakerThresholds, initial_equity: Decimal) -> Self {
        Self {
            thresholds,
            peak_equity: initial_equity,
            state: CircuitBreakerState {
                level: BreakerLevel::Normal,
                current_drawdown_pct: Decimal::ZERO,
                triggered_at: None,
                reason: None,
            },
        }
    }

    /// Current state (read-only to other components)
    pub fn state(&self) -> &CircuitBreakerState {
        &self.state
    }

    /// Current level
    pub fn level(&self) -> BreakerLevel {
        self.state.level
    }

    /// Size multiplier for the current level
    pub fn size_multiplier(&self) -> Decimal {
        self.state.level.size_multiplier()
    }

    /// Peak equity seen so far
    pub fn peak_equity(&self) -> Decimal {
        self.peak_equity
    }

    /// Re-evaluate against current equity; returns the transition if
    /// the level changed
    pub fn evaluate(
        &mut self,
        equity: Decimal,
        now: DateTime<Utc>,
    ) -> Option<BreakerTransition> {
        if equity > self.peak_equity {
            self.peak_equity = equity;
        }

        let drawdown = if self.peak_equity > Decimal::ZERO {
            (self.peak_equity - equity) / self.peak_equity
        } else {
            Decimal::ZERO
        };
        self.state.current_drawdown_pct = drawdown;

        let breached = if drawdown >= self.thresholds.halt_pct {
            BreakerLevel::Halt
        } else if drawdown >= self.thresholds.reduce_pct {
            BreakerLevel::Reduce
        } else if drawdown >= self.thresholds.caution_pct {
            BreakerLevel::Caution
        } else {
            BreakerLevel::Normal
        };

        let from = self.state.level;

        // Escalation: level is monotone non-decreasing within an episode
        if breached > from {
            let reason = BreakerReason::DrawdownBreach {
                drawdown_pct: drawdown,
            };
            self.state.level = breached;
            self.state.reason = Some(reason.clone());
            if self.state.triggered_at.is_none() {
                self.state.triggered_at = Some(now);
            }
            let transition = BreakerTransition {
                from,
                to: breached,
                drawdown_pct: drawdown,
                reason,
                at: now,
            };
            tracing::warn!(
                from = from.as_u8(),
                to = breached.as_u8(),
                drawdown_pct = %drawdown,
                "Circuit breaker escalated"
            );
            return Some(transition);
        }

        // Recovery: only back to normal, only through hysteresis
        if from > BreakerLevel::Normal && drawdown < self.thresholds.recovery_pct {
            self.state.level = BreakerLevel::Normal;
            self.state.triggered_at = None;
            self.state.reason = Some(BreakerReason::Recovery);
            let transition = BreakerTransition {
                from,
                to: BreakerLevel::Normal,
                drawdown_pct: drawdown,
                reason: BreakerReason::Recovery,
                at: now,
            };
            tracing::info!(
                from = from.as_u8(),
                drawdown_pct = %drawdown,
                "Circuit breaker recovered"
            );
            return Some(transition);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breaker() -> CircuitBreaker {
        CircuitBreaker::new(BreakerThresholds::default(), dec!(1000))
    }

    #[test]
    fn test_starts_normal() {
        let b = breaker();
        assert_eq!(b.level(), BreakerLevel::Normal);
        assert_eq!(b.size_multiplier(), dec!(1));
    }

    #[test]
    fn test_escalates_through_levels() {
        let mut b = breaker();
        let now = Utc::now();

        let t = b.evaluate(dec!(940), now).unwrap();
        assert_eq!(t.from, BreakerLevel::Normal);
        assert_eq!(t.to, BreakerLevel::Caution);

        let t = b.evaluate(dec!(895), now).unwrap();
        assert_eq!(t.to, BreakerLevel::Reduce);
        assert_eq!(b.size_multiplier(), dec!(0.5));

        let t = b.evaluate(dec!(840), now).unwrap();
        assert_eq!(t.to, BreakerLevel::Halt);
        assert_eq!(b.size_multiplier(), dec!(0));
    }

    #[test]
    fn test_can_jump_levels_on_sharp_drop() {
        let mut b = breaker();
        let t = b.evaluate(dec!(800), Utc::now()).unwrap();
        assert_eq!(t.from, BreakerLevel::Normal);
        assert_eq!(t.to, BreakerLevel::Halt);
    }

    #[test]
    fn test_no_downgrade_without_recovery() {
        let mut b = breaker();
        let now = Utc::now();
        b.evaluate(dec!(880), now); // Reduce at 12%

        // Partial recovery to 6% drawdown: stays at Reduce, no event
        assert!(b.evaluate(dec!(940), now).is_none());
        assert_eq!(b.level(), BreakerLevel::Reduce);
    }

    #[test]
    fn test_recovery_through_hysteresis_only() {
        let mut b = breaker();
        let now = Utc::now();
        b.evaluate(dec!(880), now);

        // 3% drawdown: still above the 2% recovery threshold
        assert!(b.evaluate(dec!(970), now).is_none());
        assert_eq!(b.level(), BreakerLevel::Reduce);

        // 1% drawdown: recovers straight to normal
        let t = b.evaluate(dec!(990), now).unwrap();
        assert_eq!(t.to, BreakerLevel::Normal);
        assert_eq!(t.reason, BreakerReason::Recovery);
        assert!(b.state().triggered_at.is_none());
    }

    #[test]
    fn test_triggered_at_set_once_per_episode() {
        let mut b = breaker();
        let now = Utc::now();
        b.evaluate(dec!(940), now);
        let first = b.state().triggered_at;
        assert!(first.is_some());

        b.evaluate(dec!(880), now + chrono::Duration::seconds(60));
        assert_eq!(b.state().triggered_at, first);
    }

    #[test]
    fn test_peak_tracks_new_highs() {
        let mut b = breaker();
        let now = Utc::now();
        b.evaluate(dec!(1200), now);
        assert_eq!(b.peak_equity(), dec!(1200));

        // 10% drawdown is now measured from 1200
        let t = b.evaluate(dec!(1080), now).unwrap();
        assert_eq!(t.to, BreakerLevel::Reduce);
    }

    #[test]
    fn test_exact_threshold_breaches() {
        let mut b = breaker();
        // Exactly -5% triggers caution (inclusive breach)
        let t = b.evaluate(dec!(950), Utc::now()).unwrap();
        assert_eq!(t.to, BreakerLevel::Caution);
    }
}
