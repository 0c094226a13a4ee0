//! Liquidation cascade detection
//!
//! Flags orders so large relative to modeled depth that absorbing them
//! would trigger cascading liquidations. Such orders are never filled;
//! the position is flattened instead.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Detects cascade-triggering order sizes
#[derive(Debug, Clone)]
pub struct CascadeDetector {
    /// Order/depth ratio at which a cascade fires
    pub trigger_ratio: Decimal,
    /// Extra price penalty applied to the forced flattening
    pub penalty_pct: Decimal,
}

impl CascadeDetector {
    pub fn new(trigger_ratio: Decimal, penalty_pct: Decimal) -> Self {
        Self {
            trigger_ratio,
            penalty_pct,
        }
    }

    /// Whether an order of this notional against this depth cascades
    pub fn triggers(&self, notional: Decimal, depth: Decimal) -> bool {
        if depth <= Decimal::ZERO {
            // No book at all: treat any order as cascade-unsafe
            return notional > Decimal::ZERO;
        }
        notional / depth >= self.trigger_ratio
    }
}

impl Default for CascadeDetector {
    fn default() -> Self {
        Self::new(dec!(0.5), dec!(0.05))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_orders_do_not_cascade() {
        let detector = CascadeDetector::default();
        assert!(!detector.triggers(dec!(1000), dec!(100000)));
    }

    #[test]
    fn test_trigger_at_ratio_boundary() {
        let detector = CascadeDetector::new(dec!(0.5), dec!(0.05));
        assert!(detector.triggers(dec!(50000), dec!(100000)));
        assert!(!detector.triggers(dec!(49999), dec!(100000)));
    }

    #[test]
    fn test_empty_book_cascades() {
        let detector = CascadeDetector::default();
        assert!(detector.triggers(dec!(1), dec!(0)));
    }
}
