//! Fractional Kelly sizing from consensus confidence

/// Kelly calculator for symmetric-payout consensus bets
///
/// With even odds, the Kelly-optimal fraction is
/// `p − q = 2·confidence − 1`. The conservative multiplier (e.g. 0.25
/// for quarter Kelly) scales that down to cut variance.
#[derive(Debug, Clone)]
pub struct KellyCalculator {
    /// Conservative multiplier on the Kelly-optimal fraction
    pub fraction: f64,
}

impl KellyCalculator {
    /// Create a calculator with the given Kelly fraction
    pub fn new(fraction: f64) -> Self {
        Self { fraction }
    }

    /// Raw capital fraction for a given aggregate confidence
    ///
    /// Returns `None` at or below the break-even point (confidence 0.5),
    /// the explicit no-trade fail-safe.
    pub fn size_fraction(&self, confidence: f64) -> Option<f64> {
        let edge = 2.0 * confidence - 1.0;
        if edge <= 0.0 {
            return None;
        }
        Some(self.fraction * edge)
    }
}

impl Default for KellyCalculator {
    fn default() -> Self {
        Self::new(0.25)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kelly_at_break_even_is_none() {
        let calc = KellyCalculator::default();
        assert!(calc.size_fraction(0.5).is_none());
        assert!(calc.size_fraction(0.3).is_none());
    }

    #[test]
    fn test_quarter_kelly() {
        let calc = KellyCalculator::new(0.25);
        // confidence 0.8: edge 0.6, quarter Kelly 0.15
        let fraction = calc.size_fraction(0.8).unwrap();
        assert!((fraction - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_full_confidence() {
        let calc = KellyCalculator::new(0.25);
        let fraction = calc.size_fraction(1.0).unwrap();
        assert!((fraction - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_size_grows_with_confidence() {
        let calc = KellyCalculator::default();
        let low = calc.size_fraction(0.6).unwrap();
        let high = calc.size_fraction(0.9).unwrap();
        assert!(high > low);
    }
}
