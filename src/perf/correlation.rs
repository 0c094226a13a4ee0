//! Rolling pairwise correlation across strategy return windows

use super::PerformanceTracker;
use crate::signal::StrategyId;
use std::collections::HashMap;

/// Symmetric Pearson correlation matrix over the active strategy set
///
/// Recomputed every cycle from the current return windows and used only
/// as a penalty input; never persisted.
pub struct CorrelationMatrix {
    ids: Vec<StrategyId>,
    index: HashMap<StrategyId, usize>,
    values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Compute the matrix over the given strategies
    ///
    /// Pairs with fewer than `min_overlap` overlapping samples get a
    /// neutral 0.0 rather than being excluded, so the matrix stays
    /// well-formed through cold starts.
    pub fn compute(
        tracker: &PerformanceTracker,
        ids: &[StrategyId],
        min_overlap: usize,
    ) -> Self {
        let n = ids.len();
        let mut values = vec![vec![0.0; n]; n];

        for i in 0..n {
            values[i][i] = 1.0;
            for j in (i + 1)..n {
                let corr = pairwise(tracker, &ids[i], &ids[j], min_overlap);
                values[i][j] = corr;
                values[j][i] = corr;
            }
        }

        let index = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();

        Self {
            ids: ids.to_vec(),
            index,
            values,
        }
    }

    /// Correlation between two strategies; 1.0 on the diagonal, 0.0 for
    /// unknown strategies
    pub fn get(&self, a: &str, b: &str) -> f64 {
        match (self.index.get(a), self.index.get(b)) {
            (Some(&i), Some(&j)) => self.values[i][j],
            _ => 0.0,
        }
    }

    /// Allocation-weighted average absolute correlation of one strategy
    /// against the rest of the pool
    ///
    /// Discourages concentrating weight in redundant strategies. Falls
    /// back to an unweighted average when the rest of the pool carries
    /// no weight yet (first cycle).
    pub fn penalty(&self, strategy_id: &str, weights: &HashMap<StrategyId, f64>) -> f64 {
        let Some(&i) = self.index.get(strategy_id) else {
            return 0.0;
        };
        if self.ids.len() < 2 {
            return 0.0;
        }

        let mut weighted_sum = 0.0;
        let mut weight_total = 0.0;
        let mut plain_sum = 0.0;

        for (j, other) in self.ids.iter().enumerate() {
            if j == i {
                continue;
            }
            let abs_corr = self.values[i][j].abs();
            let w = weights.get(other).copied().unwrap_or(0.0);
            weighted_sum += w * abs_corr;
            weight_total += w;
            plain_sum += abs_corr;
        }

        if weight_total > 0.0 {
            weighted_sum / weight_total
        } else {
            plain_sum / (self.ids.len() - 1) as f64
        }
    }
}

/// Pearson correlation over the overlapping tail of two return windows
fn pairwise(tracker: &PerformanceTracker, a: &str, b: &str, min_overlap: usize) -> f64 {
    let (Some(wa), Some(wb)) = (tracker.returns(a), tracker.returns(b)) else {
        return 0.0;
    };

    let overlap = wa.len().min(wb.len());
    if overlap < min_overlap {
        return 0.0;
    }

    // Align the most recent `overlap` samples of each window
    let xs: Vec<f64> = wa.iter().skip(wa.len() - overlap).copied().collect();
    let ys: Vec<f64> = wb.iter().skip(wb.len() - overlap).copied().collect();

    let n = overlap as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for k in 0..overlap {
        let dx = xs[k] - mean_x;
        let dy = ys[k] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return 0.0;
    }

    cov / (var_x.sqrt() * var_y.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<StrategyId> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn fill(tracker: &mut PerformanceTracker, id: &str, rets: &[f64]) {
        for r in rets {
            tracker.record_return(id, *r);
        }
    }

    #[test]
    fn test_diagonal_is_one() {
        let mut t = PerformanceTracker::new(10, 3, 1.0);
        fill(&mut t, "a", &[0.01, -0.02, 0.03, 0.01]);
        let matrix = CorrelationMatrix::compute(&t, &ids(&["a"]), 3);
        assert_eq!(matrix.get("a", "a"), 1.0);
    }

    #[test]
    fn test_identical_series_fully_correlated() {
        let mut t = PerformanceTracker::new(10, 3, 1.0);
        let rets = [0.01, -0.02, 0.03, 0.01, -0.01];
        fill(&mut t, "a", &rets);
        fill(&mut t, "b", &rets);
        let matrix = CorrelationMatrix::compute(&t, &ids(&["a", "b"]), 3);
        assert!((matrix.get("a", "b") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_inverted_series_fully_anticorrelated() {
        let mut t = PerformanceTracker::new(10, 3, 1.0);
        fill(&mut t, "a", &[0.01, -0.02, 0.03, 0.01]);
        fill(&mut t, "b", &[-0.01, 0.02, -0.03, -0.01]);
        let matrix = CorrelationMatrix::compute(&t, &ids(&["a", "b"]), 3);
        assert!((matrix.get("a", "b") + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_insufficient_overlap_is_neutral() {
        let mut t = PerformanceTracker::new(10, 3, 1.0);
        fill(&mut t, "a", &[0.01, -0.02, 0.03, 0.01]);
        fill(&mut t, "b", &[0.01]);
        let matrix = CorrelationMatrix::compute(&t, &ids(&["a", "b"]), 3);
        assert_eq!(matrix.get("a", "b"), 0.0);
    }

    #[test]
    fn test_penalty_weights_redundancy() {
        let mut t = PerformanceTracker::new(10, 3, 1.0);
        let rets = [0.01, -0.02, 0.03, 0.01, -0.01];
        fill(&mut t, "a", &rets);
        fill(&mut t, "b", &rets);
        fill(&mut t, "c", &[0.02, 0.01, -0.01, 0.02, 0.03]);

        let matrix = CorrelationMatrix::compute(&t, &ids(&["a", "b", "c"]), 3);
        let mut weights = HashMap::new();
        weights.insert("b".to_string(), 0.9);
        weights.insert("c".to_string(), 0.1);

        // a is a clone of heavily-weighted b, so its penalty should be
        // close to 1
        let penalty = matrix.penalty("a", &weights);
        assert!(penalty > 0.8, "penalty was {penalty}");
    }

    #[test]
    fn test_penalty_without_weights_falls_back_to_mean() {
        let mut t = PerformanceTracker::new(10, 3, 1.0);
        let rets = [0.01, -0.02, 0.03, 0.01, -0.01];
        fill(&mut t, "a", &rets);
        fill(&mut t, "b", &rets);
        let matrix = CorrelationMatrix::compute(&t, &ids(&["a", "b"]), 3);
        let penalty = matrix.penalty("a", &HashMap::new());
        assert!((penalty - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_strategy_has_no_penalty() {
        let mut t = PerformanceTracker::new(10, 3, 1.0);
        fill(&mut t, "a", &[0.01, -0.02, 0.03]);
        let matrix = CorrelationMatrix::compute(&t, &ids(&["a"]), 3);
        assert_eq!(matrix.penalty("a", &HashMap::new()), 0.0);
    }
}
