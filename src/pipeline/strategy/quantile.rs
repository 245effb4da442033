//! Equal-frequency cut points

use super::{sorted_pairs, BinThresholdFinder, StrategyConfig};
use crate::pipeline::error::BinningResult;

/// Quantile (equal-frequency) threshold finder
///
/// Cut points are taken from observed values, so every resulting bin holds
/// at least one observation. Duplicate quantiles collapse into one cut.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuantileThresholdFinder;

impl BinThresholdFinder for QuantileThresholdFinder {
    fn name(&self) -> &'static str {
        "quantile"
    }

    fn find(
        &self,
        values: &[f64],
        labels: &[i32],
        config: &StrategyConfig,
    ) -> BinningResult<Vec<f64>> {
        let pairs = sorted_pairs(values, labels);
        let sorted: Vec<f64> = pairs.iter().map(|(v, _)| *v).collect();
        let n = sorted.len();
        let num_bins = config.max_leaf_nodes.max(1);

        let mut cuts = vec![f64::NEG_INFINITY];

        if n > 0 {
            let max_value = sorted[n - 1];
            for i in 1..num_bins {
                // Ceiling division keeps the first bins at full size
                let idx = (i * n + num_bins - 1) / num_bins;
                let cut = sorted[idx.saturating_sub(1).min(n - 1)];
                let last = cuts[cuts.len() - 1];
                if cut > last && cut < max_value {
                    cuts.push(cut);
                }
            }
        }

        cuts.push(f64::INFINITY);
        Ok(cuts)
    }
}
