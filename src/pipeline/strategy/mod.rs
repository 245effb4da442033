//! Threshold search strategies
//!
//! The binner only depends on the [`BinThresholdFinder`] contract: given a
//! numeric column (raw values or WoE ranks for categorical variables) and the
//! label, return strictly increasing cut points `[c0, c1, ..., ck]` where each
//! consecutive pair defines a bin `(c_i, c_i+1]`.

mod cart;
mod quantile;

pub use cart::CartThresholdFinder;
pub use quantile::QuantileThresholdFinder;

use serde::Serialize;

use super::error::{BinningError, BinningResult};

/// Limits a strategy must honour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyConfig {
    /// Upper bound on the number of bins
    pub max_leaf_nodes: usize,
    /// Minimum observations per bin (already resolved to a row count)
    pub min_samples_leaf: usize,
}

/// Capability to compute cut points for one numeric column
pub trait BinThresholdFinder: Send + Sync {
    /// Short identifier used in reports
    fn name(&self) -> &'static str;

    /// Compute cut points; at least two, strictly increasing
    fn find(
        &self,
        values: &[f64],
        labels: &[i32],
        config: &StrategyConfig,
    ) -> BinningResult<Vec<f64>>;
}

/// Built-in binning strategies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum BinningStrategy {
    /// CART-style decision tree binning - splits maximize Gini gain (default)
    #[default]
    Cart,
    /// Equal-frequency binning - bins have approximately equal sample counts
    Quantile,
}

impl BinningStrategy {
    /// Instantiate the threshold finder for this strategy
    pub fn finder(&self) -> Box<dyn BinThresholdFinder> {
        match self {
            BinningStrategy::Cart => Box::new(CartThresholdFinder),
            BinningStrategy::Quantile => Box::new(QuantileThresholdFinder),
        }
    }
}

impl std::fmt::Display for BinningStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinningStrategy::Cart => write!(f, "cart"),
            BinningStrategy::Quantile => write!(f, "quantile"),
        }
    }
}

impl std::str::FromStr for BinningStrategy {
    type Err = BinningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cart" | "tree" => Ok(BinningStrategy::Cart),
            "quantile" => Ok(BinningStrategy::Quantile),
            _ => Err(BinningError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Check the cut-point contract: at least two points, strictly increasing
pub fn validate_thresholds(feature: &str, cuts: &[f64]) -> BinningResult<()> {
    if cuts.len() < 2 {
        return Err(BinningError::InvalidThresholds {
            feature: feature.to_string(),
            reason: format!("expected at least 2 cut points, got {}", cuts.len()),
        });
    }
    if cuts.iter().any(|c| c.is_nan()) {
        return Err(BinningError::InvalidThresholds {
            feature: feature.to_string(),
            reason: "cut points contain NaN".to_string(),
        });
    }
    if let Some(w) = cuts.windows(2).find(|w| w[0] >= w[1]) {
        return Err(BinningError::InvalidThresholds {
            feature: feature.to_string(),
            reason: format!("cut points not strictly increasing at {} >= {}", w[0], w[1]),
        });
    }
    Ok(())
}

/// Check that the half-open bins `(c0, ck]` hold every value
pub fn validate_coverage(feature: &str, cuts: &[f64], values: &[f64]) -> BinningResult<()> {
    let (Some(&first), Some(&last)) = (cuts.first(), cuts.last()) else {
        return Ok(());
    };
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if values.is_empty() || (first < min && last >= max) {
        return Ok(());
    }
    Err(BinningError::InvalidThresholds {
        feature: feature.to_string(),
        reason: format!(
            "cut points ({}, {}] do not cover values in [{}, {}]",
            first, last, min, max
        ),
    })
}

/// Pair values with labels and sort by value
fn sorted_pairs(values: &[f64], labels: &[i32]) -> Vec<(f64, i32)> {
    let mut pairs: Vec<(f64, i32)> = values
        .iter()
        .zip(labels)
        .filter(|(v, _)| !v.is_nan())
        .map(|(&v, &t)| (v, t))
        .collect();
    pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    pairs
}
