//! CART-style decision tree cut points
//!
//! Leaves are grown best-first: at every step the leaf whose best split
//! yields the largest weighted Gini reduction is split, until the leaf budget
//! is spent or no leaf can be split without violating the minimum leaf size.

use super::{sorted_pairs, BinThresholdFinder, StrategyConfig};
use crate::pipeline::error::BinningResult;

/// Values closer than this are treated as equal when looking for split points
const VALUE_EPSILON: f64 = 1e-10;

/// Decision-tree threshold finder
#[derive(Debug, Clone, Copy, Default)]
pub struct CartThresholdFinder;

impl BinThresholdFinder for CartThresholdFinder {
    fn name(&self) -> &'static str {
        "cart"
    }

    fn find(
        &self,
        values: &[f64],
        labels: &[i32],
        config: &StrategyConfig,
    ) -> BinningResult<Vec<f64>> {
        let pairs = sorted_pairs(values, labels);
        let min_samples = config.min_samples_leaf.max(1);

        let mut thresholds = cart_thresholds(&pairs, config.max_leaf_nodes, min_samples);
        thresholds.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mut cuts = Vec::with_capacity(thresholds.len() + 2);
        cuts.push(f64::NEG_INFINITY);
        cuts.extend(thresholds);
        cuts.push(f64::INFINITY);
        Ok(cuts)
    }
}

/// Calculate Gini impurity for a set of samples
///
/// For binary classification: Gini = 2 * p * (1 - p)
/// where p is the proportion of bads.
fn gini_impurity(bads: f64, goods: f64) -> f64 {
    let total = bads + goods;
    if total == 0.0 {
        return 0.0;
    }
    let p = bads / total;
    2.0 * p * (1.0 - p)
}

/// Find the split that maximizes Gini reduction within one leaf
///
/// # Arguments
/// * `sorted_pairs` - Slice of (value, label) tuples, sorted by value
/// * `min_samples` - Minimum samples required on each side of the split
///
/// # Returns
/// Option of (split_index, gain) where `split_index` is where the right side starts
fn find_best_split(sorted_pairs: &[(f64, i32)], min_samples: usize) -> Option<(usize, f64)> {
    let n = sorted_pairs.len();
    if n < 2 * min_samples || n < 2 {
        return None;
    }

    let total_bads = sorted_pairs.iter().filter(|(_, t)| *t == 1).count() as f64;
    let total_goods = n as f64 - total_bads;
    let parent_gini = gini_impurity(total_bads, total_goods);

    let mut best_gain = 0.0;
    let mut best_split_idx = None;
    let mut left_bads = 0.0f64;

    for i in 0..n - 1 {
        if sorted_pairs[i].1 == 1 {
            left_bads += 1.0;
        }

        let left_count = i + 1;
        let right_count = n - left_count;

        if left_count < min_samples || right_count < min_samples {
            continue;
        }

        // Never split between equal values
        if (sorted_pairs[i + 1].0 - sorted_pairs[i].0).abs() < VALUE_EPSILON {
            continue;
        }

        let left_goods = left_count as f64 - left_bads;
        let right_bads = total_bads - left_bads;
        let right_goods = total_goods - left_goods;

        let left_prop = left_count as f64 / n as f64;
        let right_prop = right_count as f64 / n as f64;

        let weighted_child_gini = left_prop * gini_impurity(left_bads, left_goods)
            + right_prop * gini_impurity(right_bads, right_goods);

        let gain = parent_gini - weighted_child_gini;
        if gain > best_gain {
            best_gain = gain;
            best_split_idx = Some(i + 1);
        }
    }

    best_split_idx.map(|idx| (idx, best_gain))
}

/// Grow leaves best-first and return the interior thresholds
///
/// Each threshold is the midpoint between the last value of a left leaf and
/// the first value of its right sibling.
fn cart_thresholds(sorted_pairs: &[(f64, i32)], max_leaves: usize, min_samples: usize) -> Vec<f64> {
    let n = sorted_pairs.len();
    if n == 0 {
        return Vec::new();
    }

    // Leaves as [start, end) ranges into sorted_pairs
    let mut leaves: Vec<(usize, usize)> = vec![(0, n)];
    let mut thresholds = Vec::new();

    while leaves.len() < max_leaves.max(1) {
        let mut best: Option<(usize, usize, f64)> = None; // (leaf, split, weighted gain)

        for (leaf_idx, &(start, end)) in leaves.iter().enumerate() {
            if let Some((split, gain)) = find_best_split(&sorted_pairs[start..end], min_samples) {
                let weighted = gain * (end - start) as f64 / n as f64;
                if best.map_or(true, |(_, _, g)| weighted > g) {
                    best = Some((leaf_idx, start + split, weighted));
                }
            }
        }

        let Some((leaf_idx, split, _)) = best else {
            break;
        };

        let (start, end) = leaves[leaf_idx];
        thresholds.push((sorted_pairs[split - 1].0 + sorted_pairs[split].0) / 2.0);
        leaves[leaf_idx] = (start, split);
        leaves.insert(leaf_idx + 1, (split, end));
    }

    thresholds
}
