//! Ordinal WoE encoding of categorical variables
//!
//! Each category is scored with its single-bin WoE and categories are ranked
//! by ascending WoE. The rank is a numeric proxy that any threshold-based
//! strategy can split; the resulting rank intervals `(lo, hi]` translate back
//! into sets of original categories.

use std::collections::HashMap;

use super::target::label_totals;
use super::woe::woe_single;

/// Mapping from category value to its 0-based WoE rank
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryEncoding {
    ranks: HashMap<String, usize>,
    /// Categories ordered by rank
    ordered: Vec<String>,
}

impl CategoryEncoding {
    /// Rank of a category, if it was seen during encoding
    pub fn rank(&self, category: &str) -> Option<usize> {
        self.ranks.get(category).copied()
    }

    /// Number of distinct categories
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Categories in ascending WoE order
    pub fn categories(&self) -> &[String] {
        &self.ordered
    }

    /// Replace every category by its rank
    pub fn encode(&self, values: &[String]) -> Vec<f64> {
        values
            .iter()
            .map(|v| self.rank(v).map_or(f64::NAN, |r| r as f64))
            .collect()
    }

    /// Categories whose rank lies in the half-open interval `(lower, upper]`
    pub fn categories_between(&self, lower: f64, upper: f64) -> Vec<String> {
        self.ordered
            .iter()
            .enumerate()
            .filter(|(rank, _)| {
                let r = *rank as f64;
                r > lower && r <= upper
            })
            .map(|(_, c)| c.clone())
            .collect()
    }
}

/// Rank each category of a variable by its single-bin WoE
///
/// Totals are taken from the labels passed in, so callers encoding a
/// missing-filtered subset get WoE relative to that subset. Ties keep the
/// order in which categories first appear.
pub fn encode_woe(values: &[String], labels: &[i32]) -> CategoryEncoding {
    let (total_bad, total_good) = label_totals(labels);

    // (category, bad, good) in first-appearance order
    let mut stats: Vec<(String, u64, u64)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for (value, &label) in values.iter().zip(labels) {
        let slot = match index.get(value.as_str()) {
            Some(&i) => i,
            None => {
                index.insert(value.as_str(), stats.len());
                stats.push((value.clone(), 0, 0));
                stats.len() - 1
            }
        };
        if label == 1 {
            stats[slot].1 += 1;
        } else {
            stats[slot].2 += 1;
        }
    }

    let mut scored: Vec<(String, f64)> = stats
        .into_iter()
        .map(|(cat, bad, good)| {
            let woe = woe_single(total_bad as f64, total_good as f64, bad as f64, good as f64);
            (cat, woe)
        })
        .collect();

    // Stable sort keeps first-appearance order among equal WoE values
    scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    let ordered: Vec<String> = scored.into_iter().map(|(cat, _)| cat).collect();
    let ranks = ordered
        .iter()
        .enumerate()
        .map(|(rank, cat)| (cat.clone(), rank))
        .collect();

    CategoryEncoding { ranks, ordered }
}
