//! Bin representation
//!
//! A bin is either a half-open numeric interval `(lower, upper]`, a set of
//! category values, or the dedicated missing bin holding the declared
//! missing markers present in a column. Membership and merging are defined
//! per variant.

use std::fmt;

use serde::{Serialize, Serializer};

use super::error::{BinningError, BinningResult};
use super::features::{FeatureValues, MissingMarker};

/// A single partition element of a variable
#[derive(Debug, Clone, PartialEq)]
pub enum Bin {
    /// Declared missing markers isolated into their own bin
    Missing(Vec<MissingMarker>),
    /// Half-open numeric interval `(lower, upper]`
    Interval { lower: f64, upper: f64 },
    /// Set of category values, kept in WoE rank order
    Categories(Vec<String>),
}

impl Bin {
    pub fn interval(lower: f64, upper: f64) -> Self {
        Bin::Interval { lower, upper }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Bin::Missing(_))
    }

    /// Whether a numeric observation falls into this bin
    pub fn contains_number(&self, value: f64) -> bool {
        match self {
            Bin::Interval { lower, upper } => value > *lower && value <= *upper,
            Bin::Missing(markers) => markers.iter().any(|m| m.matches_number(value)),
            Bin::Categories(_) => false,
        }
    }

    /// Whether a categorical observation falls into this bin
    pub fn contains_category(&self, value: &str) -> bool {
        match self {
            Bin::Categories(cats) => cats.iter().any(|c| c == value),
            Bin::Missing(markers) => markers.iter().any(|m| m.matches_category(value)),
            Bin::Interval { .. } => false,
        }
    }

    /// Whether observation `idx` of `values` falls into this bin
    pub fn contains(&self, values: &FeatureValues, idx: usize) -> bool {
        match values {
            FeatureValues::Numeric(v) => self.contains_number(v[idx]),
            FeatureValues::Categorical(v) => self.contains_category(&v[idx]),
        }
    }

    /// Merge the following bin into this one
    ///
    /// Intervals take the upper bound of `next`; category sets are unioned.
    pub fn absorb(&mut self, next: &Bin) -> BinningResult<()> {
        match (self, next) {
            (Bin::Interval { upper, .. }, Bin::Interval { upper: next_upper, .. }) => {
                *upper = *next_upper;
                Ok(())
            }
            (Bin::Categories(cats), Bin::Categories(next_cats)) => {
                for c in next_cats {
                    if !cats.contains(c) {
                        cats.push(c.clone());
                    }
                }
                Ok(())
            }
            (current, next) => Err(BinningError::PreconditionViolation(format!(
                "cannot merge bin {} with bin {}",
                current, next
            ))),
        }
    }
}

impl fmt::Display for Bin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bin::Interval { lower, upper } => write!(f, "({}, {}]", lower, upper),
            Bin::Categories(cats) => write!(f, "[{}]", cats.join(", ")),
            Bin::Missing(markers) => {
                let joined: Vec<String> = markers.iter().map(|m| m.to_string()).collect();
                write!(f, "MISSING [{}]", joined.join(", "))
            }
        }
    }
}

// Bins are exported by their label; JSON has no encoding for infinite bounds
impl Serialize for Bin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Build ordered intervals from strictly increasing cut points
pub fn intervals_from_cuts(cuts: &[f64]) -> Vec<Bin> {
    cuts.windows(2).map(|w| Bin::interval(w[0], w[1])).collect()
}

/// Index of the first bin containing observation `idx`, if any
pub fn locate(bins: &[Bin], values: &FeatureValues, idx: usize) -> Option<usize> {
    bins.iter().position(|b| b.contains(values, idx))
}
