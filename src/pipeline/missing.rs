//! Missing value isolation
//!
//! Declared missing markers (sentinels such as `-999`) carry no numeric
//! meaning inside a variable's domain. When enough observations match a
//! marker they are pulled out into a dedicated missing bin ahead of the
//! threshold search; otherwise they stay in the working set and fall into
//! whichever ordinary bin contains them.

use super::features::{FeatureValues, MissingMarker};

/// Outcome of isolating declared-missing observations for one variable
#[derive(Debug, Clone, PartialEq)]
pub struct MissingSplit {
    /// Whether the markers form their own bin
    pub has_missing_bin: bool,
    /// Configured markers that actually occur in the column, in declaration order
    pub markers_present: Vec<MissingMarker>,
    /// Number of observations matching any marker
    pub missing_count: usize,
    /// Rows that remain in the working set
    pub keep: Vec<bool>,
}

impl MissingSplit {
    /// Apply the split to a variable and its labels
    pub fn apply(&self, values: &FeatureValues, labels: &[i32]) -> (FeatureValues, Vec<i32>) {
        if !self.has_missing_bin {
            return (values.clone(), labels.to_vec());
        }
        let kept_labels = labels
            .iter()
            .zip(&self.keep)
            .filter(|(_, k)| **k)
            .map(|(y, _)| *y)
            .collect();
        (values.filter(&self.keep), kept_labels)
    }
}

/// Resolve the fractional minimum bin size against the dataset row count
pub fn resolve_min_samples(min_samples_leaf: f64, n_rows: usize) -> f64 {
    min_samples_leaf * n_rows as f64
}

/// Split a variable into declared-missing and normal observations
///
/// The missing bin is created only when the marker count strictly exceeds
/// `threshold` (a row count, see [`resolve_min_samples`]).
pub fn isolate_missing(
    values: &FeatureValues,
    markers: &[MissingMarker],
    threshold: f64,
) -> MissingSplit {
    let n = values.len();
    let is_missing: Vec<bool> = (0..n).map(|i| values.is_marker(i, markers)).collect();
    let missing_count = is_missing.iter().filter(|m| **m).count();

    let markers_present: Vec<MissingMarker> = markers
        .iter()
        .filter(|m| (0..n).any(|i| is_missing[i] && values.is_marker(i, std::slice::from_ref(*m))))
        .cloned()
        .collect();

    let has_missing_bin = missing_count as f64 > threshold;
    let keep = if has_missing_bin {
        is_missing.iter().map(|m| !m).collect()
    } else {
        vec![true; n]
    };

    MissingSplit {
        has_missing_bin,
        markers_present,
        missing_count,
        keep,
    }
}
