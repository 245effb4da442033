//! Target label extraction and validation
//!
//! The binning pipeline requires a strictly binary label: 1 marks a "bad"
//! outcome and 0 a "good" one. Anything else is rejected before any binning
//! work starts.

use polars::prelude::*;

use super::error::{BinningError, BinningResult};

/// Tolerance for floating point comparison when checking binary 0/1 values
const TOLERANCE: f64 = 1e-9;

/// Extract the label column as 0/1 integers, validating that it is binary
///
/// This handles the edge cases that show up after CSV/Parquet loading:
/// - Float64 columns with values like 0.0 and 1.0 (with tolerance)
/// - Integer and boolean columns
///
/// Nulls, empty columns, and any value other than 0 or 1 are a
/// `PreconditionViolation`.
pub fn extract_labels(df: &DataFrame, target: &str) -> BinningResult<Vec<i32>> {
    let target_col = df
        .column(target)
        .map_err(|_| BinningError::ColumnNotFound(target.to_string()))?;

    if target_col.len() == 0 {
        return Err(BinningError::PreconditionViolation(format!(
            "target column '{}' is empty",
            target
        )));
    }

    if target_col.null_count() > 0 {
        return Err(BinningError::PreconditionViolation(format!(
            "target column '{}' contains {} null value(s)",
            target,
            target_col.null_count()
        )));
    }

    // Cast to Float64 first to handle integer, float and boolean types uniformly
    let float_col = target_col.cast(&DataType::Float64).map_err(|_| {
        BinningError::PreconditionViolation(format!(
            "target column '{}' must be numeric 0/1, found {}",
            target,
            target_col.dtype()
        ))
    })?;

    let mut labels = Vec::with_capacity(float_col.len());
    for value in float_col.f64()?.into_iter() {
        match value {
            Some(v) if v.abs() < TOLERANCE => labels.push(0),
            Some(v) if (v - 1.0).abs() < TOLERANCE => labels.push(1),
            Some(v) => {
                return Err(BinningError::PreconditionViolation(format!(
                    "target column '{}' must be binary (0/1), found value {}",
                    target, v
                )))
            }
            None => {
                return Err(BinningError::PreconditionViolation(format!(
                    "target column '{}' contains non-numeric values",
                    target
                )))
            }
        }
    }

    Ok(labels)
}

/// Total bad (label = 1) and good (label = 0) counts
pub fn label_totals(labels: &[i32]) -> (u64, u64) {
    let bad = labels.iter().filter(|&&y| y == 1).count() as u64;
    (bad, labels.len() as u64 - bad)
}
