//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

use woebin::pipeline::{BinThresholdFinder, BinningResult, StrategyConfig};

/// Column names as owned strings
pub fn vars(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Create a DataFrame whose `x` separates the target perfectly at 10.5
///
/// - `target`: 0 for the first ten rows, 1 for the last ten
/// - `x`: 1..=20
/// - `noise`: identical distribution in both classes
pub fn create_separable_dataframe() -> DataFrame {
    let x: Vec<f64> = (1..=20).map(|v| v as f64).collect();
    let target: Vec<i32> = (0..20).map(|i| i32::from(i >= 10)).collect();
    let noise: Vec<f64> = (0..20).map(|i| (i % 10) as f64).collect();
    df! {
        "target" => target,
        "x" => x,
        "noise" => noise,
    }
    .unwrap()
}

/// Create a DataFrame where `x` holds the sentinel -999 on five rows
///
/// The sentinel rows are all bads; the remaining rows separate at 7.5.
pub fn create_sentinel_dataframe() -> DataFrame {
    df! {
        "target" => [0i32, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0],
        "x" => [1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0,
                -999.0, -999.0, -999.0, -999.0, -999.0, 15.0],
    }
    .unwrap()
}

/// Create a DataFrame with a categorical `city` variable
///
/// Bad rates: A 4/5, B 1/5, C 0/5, D 3/5.
pub fn create_categorical_dataframe() -> DataFrame {
    df! {
        "target" => [1i32, 1, 1, 1, 0,  1, 0, 0, 0, 0,  0, 0, 0, 0, 0,  1, 1, 1, 0, 0],
        "city" => ["A", "A", "A", "A", "A", "B", "B", "B", "B", "B",
                   "C", "C", "C", "C", "C", "D", "D", "D", "D", "D"],
    }
    .unwrap()
}

/// Create a DataFrame whose four equal groups have bad counts 8, 2, 7, 1
///
/// With cuts at 1.5, 2.5, 3.5 the WoE sequence zig-zags.
pub fn create_zigzag_dataframe() -> DataFrame {
    let x: Vec<f64> = (0..40).map(|i| (i / 10 + 1) as f64).collect();
    let bads_per_group = [8, 2, 7, 1];
    let target: Vec<i32> = (0..40)
        .map(|i| i32::from((i % 10) < bads_per_group[i / 10]))
        .collect();
    df! {
        "target" => target,
        "x" => x,
    }
    .unwrap()
}

/// Create a larger random DataFrame for performance tests
pub fn create_large_test_dataframe(rows: usize, cols: usize) -> DataFrame {
    use rand::Rng;
    let mut rng = rand::thread_rng();

    let mut columns: Vec<Column> = Vec::with_capacity(cols + 1);

    let target: Vec<i32> = (0..rows).map(|_| rng.gen_range(0..2)).collect();
    columns.push(Column::new("target".into(), target));

    for i in 0..cols {
        let values: Vec<f64> = (0..rows).map(|_| rng.gen::<f64>()).collect();
        columns.push(Column::new(format!("feature_{}", i).into(), values));
    }

    DataFrame::new(columns).unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test_data.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Threshold finder that always returns the same cut points
pub struct FixedCuts(pub Vec<f64>);

impl BinThresholdFinder for FixedCuts {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn find(&self, _: &[f64], _: &[i32], _: &StrategyConfig) -> BinningResult<Vec<f64>> {
        Ok(self.0.clone())
    }
}
