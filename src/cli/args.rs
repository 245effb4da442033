//! Command-line argument definitions using clap

use clap::Parser;
use std::path::{Path, PathBuf};

use crate::pipeline::{
    BinnerConfig, BinningStrategy, FeatureType, MissingMarker, DEFAULT_MAX_LEAF_NODES,
};

/// woebin - Supervised WoE binning of variables against a binary target
#[derive(Parser, Debug)]
#[command(name = "woebin")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input file path (CSV or Parquet)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Target column name. Must hold only 0 (good) and 1 (bad), without nulls.
    #[arg(short, long)]
    pub target: String,

    /// Variables to bin (comma-separated).
    /// Defaults to every column except the target.
    #[arg(long, value_delimiter = ',')]
    pub variables: Vec<String>,

    /// Binning strategy used to find cut points.
    /// Options: "cart" (decision tree splits, default) or "quantile" (equal-frequency)
    #[arg(long, default_value = "cart")]
    pub strategy: BinningStrategy,

    /// Upper bound on the number of bins per variable
    #[arg(long, default_value_t = DEFAULT_MAX_LEAF_NODES, value_parser = validate_max_leaf_nodes)]
    pub max_leaf_nodes: usize,

    /// Minimum bin size as a fraction of total rows (0-1).
    /// Also the population a missing-value bin needs before it is created.
    #[arg(long, default_value = "0.05", value_parser = validate_min_samples_leaf)]
    pub min_samples_leaf: f64,

    /// Add the Kolmogorov-Smirnov statistic to the report
    #[arg(long, default_value = "false")]
    pub ks: bool,

    /// Add the Gini coefficient to the report
    #[arg(long, default_value = "false")]
    pub gini: bool,

    /// Merge bins until the WoE of every variable is monotonic
    #[arg(long, default_value = "false")]
    pub trim: bool,

    /// Only trim variables whose IV is above this value
    #[arg(long, default_value = "0.02")]
    pub trim_min_iv: f64,

    /// Missing-value markers applied to every variable (comma-separated).
    /// Numbers match numeric variables, anything else matches categories.
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub missing: Vec<String>,

    /// Columns to treat as categorical regardless of their dtype (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub categorical: Vec<String>,

    /// JSON file with per-variable kind and missing markers.
    /// Entries override --missing and --categorical.
    #[arg(long)]
    pub features_config: Option<PathBuf>,

    /// Report output path (CSV, Parquet or JSON, determined by extension).
    /// Defaults to input directory with '_binning.csv' suffix (e.g., data.csv → data_binning.csv).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write the WoE-encoded variables to this path (CSV or Parquet)
    #[arg(long)]
    pub woe_output: Option<PathBuf>,

    /// Number of rows to use for schema inference (CSV only).
    /// Higher values improve type detection for ambiguous columns but may be slower.
    /// Use 0 for full table scan.
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,
}

impl Cli {
    /// Get the report path, deriving from input if not explicitly provided.
    /// The derived path will be in the same directory as the input with a '_binning' suffix.
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let parent = self.input.parent().unwrap_or_else(|| Path::new("."));
            let stem = self
                .input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("output");
            parent.join(format!("{}_binning.csv", stem))
        })
    }

    pub fn binner_config(&self) -> BinnerConfig {
        BinnerConfig {
            max_leaf_nodes: self.max_leaf_nodes,
            min_samples_leaf: self.min_samples_leaf,
            is_ks: self.ks,
            is_gini: self.gini,
        }
    }

    /// Global missing markers parsed from --missing
    pub fn missing_markers(&self) -> Vec<MissingMarker> {
        self.missing
            .iter()
            .map(|raw| raw.trim())
            .filter(|raw| !raw.is_empty())
            .map(MissingMarker::parse)
            .collect()
    }

    /// Kind override for a column from --categorical
    pub fn kind_override(&self, column: &str) -> Option<FeatureType> {
        self.categorical
            .iter()
            .any(|c| c == column)
            .then_some(FeatureType::Categorical)
    }
}

/// Validator for max_leaf_nodes parameter
fn validate_max_leaf_nodes(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid integer", s))?;

    if value < 2 {
        Err(format!("max_leaf_nodes must be at least 2, got {}", value))
    } else {
        Ok(value)
    }
}

/// Validator for min_samples_leaf parameter
fn validate_min_samples_leaf(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(value > 0.0 && value < 1.0) {
        Err(format!(
            "min_samples_leaf must be strictly between 0.0 and 1.0, got {}",
            value
        ))
    } else {
        Ok(value)
    }
}
