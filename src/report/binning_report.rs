//! Binning report table and export
//!
//! The table has one row per (variable, bin) and is always derived from the
//! binner's per-variable state, so it cannot drift from the bins themselves.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use polars::prelude::*;
use serde::Serialize;

use crate::pipeline::{save_dataset, Binner, BinnerConfig, FeatureBinning};

/// A single (variable, bin) row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub col_name: String,
    pub bin: String,
    pub bad: u64,
    pub count: u64,
    /// Bad rate (bad / count)
    pub rate: f64,
    pub woe: f64,
    /// Variable-level IV, repeated on every row of the variable
    pub iv: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ks: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gini: Option<f64>,
}

/// Per-bin report across all binned variables
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportTable {
    pub rows: Vec<ReportRow>,
    #[serde(skip)]
    pub has_ks: bool,
    #[serde(skip)]
    pub has_gini: bool,
}

impl ReportTable {
    /// Build the table from binned variables, in the order given
    pub fn from_features<'a>(
        features: impl Iterator<Item = (&'a str, &'a FeatureBinning)>,
        has_ks: bool,
        has_gini: bool,
    ) -> Self {
        let mut rows = Vec::new();

        for (name, fb) in features {
            for (i, bin) in fb.bins.iter().enumerate() {
                let count = fb.counts[i];
                let bad = fb.bads[i];
                rows.push(ReportRow {
                    col_name: name.to_string(),
                    bin: bin.to_string(),
                    bad,
                    count,
                    rate: if count > 0 { bad as f64 / count as f64 } else { 0.0 },
                    woe: fb.woes[i],
                    iv: fb.iv,
                    ks: if has_ks { fb.ks } else { None },
                    gini: if has_gini { fb.gini } else { None },
                });
            }
        }

        Self {
            rows,
            has_ks,
            has_gini,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows belonging to one variable
    pub fn rows_for<'a>(&'a self, col_name: &'a str) -> impl Iterator<Item = &'a ReportRow> {
        self.rows.iter().filter(move |r| r.col_name == col_name)
    }

    /// Convert to a polars DataFrame with columns
    /// `col_name, bin, bad, count, rate, woe, iv` (+ `ks`, `gini` when enabled)
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let mut columns = vec![
            Column::new(
                "col_name".into(),
                self.rows.iter().map(|r| r.col_name.as_str()).collect::<Vec<_>>(),
            ),
            Column::new(
                "bin".into(),
                self.rows.iter().map(|r| r.bin.as_str()).collect::<Vec<_>>(),
            ),
            Column::new("bad".into(), self.rows.iter().map(|r| r.bad).collect::<Vec<_>>()),
            Column::new("count".into(), self.rows.iter().map(|r| r.count).collect::<Vec<_>>()),
            Column::new("rate".into(), self.rows.iter().map(|r| r.rate).collect::<Vec<_>>()),
            Column::new("woe".into(), self.rows.iter().map(|r| r.woe).collect::<Vec<_>>()),
            Column::new("iv".into(), self.rows.iter().map(|r| r.iv).collect::<Vec<_>>()),
        ];
        if self.has_ks {
            columns.push(Column::new(
                "ks".into(),
                self.rows.iter().map(|r| r.ks).collect::<Vec<Option<f64>>>(),
            ));
        }
        if self.has_gini {
            columns.push(Column::new(
                "gini".into(),
                self.rows.iter().map(|r| r.gini).collect::<Vec<Option<f64>>>(),
            ));
        }
        DataFrame::new(columns)
    }
}

/// Metadata about the binning run
#[derive(Serialize)]
pub struct ReportMetadata {
    /// Timestamp of the run (ISO 8601 format)
    pub timestamp: String,
    pub woebin_version: String,
    pub input_file: String,
    pub target_column: String,
    pub binning_strategy: String,
    pub config: BinnerConfig,
}

/// A single variable's binning in the JSON export
#[derive(Serialize)]
pub struct FeatureExportEntry<'a> {
    pub name: &'a str,
    pub monotonic: bool,
    #[serde(flatten)]
    pub binning: &'a FeatureBinning,
}

/// Complete JSON export
#[derive(Serialize)]
pub struct BinningExport<'a> {
    pub metadata: ReportMetadata,
    pub features: Vec<FeatureExportEntry<'a>>,
    pub report: ReportTable,
}

/// Parameters recorded in the export metadata
pub struct ExportParams<'a> {
    pub input_file: &'a str,
    pub target_column: &'a str,
}

/// Write the report; the format follows the extension (csv, parquet or json)
pub fn write_report(binner: &Binner, output_path: &Path, params: &ExportParams) -> Result<()> {
    let extension = output_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if extension == "json" {
        return export_binning_json(binner, output_path, params);
    }

    let mut df = binner
        .report()
        .to_dataframe()
        .context("Failed to build report table")?;
    save_dataset(&mut df, output_path)
}

/// Export binning results with run metadata to a JSON file
pub fn export_binning_json(
    binner: &Binner,
    output_path: &Path,
    params: &ExportParams,
) -> Result<()> {
    let features = binner
        .features_bins()
        .map(|(name, binning)| FeatureExportEntry {
            name,
            monotonic: binning.is_monotonic(),
            binning,
        })
        .collect();

    let export = BinningExport {
        metadata: ReportMetadata {
            timestamp: Utc::now().to_rfc3339(),
            woebin_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: params.input_file.to_string(),
            target_column: params.target_column.to_string(),
            binning_strategy: binner.strategy_name().to_string(),
            config: *binner.config(),
        },
        features,
        report: binner.report(),
    };

    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize binning report to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write binning report to {}", output_path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{Bin, FeatureType};

    fn sample() -> FeatureBinning {
        FeatureBinning {
            feature_type: FeatureType::Numeric,
            bins: vec![
                Bin::interval(f64::NEG_INFINITY, 5.0),
                Bin::interval(5.0, f64::INFINITY),
            ],
            has_missing_bin: false,
            counts: vec![4, 6],
            bads: vec![1, 3],
            woes: vec![-0.4, 0.3],
            iv: 0.12,
            ks: Some(0.2),
            gini: None,
        }
    }

    #[test]
    fn test_rows_per_bin() {
        let fb = sample();
        let table = ReportTable::from_features(std::iter::once(("x", &fb)), false, false);

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].bin, "(-inf, 5]");
        assert!((table.rows[1].rate - 0.5).abs() < 1e-12);
        assert!(table.rows.iter().all(|r| r.iv == 0.12 && r.ks.is_none()));
    }

    #[test]
    fn test_to_dataframe_optional_columns() {
        let fb = sample();
        let table = ReportTable::from_features(std::iter::once(("x", &fb)), true, true);
        let df = table.to_dataframe().unwrap();

        let names: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
        assert_eq!(
            names,
            vec!["col_name", "bin", "bad", "count", "rate", "woe", "iv", "ks", "gini"]
        );
        assert_eq!(df.height(), 2);
        assert_eq!(df.column("gini").unwrap().null_count(), 2);
    }
}
