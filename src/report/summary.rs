//! Binning summary displayed at the end of a run

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{Binner, FeatureType, TrimResult};

/// IV above which a variable is considered predictive
const STRONG_IV: f64 = 0.1;

/// IV below which a variable is considered useless
const WEAK_IV: f64 = 0.02;

/// Summary row for one binned variable
#[derive(Debug, Clone)]
pub struct FeatureSummary {
    pub name: String,
    pub feature_type: FeatureType,
    pub bins: usize,
    pub has_missing_bin: bool,
    pub iv: f64,
    pub monotonic: bool,
    pub merges: Option<usize>,
    pub ks: Option<f64>,
    pub gini: Option<f64>,
}

/// Summary of a binning run
#[derive(Debug, Default)]
pub struct BinningSummary {
    pub features: Vec<FeatureSummary>,
    pub show_ks: bool,
    pub show_gini: bool,
}

impl BinningSummary {
    /// Collect the summary from the binner, sorted by IV descending
    pub fn from_binner(binner: &Binner, trims: &[TrimResult]) -> Self {
        let mut features: Vec<FeatureSummary> = binner
            .features_bins()
            .map(|(name, fb)| FeatureSummary {
                name: name.to_string(),
                feature_type: fb.feature_type,
                bins: fb.bins.len(),
                has_missing_bin: fb.has_missing_bin,
                iv: fb.iv,
                monotonic: fb.is_monotonic(),
                merges: trims.iter().find(|t| t.feature == name).map(|t| t.merges),
                ks: fb.ks,
                gini: fb.gini,
            })
            .collect();
        features.sort_by(|a, b| b.iv.partial_cmp(&a.iv).unwrap_or(std::cmp::Ordering::Equal));

        Self {
            features,
            show_ks: binner.config().is_ks,
            show_gini: binner.config().is_gini,
        }
    }

    pub fn monotonic_count(&self) -> usize {
        self.features.iter().filter(|f| f.monotonic).count()
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("BINNING SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);

        let mut header = vec![
            Cell::new("Feature").add_attribute(Attribute::Bold),
            Cell::new("Type").add_attribute(Attribute::Bold),
            Cell::new("Bins").add_attribute(Attribute::Bold),
            Cell::new("IV").add_attribute(Attribute::Bold),
            Cell::new("Monotonic").add_attribute(Attribute::Bold),
            Cell::new("Merges").add_attribute(Attribute::Bold),
        ];
        if self.show_ks {
            header.push(Cell::new("KS").add_attribute(Attribute::Bold));
        }
        if self.show_gini {
            header.push(Cell::new("Gini").add_attribute(Attribute::Bold));
        }
        table.set_header(header);

        for f in &self.features {
            let iv_color = if f.iv >= STRONG_IV {
                Color::Green
            } else if f.iv >= WEAK_IV {
                Color::Yellow
            } else {
                Color::Red
            };

            let bins = if f.has_missing_bin {
                format!("{} (+missing)", f.bins - 1)
            } else {
                f.bins.to_string()
            };

            let mut row = vec![
                Cell::new(&f.name),
                Cell::new(f.feature_type),
                Cell::new(bins),
                Cell::new(format!("{:.4}", f.iv)).fg(iv_color),
                Cell::new(if f.monotonic { "yes" } else { "no" }).fg(if f.monotonic {
                    Color::Green
                } else {
                    Color::Yellow
                }),
                Cell::new(f.merges.map_or("-".to_string(), |m| m.to_string())),
            ];
            if self.show_ks {
                row.push(Cell::new(f.ks.map_or("-".to_string(), |v| format!("{:.4}", v))));
            }
            if self.show_gini {
                row.push(Cell::new(f.gini.map_or("-".to_string(), |v| format!("{:.4}", v))));
            }
            table.add_row(row);
        }

        // Indent the table
        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        println!();
        println!(
            "      {} of {} feature(s) monotonic",
            style(self.monotonic_count()).green().bold(),
            self.features.len()
        );
    }
}
