//! Binning orchestrator
//!
//! For every requested variable the binner isolates declared-missing values,
//! encodes categorical values into WoE ranks, asks its threshold finder for
//! cut points, assembles the bins and scores them with WoE/IV. The result is
//! kept per variable as a [`FeatureBinning`]; the report table is derived from
//! that state on demand.

use std::collections::HashMap;

use polars::prelude::*;
use serde::Serialize;

use super::bins::{intervals_from_cuts, locate, Bin};
use super::encode::encode_woe;
use super::error::{BinningError, BinningResult};
use super::features::{
    extract_feature_values, resolve_feature_type, FeatureSpec, FeatureType, FeatureValues,
    MissingMarker,
};
use super::metrics::{calc_gini, calc_ks};
use super::missing::{isolate_missing, resolve_min_samples};
use super::strategy::{
    validate_coverage, validate_thresholds, BinThresholdFinder, BinningStrategy, StrategyConfig,
};
use super::target::{extract_labels, label_totals};
use super::trim::{count_inflexions, trim_monotonic};
use super::woe::{woe_iv, woe_single};
use crate::report::ReportTable;

/// Default upper bound on bins per variable
pub const DEFAULT_MAX_LEAF_NODES: usize = 5;

/// Default minimum bin size as a fraction of the dataset
pub const DEFAULT_MIN_SAMPLES_LEAF: f64 = 0.05;

/// Binner configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BinnerConfig {
    /// Upper bound on the number of bins a strategy may produce
    pub max_leaf_nodes: usize,
    /// Minimum bin (and missing bin) population as a fraction of the dataset
    pub min_samples_leaf: f64,
    /// Add a KS column to the report
    pub is_ks: bool,
    /// Add a Gini column to the report
    pub is_gini: bool,
}

impl Default for BinnerConfig {
    fn default() -> Self {
        Self {
            max_leaf_nodes: DEFAULT_MAX_LEAF_NODES,
            min_samples_leaf: DEFAULT_MIN_SAMPLES_LEAF,
            is_ks: false,
            is_gini: false,
        }
    }
}

impl BinnerConfig {
    pub fn validate(&self) -> BinningResult<()> {
        if self.max_leaf_nodes < 2 {
            return Err(BinningError::InvalidConfig(format!(
                "max_leaf_nodes must be at least 2, got {}",
                self.max_leaf_nodes
            )));
        }
        if !(self.min_samples_leaf > 0.0 && self.min_samples_leaf < 1.0) {
            return Err(BinningError::InvalidConfig(format!(
                "min_samples_leaf must be in (0, 1), got {}",
                self.min_samples_leaf
            )));
        }
        Ok(())
    }
}

/// Binning result for a single variable
///
/// `bins`, `counts`, `bads` and `woes` are parallel; when `has_missing_bin`
/// is set the first bin is the missing bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureBinning {
    pub feature_type: FeatureType,
    pub bins: Vec<Bin>,
    pub has_missing_bin: bool,
    pub counts: Vec<u64>,
    pub bads: Vec<u64>,
    pub woes: Vec<f64>,
    pub iv: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ks: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gini: Option<f64>,
}

impl FeatureBinning {
    /// Good count per bin
    pub fn goods(&self) -> Vec<u64> {
        self.counts.iter().zip(&self.bads).map(|(c, b)| c - b).collect()
    }

    /// Ordinary bins, excluding the missing bin
    pub fn ordinary_bins(&self) -> &[Bin] {
        let skip = usize::from(self.has_missing_bin);
        &self.bins[skip.min(self.bins.len())..]
    }

    /// WoE values of the ordinary bins
    pub fn ordinary_woes(&self) -> &[f64] {
        let skip = usize::from(self.has_missing_bin);
        &self.woes[skip.min(self.woes.len())..]
    }

    /// Whether the ordinary bins' WoE sequence has no inflexion
    pub fn is_monotonic(&self) -> bool {
        count_inflexions(self.ordinary_woes()) == 0
    }

    /// WoE of the bin containing observation `idx`; 0.0 when no bin matches
    pub fn woe_of(&self, values: &FeatureValues, idx: usize) -> f64 {
        locate(&self.bins, values, idx).map_or(0.0, |b| self.woes[b])
    }
}

/// Per-variable trimming outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrimResult {
    pub feature: String,
    pub merges: usize,
    pub bins_before: usize,
    pub bins_after: usize,
}

/// Discretizes variables against a binary label
pub struct Binner {
    config: BinnerConfig,
    finder: Box<dyn BinThresholdFinder>,
    specs: HashMap<String, FeatureSpec>,
    features_bins: HashMap<String, FeatureBinning>,
    /// Variable names in the order they were first fitted
    order: Vec<String>,
}

impl std::fmt::Debug for Binner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binner")
            .field("config", &self.config)
            .field("finder", &self.finder.name())
            .field("features", &self.order)
            .finish()
    }
}

impl Binner {
    /// Create a binner around an arbitrary threshold finder
    pub fn new(finder: Box<dyn BinThresholdFinder>, config: BinnerConfig) -> BinningResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            finder,
            specs: HashMap::new(),
            features_bins: HashMap::new(),
            order: Vec::new(),
        })
    }

    /// Create a binner using one of the built-in strategies
    pub fn with_strategy(strategy: BinningStrategy, config: BinnerConfig) -> BinningResult<Self> {
        Self::new(strategy.finder(), config)
    }

    /// Declare the kind and missing markers of a variable
    pub fn with_feature(mut self, name: impl Into<String>, spec: FeatureSpec) -> Self {
        self.specs.insert(name.into(), spec);
        self
    }

    pub fn set_feature_spec(&mut self, name: impl Into<String>, spec: FeatureSpec) {
        self.specs.insert(name.into(), spec);
    }

    pub fn config(&self) -> &BinnerConfig {
        &self.config
    }

    pub fn strategy_name(&self) -> &'static str {
        self.finder.name()
    }

    /// Binning of one variable, if it has been fitted
    pub fn feature_binning(&self, name: &str) -> Option<&FeatureBinning> {
        self.features_bins.get(name)
    }

    /// All fitted variables in fit order
    pub fn features_bins(&self) -> impl Iterator<Item = (&str, &FeatureBinning)> {
        self.order
            .iter()
            .filter_map(move |name| self.features_bins.get(name).map(|fb| (name.as_str(), fb)))
    }

    /// IV of every fitted variable in fit order
    pub fn features_iv(&self) -> Vec<(String, f64)> {
        self.features_bins()
            .map(|(name, fb)| (name.to_string(), fb.iv))
            .collect()
    }

    /// IV of every fitted variable, highest first
    pub fn iv_ranking(&self) -> Vec<(String, f64)> {
        let mut ranking = self.features_iv();
        ranking.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranking
    }

    /// Report table derived from the current binning state
    pub fn report(&self) -> ReportTable {
        ReportTable::from_features(self.features_bins(), self.config.is_ks, self.config.is_gini)
    }

    fn missing_markers(&self, name: &str) -> &[MissingMarker] {
        self.specs
            .get(name)
            .map(|s| s.missing.as_slice())
            .unwrap_or(&[])
    }

    /// Validate inputs and extract label plus every requested variable
    fn load_inputs(
        &self,
        df: &DataFrame,
        target: &str,
        variables: &[String],
    ) -> BinningResult<(Vec<i32>, Vec<FeatureValues>)> {
        let labels = extract_labels(df, target)?;

        let mut columns = Vec::with_capacity(variables.len());
        for name in variables {
            if name == target {
                return Err(BinningError::PreconditionViolation(format!(
                    "target column '{}' cannot be binned against itself",
                    target
                )));
            }
            let kind = resolve_feature_type(df, name, self.specs.get(name))?;
            columns.push(extract_feature_values(df, name, kind)?);
        }

        Ok((labels, columns))
    }

    /// Bin every requested variable and score the bins
    ///
    /// All validation (binary label, nulls, column presence) happens before
    /// any variable is binned. A failure on one variable aborts the batch.
    pub fn fit(&mut self, df: &DataFrame, target: &str, variables: &[String]) -> BinningResult<()> {
        let (labels, columns) = self.load_inputs(df, target, variables)?;
        let n_rows = df.height();

        for (name, values) in variables.iter().zip(&columns) {
            let bins = self.find_bins(name, values, &labels, n_rows)?;
            let binning = self.score_bins(values, &labels, bins.bins, bins.has_missing_bin);
            self.store(name, binning);
        }

        Ok(())
    }

    /// Isolate missing values, search thresholds and assemble ordered bins
    fn find_bins(
        &self,
        name: &str,
        values: &FeatureValues,
        labels: &[i32],
        n_rows: usize,
    ) -> BinningResult<AssembledBins> {
        let threshold = resolve_min_samples(self.config.min_samples_leaf, n_rows);
        let split = isolate_missing(values, self.missing_markers(name), threshold);
        let (work_values, work_labels) = split.apply(values, labels);

        let strategy_config = StrategyConfig {
            max_leaf_nodes: self.config.max_leaf_nodes,
            min_samples_leaf: threshold.ceil() as usize,
        };

        let mut bins = Vec::new();
        if split.has_missing_bin {
            bins.push(Bin::Missing(split.markers_present.clone()));
        }

        if work_values.is_empty() {
            return Ok(AssembledBins {
                bins,
                has_missing_bin: split.has_missing_bin,
            });
        }

        match &work_values {
            FeatureValues::Numeric(nums) => {
                let cuts = self.finder.find(nums, &work_labels, &strategy_config)?;
                validate_thresholds(name, &cuts)?;
                validate_coverage(name, &cuts, nums)?;
                bins.extend(intervals_from_cuts(&cuts));
            }
            FeatureValues::Categorical(cats) => {
                let encoding = encode_woe(cats, &work_labels);
                let proxy = encoding.encode(cats);
                let cuts = self.finder.find(&proxy, &work_labels, &strategy_config)?;
                validate_thresholds(name, &cuts)?;
                validate_coverage(name, &cuts, &proxy)?;
                bins.extend(
                    cuts.windows(2)
                        .map(|w| encoding.categories_between(w[0], w[1]))
                        .filter(|cats| !cats.is_empty())
                        .map(Bin::Categories),
                );
            }
        }

        Ok(AssembledBins {
            bins,
            has_missing_bin: split.has_missing_bin,
        })
    }

    /// Count bads/goods per bin over the full column and compute WoE/IV
    fn score_bins(
        &self,
        values: &FeatureValues,
        labels: &[i32],
        bins: Vec<Bin>,
        has_missing_bin: bool,
    ) -> FeatureBinning {
        let (total_bad, total_good) = label_totals(labels);
        let mut bads = vec![0u64; bins.len()];
        let mut counts = vec![0u64; bins.len()];

        for (idx, &label) in labels.iter().enumerate() {
            if let Some(b) = locate(&bins, values, idx) {
                counts[b] += 1;
                if label == 1 {
                    bads[b] += 1;
                }
            }
        }

        let bad_f: Vec<f64> = bads.iter().map(|&b| b as f64).collect();
        let good_f: Vec<f64> = counts.iter().zip(&bads).map(|(&c, &b)| (c - b) as f64).collect();
        let (woes, iv) = woe_iv(total_bad as f64, total_good as f64, &bad_f, &good_f);

        let mut binning = FeatureBinning {
            feature_type: values.feature_type(),
            bins,
            has_missing_bin,
            counts,
            bads,
            woes,
            iv,
            ks: None,
            gini: None,
        };

        if self.config.is_ks || self.config.is_gini {
            let encoded: Vec<f64> = (0..values.len()).map(|i| binning.woe_of(values, i)).collect();
            if self.config.is_ks {
                binning.ks = Some(calc_ks(labels, &encoded).0);
            }
            if self.config.is_gini {
                binning.gini = Some(calc_gini(labels, &encoded));
            }
        }

        binning
    }

    fn store(&mut self, name: &str, binning: FeatureBinning) {
        if self.features_bins.insert(name.to_string(), binning).is_none() {
            self.order.push(name.to_string());
        }
    }

    /// Merge bins of each variable until its WoE sequence is monotonic
    ///
    /// The missing bin is left untouched. Merged-bin counts are recounted from
    /// the raw data at each step, and the full WoE/IV statistics are
    /// recomputed once the variable converges.
    pub fn trim(
        &mut self,
        df: &DataFrame,
        target: &str,
        variables: &[String],
    ) -> BinningResult<Vec<TrimResult>> {
        for name in variables {
            if !self.features_bins.contains_key(name) {
                return Err(BinningError::FeatureNotBinned(name.clone()));
            }
        }
        let (labels, columns) = self.load_inputs(df, target, variables)?;
        let (total_bad, total_good) = label_totals(&labels);

        let mut results = Vec::with_capacity(variables.len());

        for (name, values) in variables.iter().zip(&columns) {
            let current = &self.features_bins[name];
            let has_missing_bin = current.has_missing_bin;
            let bins_before = current.ordinary_bins().len();

            // Drop rows held by the missing bin
            let keep: Vec<bool> = match (has_missing_bin, current.bins.first()) {
                (true, Some(missing)) => (0..values.len())
                    .map(|i| !missing.contains(values, i))
                    .collect(),
                _ => vec![true; values.len()],
            };
            let work_values = values.filter(&keep);
            let work_labels: Vec<i32> = labels
                .iter()
                .zip(&keep)
                .filter(|(_, k)| **k)
                .map(|(y, _)| *y)
                .collect();

            let mut bins = current.ordinary_bins().to_vec();
            let mut woes = current.ordinary_woes().to_vec();
            let missing_bin = if has_missing_bin { current.bins.first().cloned() } else { None };

            let merges = trim_monotonic(&mut bins, &mut woes, |merged| {
                let (mut bad, mut good) = (0u64, 0u64);
                for (idx, &label) in work_labels.iter().enumerate() {
                    if merged.contains(&work_values, idx) {
                        if label == 1 {
                            bad += 1;
                        } else {
                            good += 1;
                        }
                    }
                }
                Ok(woe_single(total_bad as f64, total_good as f64, bad as f64, good as f64))
            })?;

            let bins_after = bins.len();
            let mut rebuilt = Vec::with_capacity(bins.len() + 1);
            rebuilt.extend(missing_bin);
            rebuilt.extend(bins);

            let binning = self.score_bins(values, &labels, rebuilt, has_missing_bin);
            self.store(name, binning);

            results.push(TrimResult {
                feature: name.clone(),
                merges,
                bins_before,
                bins_after,
            });
        }

        Ok(results)
    }

    /// Replace each value by the WoE of the bin that contains it
    ///
    /// Returns a frame with one Float64 column per variable. Values outside
    /// every bin (e.g. categories unseen during fit) map to 0.0.
    pub fn transform(&self, df: &DataFrame, variables: &[String]) -> BinningResult<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(variables.len());

        for name in variables {
            let binning = self
                .features_bins
                .get(name)
                .ok_or_else(|| BinningError::FeatureNotBinned(name.clone()))?;
            let values = extract_feature_values(df, name, binning.feature_type)?;
            let encoded: Vec<f64> = (0..values.len()).map(|i| binning.woe_of(&values, i)).collect();
            columns.push(Column::new(name.as_str().into(), encoded));
        }

        Ok(DataFrame::new(columns)?)
    }
}

/// Bins of one variable before scoring
struct AssembledBins {
    bins: Vec<Bin>,
    has_missing_bin: bool,
}
