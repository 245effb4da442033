//! Integration tests for fitting and applying a binning

use polars::prelude::*;
use woebin::pipeline::{
    Bin, Binner, BinnerConfig, BinningError, BinningStrategy, FeatureSpec, FeatureType,
    MissingMarker,
};

#[path = "common/mod.rs"]
mod common;

use common::*;

fn cart(config: BinnerConfig) -> Binner {
    Binner::with_strategy(BinningStrategy::Cart, config).unwrap()
}

#[test]
fn test_separable_variable_splits_once() {
    let df = create_separable_dataframe();
    let mut binner = cart(BinnerConfig::default());

    binner.fit(&df, "target", &vars(&["x"])).unwrap();

    let fb = binner.feature_binning("x").unwrap();
    assert_eq!(
        fb.bins,
        vec![
            Bin::interval(f64::NEG_INFINITY, 10.5),
            Bin::interval(10.5, f64::INFINITY)
        ]
    );
    assert_eq!(fb.counts, vec![10, 10]);
    assert_eq!(fb.bads, vec![0, 10]);
    assert!(fb.woes[0] < 0.0 && fb.woes[1] > 0.0);
    assert!(fb.iv > 1.0, "perfect separation should have a large IV, got {}", fb.iv);
    assert!(!fb.has_missing_bin);
}

#[test]
fn test_counts_cover_every_row() {
    let df = create_separable_dataframe();
    let mut binner =
        Binner::with_strategy(BinningStrategy::Quantile, BinnerConfig::default()).unwrap();

    binner.fit(&df, "target", &vars(&["x", "noise"])).unwrap();

    for (name, fb) in binner.features_bins() {
        assert_eq!(fb.counts.iter().sum::<u64>(), 20, "{} loses rows", name);
        assert_eq!(fb.bads.iter().sum::<u64>(), 10, "{} loses bads", name);
        assert!(fb.bins.len() <= 5);
    }
}

#[test]
fn test_fit_order_and_iv_ranking() {
    let df = create_separable_dataframe();
    let mut binner = cart(BinnerConfig::default());

    binner.fit(&df, "target", &vars(&["noise", "x"])).unwrap();

    let order: Vec<&str> = binner.features_bins().map(|(name, _)| name).collect();
    assert_eq!(order, vec!["noise", "x"]);

    let ranking = binner.iv_ranking();
    assert_eq!(ranking[0].0, "x");
    assert!(ranking[0].1 > ranking[1].1);
}

#[test]
fn test_sentinel_gets_missing_bin() {
    let df = create_sentinel_dataframe();
    let mut binner = cart(BinnerConfig::default()).with_feature(
        "x",
        FeatureSpec::new(FeatureType::Numeric).with_missing(vec![
            MissingMarker::Number(-999.0),
            MissingMarker::Number(-1.0),
        ]),
    );

    binner.fit(&df, "target", &vars(&["x"])).unwrap();

    let fb = binner.feature_binning("x").unwrap();
    assert!(fb.has_missing_bin);
    // Only markers that occur are kept
    assert_eq!(fb.bins[0], Bin::Missing(vec![MissingMarker::Number(-999.0)]));
    assert_eq!(fb.counts[0], 5);
    assert_eq!(fb.bads[0], 5);
    assert_eq!(fb.counts.iter().sum::<u64>(), 20);

    // Ordinary bins start from the working set, not from the sentinel
    match fb.ordinary_bins()[0] {
        Bin::Interval { lower, upper } => {
            assert_eq!(lower, f64::NEG_INFINITY);
            assert!((upper - 7.5).abs() < 1e-12);
        }
        ref other => panic!("expected interval, got {}", other),
    }
}

#[test]
fn test_rare_sentinel_stays_in_working_set() {
    let df = create_sentinel_dataframe();
    // 5 sentinel rows do not exceed 0.3 * 20 = 6
    let config = BinnerConfig {
        min_samples_leaf: 0.3,
        ..BinnerConfig::default()
    };
    let mut binner = cart(config).with_feature(
        "x",
        FeatureSpec::default().with_missing(vec![MissingMarker::Number(-999.0)]),
    );

    binner.fit(&df, "target", &vars(&["x"])).unwrap();

    let fb = binner.feature_binning("x").unwrap();
    assert!(!fb.has_missing_bin);
    assert!(fb.bins.iter().all(|b| !b.is_missing()));
    assert_eq!(fb.counts.iter().sum::<u64>(), 20);
}

#[test]
fn test_categorical_bins_partition_categories() {
    let df = create_categorical_dataframe();
    let mut binner = cart(BinnerConfig::default());

    binner.fit(&df, "target", &vars(&["city"])).unwrap();

    let fb = binner.feature_binning("city").unwrap();
    assert_eq!(fb.feature_type, FeatureType::Categorical);
    assert_eq!(fb.counts.iter().sum::<u64>(), 20);

    for city in ["A", "B", "C", "D"] {
        let holders = fb.bins.iter().filter(|b| b.contains_category(city)).count();
        assert_eq!(holders, 1, "category {} must be in exactly one bin", city);
    }

    let bin_of = |c: &str| fb.bins.iter().position(|b| b.contains_category(c)).unwrap();
    assert_ne!(bin_of("A"), bin_of("C"));
    // Ordered by ascending WoE: the all-good category comes first
    assert!(fb.woes[bin_of("C")] < fb.woes[bin_of("A")]);
}

#[test]
fn test_numeric_column_declared_categorical() {
    let df = df! {
        "target" => [1i32, 1, 0, 0, 1, 0, 0, 0],
        "grade" => [1i64, 1, 2, 2, 3, 3, 3, 2],
    }
    .unwrap();
    let mut binner = cart(BinnerConfig::default())
        .with_feature("grade", FeatureSpec::new(FeatureType::Categorical));

    binner.fit(&df, "target", &vars(&["grade"])).unwrap();

    let fb = binner.feature_binning("grade").unwrap();
    assert_eq!(fb.feature_type, FeatureType::Categorical);
    assert!(fb.bins.iter().all(|b| matches!(b, Bin::Categories(_))));
}

#[test]
fn test_non_binary_target_rejected() {
    let df = df! {
        "target" => [0i32, 1, 2, 1],
        "x" => [1.0f64, 2.0, 3.0, 4.0],
    }
    .unwrap();
    let mut binner = cart(BinnerConfig::default());

    let err = binner.fit(&df, "target", &vars(&["x"])).unwrap_err();
    assert!(matches!(err, BinningError::PreconditionViolation(_)));
    assert!(binner.features_bins().next().is_none());
}

#[test]
fn test_null_values_rejected_before_binning() {
    let df = df! {
        "target" => [0i32, 1, 0, 1],
        "a" => [1.0f64, 2.0, 3.0, 4.0],
        "b" => [Some(1.0f64), None, Some(3.0), Some(4.0)],
    }
    .unwrap();
    let mut binner = cart(BinnerConfig::default());

    let err = binner.fit(&df, "target", &vars(&["a", "b"])).unwrap_err();
    assert!(matches!(err, BinningError::PreconditionViolation(_)));
    // Validation runs before any variable is binned
    assert!(binner.feature_binning("a").is_none());
}

#[test]
fn test_unknown_column() {
    let df = create_separable_dataframe();
    let mut binner = cart(BinnerConfig::default());

    let err = binner.fit(&df, "target", &vars(&["nope"])).unwrap_err();
    assert!(matches!(err, BinningError::ColumnNotFound(_)));

    let err = binner.fit(&df, "missing_target", &vars(&["x"])).unwrap_err();
    assert!(matches!(err, BinningError::ColumnNotFound(_)));
}

#[test]
fn test_invalid_config_rejected() {
    let config = BinnerConfig {
        min_samples_leaf: 0.0,
        ..BinnerConfig::default()
    };
    let err = Binner::with_strategy(BinningStrategy::Cart, config).unwrap_err();
    assert!(matches!(err, BinningError::InvalidConfig(_)));
}

#[test]
fn test_invalid_thresholds_rejected() {
    let df = create_separable_dataframe();
    let mut binner =
        Binner::new(Box::new(FixedCuts(vec![5.0])), BinnerConfig::default()).unwrap();

    let err = binner.fit(&df, "target", &vars(&["x"])).unwrap_err();
    assert!(matches!(err, BinningError::InvalidThresholds { .. }));
}

#[test]
fn test_cut_points_must_cover_values() {
    // x runs 1..=20; (0, 15] leaves 16..=20 outside every bin
    let df = create_separable_dataframe();
    let cuts = vec![0.0, 5.0, 15.0];
    let mut binner = Binner::new(Box::new(FixedCuts(cuts)), BinnerConfig::default()).unwrap();

    let err = binner.fit(&df, "target", &vars(&["x"])).unwrap_err();
    assert!(matches!(err, BinningError::InvalidThresholds { ref feature, .. } if feature == "x"));
    assert!(binner.feature_binning("x").is_none());

    // Covering finite ends are accepted and keep every row
    let cuts = vec![0.0, 10.5, 20.0];
    let mut binner = Binner::new(Box::new(FixedCuts(cuts)), BinnerConfig::default()).unwrap();
    binner.fit(&df, "target", &vars(&["x"])).unwrap();
    let fb = binner.feature_binning("x").unwrap();
    assert_eq!(fb.counts, vec![10, 10]);
}

#[test]
fn test_categorical_cut_points_must_cover_ranks() {
    let df = create_categorical_dataframe();
    // Ranks start at 0, so a lower edge of 0 drops the lowest-WoE city
    let cuts = vec![0.0, f64::INFINITY];
    let mut binner = Binner::new(Box::new(FixedCuts(cuts)), BinnerConfig::default()).unwrap();

    let err = binner.fit(&df, "target", &vars(&["city"])).unwrap_err();
    assert!(matches!(err, BinningError::InvalidThresholds { .. }));
}

#[test]
fn test_ks_and_gini_attached_on_request() {
    let df = create_separable_dataframe();
    let config = BinnerConfig {
        is_ks: true,
        is_gini: true,
        ..BinnerConfig::default()
    };
    let mut binner = cart(config);

    binner.fit(&df, "target", &vars(&["x"])).unwrap();

    let fb = binner.feature_binning("x").unwrap();
    assert!((fb.ks.unwrap() - 1.0).abs() < 1e-9);
    assert!((fb.gini.unwrap() - 1.0).abs() < 1e-9);

    let mut plain = cart(BinnerConfig::default());
    plain.fit(&df, "target", &vars(&["x"])).unwrap();
    assert!(plain.feature_binning("x").unwrap().ks.is_none());
}

#[test]
fn test_refit_replaces_state() {
    let df = create_separable_dataframe();
    let mut binner = cart(BinnerConfig::default());

    binner.fit(&df, "target", &vars(&["x"])).unwrap();
    binner.fit(&df, "target", &vars(&["x", "noise"])).unwrap();

    assert_eq!(binner.features_bins().count(), 2);
    assert_eq!(binner.report().rows_for("x").count(), 2);
}

#[test]
fn test_transform_maps_values_to_woe() {
    let df = create_separable_dataframe();
    let mut binner = cart(BinnerConfig::default());
    binner.fit(&df, "target", &vars(&["x"])).unwrap();

    let encoded = binner.transform(&df, &vars(&["x"])).unwrap();
    let fb = binner.feature_binning("x").unwrap();
    let col: Vec<f64> = encoded
        .column("x")
        .unwrap()
        .f64()
        .unwrap()
        .into_no_null_iter()
        .collect();

    assert_eq!(col.len(), 20);
    assert!(col[..10].iter().all(|w| *w == fb.woes[0]));
    assert!(col[10..].iter().all(|w| *w == fb.woes[1]));
}

#[test]
fn test_transform_requires_fit() {
    let df = create_separable_dataframe();
    let binner = cart(BinnerConfig::default());

    let err = binner.transform(&df, &vars(&["x"])).unwrap_err();
    assert!(matches!(err, BinningError::FeatureNotBinned(_)));
}

#[test]
fn test_large_random_dataset() {
    let df = create_large_test_dataframe(2_000, 3);
    let mut binner = cart(BinnerConfig::default());

    binner
        .fit(&df, "target", &vars(&["feature_0", "feature_1", "feature_2"]))
        .unwrap();

    for (_, fb) in binner.features_bins() {
        assert!(fb.bins.len() <= 5);
        assert_eq!(fb.counts.iter().sum::<u64>(), 2_000);
        // Every bin respects the minimum leaf size of 5% of 2000
        assert!(fb.counts.iter().all(|c| *c >= 100));
    }
}
