//! Pipeline module - missing isolation, threshold search, WoE/IV scoring and trimming

pub mod binner;
pub mod bins;
pub mod encode;
pub mod error;
pub mod features;
pub mod loader;
pub mod metrics;
pub mod missing;
pub mod strategy;
pub mod target;
pub mod trim;
pub mod woe;

pub use binner::*;
pub use bins::*;
pub use encode::*;
pub use error::*;
pub use features::*;
pub use loader::*;
pub use metrics::*;
pub use missing::*;
pub use strategy::{
    validate_coverage, validate_thresholds, BinThresholdFinder, BinningStrategy,
    CartThresholdFinder, QuantileThresholdFinder, StrategyConfig,
};
pub use target::*;
pub use trim::*;
pub use woe::*;
