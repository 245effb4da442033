//! Error types for the binning pipeline.

use thiserror::Error;

/// Errors raised while fitting, trimming, or applying a binning.
///
/// Zero-count bins are not an error: the WoE smoothing constant keeps their
/// statistics finite.
#[derive(Debug, Error)]
pub enum BinningError {
    /// Input data does not satisfy the preconditions of `fit`.
    ///
    /// Raised for a non-binary label, nulls outside declared missing markers,
    /// empty inputs, or label/value length mismatches.
    #[error("precondition violated: {0}")]
    PreconditionViolation(String),

    /// A binning strategy was requested by a name that has no implementation.
    #[error("unknown binning strategy '{0}'. Use 'cart' or 'quantile'")]
    UnknownStrategy(String),

    /// A strategy returned cut points that break the threshold contract.
    #[error("strategy returned invalid cut points for '{feature}': {reason}")]
    InvalidThresholds {
        /// Variable being binned
        feature: String,
        /// What was wrong with the cut points
        reason: String,
    },

    /// Binner configuration is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Trim or transform requested for a variable that was never fitted.
    #[error("feature '{0}' has not been binned; call fit first")]
    FeatureNotBinned(String),

    /// Requested column does not exist in the dataset.
    #[error("column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Underlying polars failure while reading columns.
    #[error(transparent)]
    Polars(#[from] polars::prelude::PolarsError),
}

/// Result alias for binning operations
pub type BinningResult<T> = std::result::Result<T, BinningError>;
