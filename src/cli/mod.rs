//! CLI module - argument parsing and variable declarations

pub mod args;
pub mod features;

pub use args::Cli;
pub use features::{build_feature_specs, load_features_file, resolve_variables, FeaturesFile};
