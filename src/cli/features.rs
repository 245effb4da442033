//! Per-variable declarations from the command line and a JSON features file
//!
//! The features file looks like:
//!
//! ```json
//! {
//!   "features": {
//!     "age":  { "kind": "numeric", "missing": [-999] },
//!     "city": { "kind": "categorical", "missing": ["NA", "unknown"] }
//!   }
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::args::Cli;
use crate::pipeline::FeatureSpec;

/// Contents of a features file
#[derive(Debug, Default, Deserialize)]
pub struct FeaturesFile {
    #[serde(default)]
    pub features: BTreeMap<String, FeatureSpec>,
}

/// Read and parse a features file
pub fn load_features_file(path: &Path) -> Result<FeaturesFile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read features file: {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse features file: {}", path.display()))
}

/// Build the declaration of every variable to bin
///
/// Global --missing markers and --categorical overrides apply first; entries
/// of the features file replace them for the variables they name.
pub fn build_feature_specs(
    cli: &Cli,
    variables: &[String],
) -> Result<HashMap<String, FeatureSpec>> {
    let markers = cli.missing_markers();
    let mut specs: HashMap<String, FeatureSpec> = variables
        .iter()
        .map(|name| {
            let spec = FeatureSpec {
                kind: cli.kind_override(name),
                missing: markers.clone(),
            };
            (name.clone(), spec)
        })
        .collect();

    if let Some(path) = &cli.features_config {
        let file = load_features_file(path)?;
        for (name, declared) in file.features {
            let entry = specs.entry(name).or_default();
            if declared.kind.is_some() {
                entry.kind = declared.kind;
            }
            if !declared.missing.is_empty() {
                entry.missing = declared.missing;
            }
        }
    }

    Ok(specs)
}

/// Resolve the variables to bin: the explicit list, or every non-target column
pub fn resolve_variables(cli: &Cli, columns: &[String]) -> Vec<String> {
    if cli.variables.is_empty() {
        columns
            .iter()
            .filter(|c| **c != cli.target)
            .cloned()
            .collect()
    } else {
        cli.variables
            .iter()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect()
    }
}
