//! Feature declarations and raw value extraction
//!
//! A variable is either numeric or categorical and may declare a list of
//! missing-value markers (sentinels such as `-999` or `"unknown"`). Values are
//! pulled out of a polars `DataFrame` into plain vectors; nulls are rejected
//! because declared missingness must be expressed through markers.

use std::fmt;

use polars::prelude::*;
use serde::{Deserialize, Serialize, Serializer};

use super::error::{BinningError, BinningResult};

/// Feature type for binning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureType {
    Numeric,
    Categorical,
}

impl FeatureType {
    /// Infer the feature type from a polars dtype
    pub fn infer(dtype: &DataType) -> Self {
        if dtype.is_primitive_numeric() {
            FeatureType::Numeric
        } else {
            FeatureType::Categorical
        }
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureType::Numeric => write!(f, "numeric"),
            FeatureType::Categorical => write!(f, "categorical"),
        }
    }
}

impl std::str::FromStr for FeatureType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "numeric" | "num" => Ok(FeatureType::Numeric),
            "categorical" | "cat" => Ok(FeatureType::Categorical),
            _ => Err(format!(
                "Unknown feature type: '{}'. Use 'numeric' or 'categorical'.",
                s
            )),
        }
    }
}

/// A sentinel value that marks an observation as declared-missing
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MissingMarker {
    Number(f64),
    Text(String),
}

impl MissingMarker {
    /// Parse a marker given on the command line; numeric text becomes `Number`
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(v) => MissingMarker::Number(v),
            Err(_) => MissingMarker::Text(raw.to_string()),
        }
    }

    /// Whether a numeric observation equals this marker
    pub fn matches_number(&self, value: f64) -> bool {
        match self {
            MissingMarker::Number(m) => *m == value,
            MissingMarker::Text(s) => s.trim().parse::<f64>().map_or(false, |m| m == value),
        }
    }

    /// Whether a categorical observation equals this marker
    pub fn matches_category(&self, value: &str) -> bool {
        match self {
            MissingMarker::Text(s) => s == value,
            MissingMarker::Number(m) => {
                value == m.to_string() || value.trim().parse::<f64>().map_or(false, |v| v == *m)
            }
        }
    }
}

impl fmt::Display for MissingMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingMarker::Number(v) => write!(f, "{}", v),
            MissingMarker::Text(s) => write!(f, "{}", s),
        }
    }
}

impl Serialize for MissingMarker {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MissingMarker::Number(v) => serializer.serialize_f64(*v),
            MissingMarker::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// Declared kind and missing markers of a single variable
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpec {
    /// Declared kind; inferred from the column dtype when absent
    #[serde(default)]
    pub kind: Option<FeatureType>,
    /// Sentinel values treated as declared-missing
    #[serde(default)]
    pub missing: Vec<MissingMarker>,
}

impl FeatureSpec {
    pub fn new(kind: FeatureType) -> Self {
        Self {
            kind: Some(kind),
            missing: Vec::new(),
        }
    }

    pub fn with_missing(mut self, missing: Vec<MissingMarker>) -> Self {
        self.missing = missing;
        self
    }
}

/// Raw values of one variable
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValues {
    Numeric(Vec<f64>),
    Categorical(Vec<String>),
}

impl FeatureValues {
    pub fn len(&self) -> usize {
        match self {
            FeatureValues::Numeric(v) => v.len(),
            FeatureValues::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn feature_type(&self) -> FeatureType {
        match self {
            FeatureValues::Numeric(_) => FeatureType::Numeric,
            FeatureValues::Categorical(_) => FeatureType::Categorical,
        }
    }

    /// Whether the observation at `idx` matches any of the markers
    pub fn is_marker(&self, idx: usize, markers: &[MissingMarker]) -> bool {
        match self {
            FeatureValues::Numeric(v) => markers.iter().any(|m| m.matches_number(v[idx])),
            FeatureValues::Categorical(v) => markers.iter().any(|m| m.matches_category(&v[idx])),
        }
    }

    /// Keep only the observations whose mask entry is true
    pub fn filter(&self, keep: &[bool]) -> FeatureValues {
        match self {
            FeatureValues::Numeric(v) => FeatureValues::Numeric(
                v.iter()
                    .zip(keep)
                    .filter(|(_, k)| **k)
                    .map(|(x, _)| *x)
                    .collect(),
            ),
            FeatureValues::Categorical(v) => FeatureValues::Categorical(
                v.iter()
                    .zip(keep)
                    .filter(|(_, k)| **k)
                    .map(|(x, _)| x.clone())
                    .collect(),
            ),
        }
    }
}

/// Resolve the feature type of a column: explicit declaration wins over the dtype
pub fn resolve_feature_type(
    df: &DataFrame,
    col_name: &str,
    spec: Option<&FeatureSpec>,
) -> BinningResult<FeatureType> {
    if let Some(kind) = spec.and_then(|s| s.kind) {
        return Ok(kind);
    }
    let col = df
        .column(col_name)
        .map_err(|_| BinningError::ColumnNotFound(col_name.to_string()))?;
    Ok(FeatureType::infer(col.dtype()))
}

/// Extract a variable's values as the requested feature type
///
/// Nulls (and NaN for float columns) are a `PreconditionViolation`: missing
/// observations must be encoded with declared markers before binning.
pub fn extract_feature_values(
    df: &DataFrame,
    col_name: &str,
    kind: FeatureType,
) -> BinningResult<FeatureValues> {
    let col = df
        .column(col_name)
        .map_err(|_| BinningError::ColumnNotFound(col_name.to_string()))?;

    if col.null_count() > 0 {
        return Err(BinningError::PreconditionViolation(format!(
            "column '{}' contains {} null value(s) not covered by missing markers",
            col_name,
            col.null_count()
        )));
    }

    match kind {
        FeatureType::Numeric => {
            let float_col = col.cast(&DataType::Float64)?;
            let values: Vec<f64> = float_col
                .f64()?
                .into_iter()
                .map(|v| v.filter(|x| !x.is_nan()))
                .collect::<Option<Vec<f64>>>()
                .ok_or_else(|| {
                    BinningError::PreconditionViolation(format!(
                        "column '{}' contains NaN or non-numeric values",
                        col_name
                    ))
                })?;
            Ok(FeatureValues::Numeric(values))
        }
        FeatureType::Categorical => Ok(FeatureValues::Categorical(column_to_strings(
            col, col_name,
        )?)),
    }
}

/// Convert a column to its string representation for categorical binning
fn column_to_strings(col: &Column, col_name: &str) -> BinningResult<Vec<String>> {
    let values: Vec<Option<String>> = match col.dtype() {
        DataType::String => col
            .str()?
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect(),
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => {
            let cast = col.cast(&DataType::Int64)?;
            cast.i64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 => {
            let cast = col.cast(&DataType::UInt64)?;
            cast.u64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::Float32 | DataType::Float64 => {
            let cast = col.cast(&DataType::Float64)?;
            cast.f64()?
                .into_iter()
                .map(|v| v.map(|n| format!("{}", n)))
                .collect()
        }
        DataType::Boolean => col
            .bool()?
            .into_iter()
            .map(|v| v.map(|b| b.to_string()))
            .collect(),
        _ => {
            let cast = col.cast(&DataType::String)?;
            cast.str()?
                .into_iter()
                .map(|v| v.map(|s| s.to_string()))
                .collect()
        }
    };

    values.into_iter().collect::<Option<Vec<String>>>().ok_or_else(|| {
        BinningError::PreconditionViolation(format!(
            "column '{}' could not be read as categorical values",
            col_name
        ))
    })
}
