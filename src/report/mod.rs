//! Report module - binning tables, exports and console summaries

pub mod binning_report;
pub mod summary;

pub use binning_report::*;
pub use summary::*;
