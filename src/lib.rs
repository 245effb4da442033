//! woebin: Weight of Evidence binning library
//!
//! Discretizes numeric and categorical variables against a binary target,
//! scores the bins with WoE/IV and optionally merges them until the WoE
//! sequence is monotonic.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
