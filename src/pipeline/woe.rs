//! Weight of Evidence (WoE) and Information Value (IV) calculation
//!
//! Uses the ln(%bad/%good) convention where:
//! - WoE > 0 indicates higher risk (more bads than the population share)
//! - WoE < 0 indicates lower risk
//!
//! Zero-count bins are smoothed with a tiny additive constant instead of being
//! rejected, so a bin without bads (or goods) yields a large but finite WoE.

/// Smoothing constant to avoid log(0) and division by zero
pub const SMOOTHING: f64 = 1e-6;

/// Number of decimal places the IV is rounded to
const IV_DECIMALS: i32 = 6;

/// Share of the bad and good populations that fall into one bin
#[inline]
fn distributions(bad: f64, good: f64, total_bad: f64, total_good: f64) -> (f64, f64) {
    let dist_bad = (bad + SMOOTHING) / (total_bad + SMOOTHING);
    let dist_good = (good + SMOOTHING) / (total_good + SMOOTHING);
    (dist_bad, dist_good)
}

/// WoE of a single bin given its bad/good counts and the population totals
pub fn woe_single(total_bad: f64, total_good: f64, bad: f64, good: f64) -> f64 {
    let (dist_bad, dist_good) = distributions(bad, good, total_bad, total_good);
    (dist_bad / dist_good).ln()
}

/// WoE for every bin given parallel bad/good count slices
pub fn woe_all(total_bad: f64, total_good: f64, bads: &[f64], goods: &[f64]) -> Vec<f64> {
    bads.iter()
        .zip(goods)
        .map(|(&b, &g)| woe_single(total_bad, total_good, b, g))
        .collect()
}

/// Compute per-bin WoE values and the variable-level IV
///
/// IV = Σ (%bad - %good) * WoE, rounded to 6 decimal places.
///
/// # Arguments
/// * `total_bad` - Total bad count (label = 1) of the population
/// * `total_good` - Total good count (label = 0) of the population
/// * `bads` - Bad count per bin
/// * `goods` - Good count per bin, same length as `bads`
pub fn woe_iv(total_bad: f64, total_good: f64, bads: &[f64], goods: &[f64]) -> (Vec<f64>, f64) {
    let woes = woe_all(total_bad, total_good, bads, goods);

    let iv: f64 = bads
        .iter()
        .zip(goods)
        .zip(&woes)
        .map(|((&b, &g), &woe)| {
            let (dist_bad, dist_good) = distributions(b, g, total_bad, total_good);
            (dist_bad - dist_good) * woe
        })
        .sum();

    (woes, round_to(iv, IV_DECIMALS))
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
