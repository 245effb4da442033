//! Discrimination metrics for a scored variable
//!
//! Scores are expected to rise with risk, so a variable whose higher values
//! carry more bads has a positive Gini.

/// Values closer than this are treated as ties
const TIE_EPSILON: f64 = 1e-10;

fn sorted_by_score(labels: &[i32], scores: &[f64]) -> Vec<(f64, i32)> {
    let mut pairs: Vec<(f64, i32)> = scores.iter().copied().zip(labels.iter().copied()).collect();
    pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    pairs
}

/// Calculate AUC using the Mann-Whitney U statistic with tie-averaged ranks
fn calculate_auc(sorted_pairs: &[(f64, i32)]) -> f64 {
    let total_pos = sorted_pairs.iter().filter(|(_, t)| *t == 1).count() as f64;
    let total_neg = sorted_pairs.len() as f64 - total_pos;

    if total_pos <= 0.0 || total_neg <= 0.0 {
        return 0.5;
    }

    let n = sorted_pairs.len();
    let mut rank_sum_pos = 0.0;
    let mut i = 0;

    while i < n {
        let current_value = sorted_pairs[i].0;
        let mut j = i;

        while j < n && (sorted_pairs[j].0 - current_value).abs() < TIE_EPSILON {
            j += 1;
        }

        // 1-based ranks i+1..=j share their average
        let avg_rank = (i + 1 + j) as f64 / 2.0;
        let positives = sorted_pairs[i..j].iter().filter(|(_, t)| *t == 1).count() as f64;
        rank_sum_pos += avg_rank * positives;

        i = j;
    }

    let u = rank_sum_pos - total_pos * (total_pos + 1.0) / 2.0;
    (u / (total_pos * total_neg)).clamp(0.0, 1.0)
}

/// Gini coefficient (2 * AUC - 1) of `scores` against the binary label
pub fn calc_gini(labels: &[i32], scores: &[f64]) -> f64 {
    let pairs = sorted_by_score(labels, scores);
    2.0 * calculate_auc(&pairs) - 1.0
}

/// Kolmogorov-Smirnov statistic and the score threshold where it peaks
///
/// KS = max over thresholds t of |CDF_bad(t) - CDF_good(t)|.
pub fn calc_ks(labels: &[i32], scores: &[f64]) -> (f64, f64) {
    let pairs = sorted_by_score(labels, scores);
    let total_bad = pairs.iter().filter(|(_, t)| *t == 1).count() as f64;
    let total_good = pairs.len() as f64 - total_bad;

    if total_bad <= 0.0 || total_good <= 0.0 {
        return (0.0, f64::NAN);
    }

    let mut cum_bad = 0.0;
    let mut cum_good = 0.0;
    let mut best = (0.0, f64::NAN);
    let n = pairs.len();

    for (i, &(score, label)) in pairs.iter().enumerate() {
        if label == 1 {
            cum_bad += 1.0;
        } else {
            cum_good += 1.0;
        }

        // Evaluate only at the end of a tie group
        let group_ends = i + 1 == n || (pairs[i + 1].0 - score).abs() >= TIE_EPSILON;
        if !group_ends {
            continue;
        }

        let gap = (cum_bad / total_bad - cum_good / total_good).abs();
        if gap > best.0 {
            best = (gap, score);
        }
    }

    best
}
