//! WoE monotonicity trimming
//!
//! A WoE sequence is monotonic when no interior bin is a strict local
//! extremum. Trimming repeatedly merges the first bin that breaks the
//! expected direction into its predecessor until the sequence is monotonic or
//! only two bins remain.
//!
//! The direction is read from the first WoE: a positive start is expected to
//! decrease, a negative start to increase. A start of exactly zero stops the
//! loop and the sequence is accepted as is.

use super::bins::Bin;
use super::error::BinningResult;

/// Sequences of this length or shorter are monotonic by construction
const MIN_BINS: usize = 2;

/// Number of interior bins whose WoE is a strict local extremum
pub fn count_inflexions(woes: &[f64]) -> usize {
    if woes.len() <= MIN_BINS {
        return 0;
    }
    woes.windows(3)
        .filter(|w| (w[1] - w[0]) * (w[1] - w[2]) > 0.0)
        .count()
}

/// Expected WoE direction, read from the sign of the first bin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WoeDirection {
    Decreasing,
    Increasing,
}

impl WoeDirection {
    /// `None` when the first WoE is exactly zero (or the sequence is empty)
    pub fn from_first(woes: &[f64]) -> Option<Self> {
        match woes.first() {
            Some(&w) if w > 0.0 => Some(WoeDirection::Decreasing),
            Some(&w) if w < 0.0 => Some(WoeDirection::Increasing),
            _ => None,
        }
    }
}

/// Index of the first bin that breaks the expected direction
///
/// Returns `i + 1` for the first pair `(i, i + 1)` moving against the
/// direction, so the result is always at least 1.
pub fn first_violation(woes: &[f64]) -> Option<usize> {
    let direction = WoeDirection::from_first(woes)?;
    woes.windows(2)
        .position(|w| match direction {
            WoeDirection::Decreasing => w[0] < w[1],
            WoeDirection::Increasing => w[0] > w[1],
        })
        .map(|i| i + 1)
}

/// Merge bin `idx` into bin `idx - 1`, assigning the merged WoE from `recompute`
///
/// `recompute` receives the merged bin and must return its WoE computed from
/// the underlying observations.
pub fn merge_backward<F>(
    bins: &mut Vec<Bin>,
    woes: &mut Vec<f64>,
    idx: usize,
    recompute: &mut F,
) -> BinningResult<()>
where
    F: FnMut(&Bin) -> BinningResult<f64>,
{
    let mut merged = bins[idx - 1].clone();
    merged.absorb(&bins[idx])?;
    let woe = recompute(&merged)?;

    bins[idx - 1] = merged;
    woes[idx - 1] = woe;
    bins.remove(idx);
    woes.remove(idx);
    Ok(())
}

/// Merge bins until the WoE sequence is monotonic or two bins remain
///
/// `bins` and `woes` must be parallel and exclude any missing bin. Returns the
/// number of merges performed. If `recompute` fails the sequences keep the
/// state of the last successful merge.
pub fn trim_monotonic<F>(
    bins: &mut Vec<Bin>,
    woes: &mut Vec<f64>,
    mut recompute: F,
) -> BinningResult<usize>
where
    F: FnMut(&Bin) -> BinningResult<f64>,
{
    let mut merges = 0;

    while count_inflexions(woes) > 0 {
        let Some(idx) = first_violation(woes) else {
            break;
        };

        merge_backward(bins, woes, idx, &mut recompute)?;
        merges += 1;

        if woes.len() <= MIN_BINS {
            break;
        }
    }

    Ok(merges)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intervals(n: usize) -> Vec<Bin> {
        (0..n)
            .map(|i| {
                let lower = if i == 0 { f64::NEG_INFINITY } else { i as f64 };
                let upper = if i + 1 == n { f64::INFINITY } else { (i + 1) as f64 };
                Bin::interval(lower, upper)
            })
            .collect()
    }

    #[test]
    fn test_count_inflexions() {
        assert_eq!(count_inflexions(&[]), 0);
        assert_eq!(count_inflexions(&[1.0, -1.0]), 0);
        assert_eq!(count_inflexions(&[1.0, -0.5, 0.8, -0.2]), 2);
        assert_eq!(count_inflexions(&[1.0, 0.5, 0.0, -0.2]), 0);
        // Plateaus are not strict extrema
        assert_eq!(count_inflexions(&[1.0, 1.0, 0.5]), 0);
    }

    #[test]
    fn test_first_violation_direction() {
        // Positive start: expect decreasing, first ascent at 1 -> 2
        assert_eq!(first_violation(&[1.0, -0.5, 0.8, -0.2]), Some(2));
        // Negative start: expect increasing, first descent at 1 -> 2
        assert_eq!(first_violation(&[-1.0, 0.5, -0.3]), Some(2));
        // Zero start: ambiguous
        assert_eq!(first_violation(&[0.0, 0.5, -0.3]), None);
        assert_eq!(first_violation(&[1.0, 0.5, 0.2]), None);
    }

    #[test]
    fn test_single_merge_reduces_inflexions() {
        let mut bins = intervals(4);
        let mut woes = vec![1.0, -0.5, 0.8, -0.2];
        let before = count_inflexions(&woes);

        let idx = first_violation(&woes).unwrap();
        merge_backward(&mut bins, &mut woes, idx, &mut |_: &Bin| Ok(0.15)).unwrap();

        assert_eq!(woes, vec![1.0, 0.15, -0.2]);
        assert_eq!(bins[1], Bin::interval(1.0, 3.0));
        assert!(count_inflexions(&woes) < before);
    }

    #[test]
    fn test_trim_stops_at_two_bins() {
        let mut bins = intervals(5);
        let mut woes = vec![0.5, -0.4, 0.6, -0.7, 0.9];

        // Recompute keeps producing a zig-zag
        let mut flip = 1.0;
        let merges = trim_monotonic(&mut bins, &mut woes, |_| {
            flip = -flip;
            Ok(flip)
        })
        .unwrap();

        assert!(merges >= 1);
        assert!(woes.len() >= 2);
        assert_eq!(bins.len(), woes.len());
        assert!(woes.len() <= 2 || count_inflexions(&woes) == 0);
    }

    #[test]
    fn test_trim_is_noop_on_monotonic() {
        let mut bins = intervals(4);
        let mut woes = vec![0.9, 0.3, -0.1, -0.8];
        let merges = trim_monotonic(&mut bins, &mut woes, |_| Ok(0.0)).unwrap();
        assert_eq!(merges, 0);
        assert_eq!(bins.len(), 4);
    }

    #[test]
    fn test_trim_zero_start_is_accepted() {
        let mut bins = intervals(4);
        let mut woes = vec![0.0, 0.5, -0.5, 0.5];
        let merges = trim_monotonic(&mut bins, &mut woes, |_| Ok(0.0)).unwrap();
        assert_eq!(merges, 0);
        assert_eq!(count_inflexions(&woes), 2);
    }

    #[test]
    fn test_trim_categories_union() {
        let mut bins = vec![
            Bin::Categories(vec!["a".into()]),
            Bin::Categories(vec!["b".into()]),
            Bin::Categories(vec!["c".into()]),
        ];
        let mut woes = vec![-1.0, 0.5, 0.2];
        let merges = trim_monotonic(&mut bins, &mut woes, |_| Ok(0.4)).unwrap();

        assert_eq!(merges, 1);
        assert_eq!(bins[0], Bin::Categories(vec!["a".into()]));
        assert_eq!(bins[1], Bin::Categories(vec!["b".into(), "c".into()]));
    }
}
