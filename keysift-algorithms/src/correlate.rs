//! Normalized cross-correlation with integer-shift alignment search.

use keysift_core::{sum_and_sum_sq, Match, WaveformView};

/// Pearson normalized cross-correlation of two views.
///
/// `sum0` and `sum0_sq` are the precomputed sums for `view0`, so one
/// anchor window can be correlated against many shifted candidates
/// without recomputing them. Correlates over the first
/// `min(len0, len1)` samples; accumulation is 64-bit integer and the
/// summation order is fixed, so results are bit-reproducible.
///
/// A zero-variance window makes the result undefined (NaN); callers
/// scanning for a maximum discard such scores.
#[must_use]
pub fn normalized_cc(
    view0: WaveformView<'_>,
    view1: WaveformView<'_>,
    sum0: i64,
    sum0_sq: i64,
) -> f64 {
    let n = view0.len().min(view1.len());
    let samples0 = &view0.samples()[..n];
    let samples1 = &view1.samples()[..n];

    let mut sum1 = 0i64;
    let mut sum1_sq = 0i64;
    let mut sum01 = 0i64;
    for (&a0, &a1) in samples0.iter().zip(samples1) {
        let a0 = i64::from(a0);
        let a1 = i64::from(a1);
        sum1 += a1;
        sum1_sq += a1 * a1;
        sum01 += a0 * a1;
    }

    let n = n as i64;
    let nom = (sum01 * n - sum0 * sum1) as f64;
    let den0 = (sum0_sq * n - sum0 * sum0) as f64;
    let den1 = (sum1_sq * n - sum1 * sum1) as f64;
    nom / (den0 * den1).sqrt()
}

/// Scans all `2 * align_window` integer shifts of `view1` against
/// `view0` and returns the best-scoring `(cc, offset)`.
///
/// `view1` must be exactly `2 * align_window` samples longer than
/// `view0`; offsets are reported relative to the centered alignment,
/// so a result of 0 means the windows line up as given. Only strictly
/// greater scores replace the running best, so the smallest offset
/// wins ties and undefined scores from zero-variance windows never
/// beat the initial `(cc, offset) = (-1, -1)`.
#[must_use]
pub fn best_alignment(
    view0: WaveformView<'_>,
    view1: WaveformView<'_>,
    align_window: usize,
) -> Match {
    debug_assert_eq!(view1.len(), view0.len() + 2 * align_window);

    let (sum0, sum0_sq) = sum_and_sum_sq(view0);
    let n0 = view0.len();

    let mut best = Match {
        cc: -1.0,
        offset: -1,
    };
    for o in 0..2 * align_window {
        let shifted = WaveformView::new(&view1.samples()[o..o + n0]);
        let cc = normalized_cc(view0, shifted, sum0, sum0_sq);
        if cc > best.cc {
            best = Match {
                cc,
                offset: o as i64 - align_window as i64,
            };
        }
    }
    best
}
