//! Joint refinement of stroke positions from the similarity offsets.

use keysift_core::{AlignmentError, SimilarityMatrix, StrokeCollection};

struct RankedPair {
    i: usize,
    j: usize,
    cc: f64,
}

fn ranked_pairs(matrix: &SimilarityMatrix) -> Vec<RankedPair> {
    let n = matrix.n();
    let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            pairs.push(RankedPair {
                i,
                j,
                cc: matrix.cc(i, j),
            });
        }
    }
    // Stable sort keeps lexicographic (i, j) order among equal scores.
    pairs.sort_by(|a, b| b.cc.total_cmp(&a.cc));
    pairs
}

/// Re-anchors each stroke against its highest-confidence neighbor.
///
/// Pairs are visited in descending cc order. The first pair fixes both
/// of its strokes at once; every later pair moves only its unused
/// member, adding the pair's offset to the second stroke or subtracting
/// it from the first. Each position is therefore adjusted at most once
/// per call, and the sweep stops as soon as every stroke is anchored.
pub fn adjust_positions(
    strokes: &mut StrokeCollection,
    matrix: &SimilarityMatrix,
) -> Result<(), AlignmentError> {
    let n = strokes.len();
    if matrix.n() != n {
        return Err(AlignmentError::SizeMismatch {
            matrix: matrix.n(),
            strokes: n,
        });
    }
    if n < 2 {
        return Ok(());
    }

    let mut used = vec![false; n];
    let mut n_used = 0usize;

    for pair in ranked_pairs(matrix) {
        let (i, j) = (pair.i, pair.j);
        if used[i] && used[j] {
            continue;
        }

        if !used[j] {
            strokes.strokes[j].position += matrix.offset(i, j);
        } else {
            strokes.strokes[i].position -= matrix.offset(i, j);
        }

        if !used[i] {
            used[i] = true;
            n_used += 1;
        }
        if !used[j] {
            used[j] = true;
            n_used += 1;
        }
        if n_used == n {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use keysift_core::Match;

    fn matrix_with(entries: &[(usize, usize, f64, i64)], n: usize) -> SimilarityMatrix {
        let mut matrix = SimilarityMatrix::new(n);
        for i in 0..n {
            matrix.set(
                i,
                i,
                Match {
                    cc: 1.0,
                    offset: 0,
                },
            );
        }
        for &(i, j, cc, offset) in entries {
            matrix.set(i, j, Match { cc, offset });
        }
        matrix
    }

    #[test]
    fn test_each_stroke_adjusted_at_most_once() {
        let mut strokes = StrokeCollection::from_positions(&[100, 200, 300]);
        // Pair (1, 2) ranks below the pairs that anchor all strokes, so
        // its large offset must never be applied.
        let matrix = matrix_with(
            &[
                (0, 1, 0.9, 5),
                (0, 2, 0.8, 7),
                (1, 2, 0.7, 1000),
            ],
            3,
        );

        adjust_positions(&mut strokes, &matrix).unwrap();
        assert_eq!(strokes.positions(), vec![100, 205, 307]);
    }

    #[test]
    fn test_zero_offsets_are_a_noop() {
        let mut strokes = StrokeCollection::from_positions(&[100, 200, 300]);
        let matrix = matrix_with(&[(0, 1, 0.9, 0), (0, 2, 0.8, 0), (1, 2, 0.7, 0)], 3);

        adjust_positions(&mut strokes, &matrix).unwrap();
        assert_eq!(strokes.positions(), vec![100, 200, 300]);
    }

    #[test]
    fn test_anchored_pair_adjusts_first_member() {
        // Once 1 and 2 are anchored by the top pair, the (0, 1) pair
        // can only move stroke 0, by subtracting its offset.
        let mut strokes = StrokeCollection::from_positions(&[100, 200, 300]);
        let matrix = matrix_with(&[(1, 2, 0.9, 4), (0, 1, 0.8, 6)], 3);

        adjust_positions(&mut strokes, &matrix).unwrap();
        assert_eq!(strokes.positions(), vec![94, 200, 304]);
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let mut strokes = StrokeCollection::from_positions(&[100, 200]);
        let matrix = SimilarityMatrix::new(3);
        assert!(adjust_positions(&mut strokes, &matrix).is_err());
    }

    #[test]
    fn test_single_stroke_untouched() {
        let mut strokes = StrokeCollection::from_positions(&[100]);
        let matrix = matrix_with(&[], 1);
        adjust_positions(&mut strokes, &matrix).unwrap();
        assert_eq!(strokes.positions(), vec![100]);
    }
}
