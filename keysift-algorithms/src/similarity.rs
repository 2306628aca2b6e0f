//! Dense pairwise similarity over a stroke collection.

use rayon::prelude::*;
use tracing::debug;

use keysift_core::{Match, Parameters, SimilarityError, SimilarityMatrix, StrokeCollection, WaveformView};

use crate::correlate::best_alignment;

/// Fills the n×n similarity/offset matrix for a stroke collection.
///
/// For every ordered pair `(i, j)` the engine aligns stroke j's search
/// window against stroke i's anchor window and records the best
/// `(cc, offset)`. Rows are independent and computed in parallel; the
/// inner summations of each entry run in a fixed order, so results are
/// deterministic regardless of the worker count.
#[derive(Clone, Debug)]
pub struct SimilarityEngine {
    params: Parameters,
}

impl SimilarityEngine {
    /// New engine over the shared pipeline parameters.
    #[must_use]
    pub fn new(params: Parameters) -> Self {
        Self { params }
    }

    /// Computes the similarity matrix, writing each stroke's
    /// off-diagonal row mean into its `avg_cc`.
    ///
    /// Every stroke's search window must lie inside the waveform; the
    /// detector's end margins guarantee this for detected strokes under
    /// the same parameters.
    pub fn compute(
        &self,
        waveform: WaveformView<'_>,
        strokes: &mut StrokeCollection,
    ) -> Result<SimilarityMatrix, SimilarityError> {
        let n = strokes.len();
        let len = waveform.len();
        let window_len = self.params.window_len();
        let search_len = self.params.search_len();
        let align_window = self.params.align_window;

        // Every stroke serves as both the anchor and the searched side;
        // the searched window is the wider of the two, so validating it
        // covers both.
        let mut anchor_starts = Vec::with_capacity(n);
        let mut search_starts = Vec::with_capacity(n);
        for (idx, stroke) in strokes.strokes.iter().enumerate() {
            let start = stroke.position + self.params.offset_from_peak - align_window as i64;
            let end = start + search_len as i64;
            if start < 0 || end > len as i64 {
                return Err(SimilarityError::WindowOutOfRange {
                    stroke: idx,
                    start,
                    end,
                    len,
                });
            }
            search_starts.push(start as usize);
            anchor_starts.push((stroke.position + self.params.offset_from_peak) as usize);
        }

        let samples = waveform.samples();
        let rows: Vec<(Vec<Match>, f64)> = (0..n)
            .into_par_iter()
            .map(|i| {
                let anchor =
                    WaveformView::new(&samples[anchor_starts[i]..anchor_starts[i] + window_len]);

                let mut row = vec![Match::default(); n];
                row[i] = Match {
                    cc: 1.0,
                    offset: 0,
                };

                let mut cc_sum = 0.0;
                for j in 0..n {
                    if j == i {
                        continue;
                    }
                    let search = WaveformView::new(
                        &samples[search_starts[j]..search_starts[j] + search_len],
                    );
                    let entry = best_alignment(anchor, search, align_window);
                    cc_sum += entry.cc;
                    row[j] = entry;
                }

                let avg_cc = if n > 1 { cc_sum / (n - 1) as f64 } else { 0.0 };
                (row, avg_cc)
            })
            .collect();

        let mut matrix_rows = Vec::with_capacity(n);
        for (stroke, (row, avg_cc)) in strokes.strokes.iter_mut().zip(rows) {
            stroke.avg_cc = avg_cc;
            matrix_rows.push(row);
        }

        debug!(strokes = n, "similarity matrix computed");
        Ok(SimilarityMatrix::from_rows(matrix_rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(key_press_width: usize, align_window: usize) -> SimilarityEngine {
        SimilarityEngine::new(
            Parameters::default()
                .with_key_press_width(key_press_width)
                .with_offset_from_peak(0)
                .with_align_window(align_window),
        )
    }

    fn impulse_waveform(len: usize, positions: &[usize]) -> Vec<i32> {
        let mut waveform = vec![0; len];
        for &pos in positions {
            waveform[pos] = 32_000;
        }
        waveform
    }

    #[test]
    fn test_diagonal_and_identical_strokes() {
        let waveform = impulse_waveform(4096, &[1000, 2000, 3000]);
        let mut strokes = StrokeCollection::from_positions(&[1000, 2000, 3000]);

        let matrix = engine(32, 8)
            .compute(WaveformView::new(&waveform), &mut strokes)
            .unwrap();

        for i in 0..3 {
            assert_eq!(matrix.cc(i, i), 1.0);
            assert_eq!(matrix.offset(i, i), 0);
            for j in 0..3 {
                if i != j {
                    assert!((matrix.cc(i, j) - 1.0).abs() < 1e-9);
                    assert_eq!(matrix.offset(i, j), 0);
                }
            }
        }
    }

    #[test]
    fn test_avg_cc_matches_row_mean() {
        let waveform = impulse_waveform(4096, &[1000, 2000, 3000]);
        let mut strokes = StrokeCollection::from_positions(&[1000, 2000, 3000]);

        let matrix = engine(32, 8)
            .compute(WaveformView::new(&waveform), &mut strokes)
            .unwrap();

        for i in 0..3 {
            let mut mean = 0.0;
            for j in 0..3 {
                if j != i {
                    mean += matrix.cc(i, j);
                }
            }
            mean /= 2.0;
            assert!((strokes.strokes[i].avg_cc - mean).abs() < 1e-9);
        }
    }

    #[test]
    fn test_single_stroke_avg_is_zero() {
        let waveform = impulse_waveform(4096, &[2000]);
        let mut strokes = StrokeCollection::from_positions(&[2000]);

        let matrix = engine(32, 8)
            .compute(WaveformView::new(&waveform), &mut strokes)
            .unwrap();
        assert_eq!(matrix.n(), 1);
        assert_eq!(matrix.cc(0, 0), 1.0);
        assert_eq!(strokes.strokes[0].avg_cc, 0.0);
    }

    #[test]
    fn test_empty_collection_yields_empty_matrix() {
        let waveform = impulse_waveform(4096, &[]);
        let mut strokes = StrokeCollection::default();

        let matrix = engine(32, 8)
            .compute(WaveformView::new(&waveform), &mut strokes)
            .unwrap();
        assert!(matrix.is_empty());
    }

    #[test]
    fn test_window_out_of_range_is_rejected() {
        let waveform = impulse_waveform(256, &[4]);
        let mut strokes = StrokeCollection::from_positions(&[4]);

        let err = engine(32, 8)
            .compute(WaveformView::new(&waveform), &mut strokes)
            .unwrap_err();
        assert!(matches!(err, SimilarityError::WindowOutOfRange { stroke: 0, .. }));
    }
}
