//! Pipeline-wide invariants over a noisy synthetic recording.

use keysift_algorithms::{adjust_positions, recover_strokes, PeakDetector, SimilarityEngine};
use keysift_core::{Parameters, WaveformView};

const HISTORY_SIZE: usize = 512;

fn params() -> Parameters {
    Parameters::default()
        .with_key_press_width(64)
        .with_offset_from_peak(0)
        .with_align_window(16)
        .with_threshold_background(5.0)
        .with_history_size(HISTORY_SIZE)
}

/// Low-amplitude deterministic noise with two families of loud
/// keystroke templates at irregular spacings.
fn noisy_recording() -> Vec<i32> {
    let mut waveform: Vec<i32> = Vec::with_capacity(40_000);
    let mut state = 0x2545_f491_4f6c_dd1du64;
    for _ in 0..40_000 {
        state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
        waveform.push(((state >> 33) % 101) as i32 - 50);
    }

    let template_a: Vec<i32> = (0..24).map(|i| {
        let sign = if i % 2 == 0 { 1 } else { -1 };
        sign * (30_000 >> (i / 2))
    }).collect();
    let template_b: Vec<i32> = (0..24).map(|i| {
        let sign = if i % 4 < 2 { 1 } else { -1 };
        sign * (30_000 >> (i / 3))
    }).collect();

    for (idx, &pos) in [3000usize, 7500, 13_000, 19_000, 26_000, 34_000].iter().enumerate() {
        let template = if idx % 2 == 0 { &template_a } else { &template_b };
        waveform[pos..pos + template.len()].copy_from_slice(template);
    }
    waveform
}

/// Detected positions are strictly increasing and respect the margin
/// of `2 * history_size` at both ends.
#[test]
fn detection_positions_increasing_within_margins() {
    let waveform = noisy_recording();
    let detection = PeakDetector::new(5.0, HISTORY_SIZE)
        .detect(WaveformView::new(&waveform))
        .unwrap();

    let positions = detection.strokes.positions();
    assert!(!positions.is_empty());
    assert!(detection.strokes.is_chronological());

    let lo = 2 * HISTORY_SIZE as i64;
    let hi = waveform.len() as i64 - 2 * HISTORY_SIZE as i64;
    for &pos in &positions {
        assert!(pos >= lo && pos < hi, "position {pos} outside [{lo}, {hi})");
    }
}

/// The similarity matrix has an exact identity diagonal, bounded
/// off-diagonal scores, and row means that match each stroke's avg_cc.
#[test]
fn similarity_matrix_diagonal_bounds_and_row_means() {
    let waveform = noisy_recording();
    let detection = PeakDetector::new(5.0, HISTORY_SIZE)
        .detect(WaveformView::new(&waveform))
        .unwrap();
    let mut strokes = detection.strokes;
    let n = strokes.len();
    assert!(n >= 2);

    let matrix = SimilarityEngine::new(params())
        .compute(WaveformView::new(&waveform), &mut strokes)
        .unwrap();

    for i in 0..n {
        assert_eq!(matrix.cc(i, i), 1.0);
        assert_eq!(matrix.offset(i, i), 0);

        let mut row_mean = 0.0;
        for j in 0..n {
            assert!(matrix.cc(i, j).abs() <= 1.0 + 1e-9);
            if j != i {
                row_mean += matrix.cc(i, j);
            }
        }
        row_mean /= (n - 1) as f64;

        let avg_cc = strokes.strokes[i].avg_cc;
        assert!(
            (avg_cc - row_mean).abs() <= 1e-9 * row_mean.abs().max(1.0),
            "avg_cc {avg_cc} != row mean {row_mean}"
        );
    }
}

/// Cluster count equals the number of distinct ids, end to end.
#[test]
fn cluster_count_matches_distinct_ids() {
    let waveform = noisy_recording();
    let recovery = recover_strokes(WaveformView::new(&waveform), &params(), 1).unwrap();

    let mut ids = recovery.strokes.cluster_ids();
    assert!(ids.iter().all(|&id| id > 0));
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), recovery.strokes.n_clusters);
}

/// Alignment converges: once a pass has run, recomputing the matrix
/// and aligning again leaves every position in place.
#[test]
fn alignment_converges_after_one_pass() {
    let waveform = noisy_recording();
    let detection = PeakDetector::new(5.0, HISTORY_SIZE)
        .detect(WaveformView::new(&waveform))
        .unwrap();
    let mut strokes = detection.strokes;

    let engine = SimilarityEngine::new(params());
    let matrix = engine
        .compute(WaveformView::new(&waveform), &mut strokes)
        .unwrap();
    adjust_positions(&mut strokes, &matrix).unwrap();
    let aligned = strokes.positions();

    let matrix = engine
        .compute(WaveformView::new(&waveform), &mut strokes)
        .unwrap();
    adjust_positions(&mut strokes, &matrix).unwrap();
    assert_eq!(strokes.positions(), aligned);
}
