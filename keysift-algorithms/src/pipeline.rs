//! High-level driver combining the processing stages.

use tracing::info;

use keysift_core::{Parameters, Result, SimilarityMatrix, StrokeCollection, Waveform, WaveformView};

use crate::align::adjust_positions;
use crate::cluster::{ClusterStatistics, Clusterer};
use crate::detect::PeakDetector;
use crate::similarity::SimilarityEngine;

/// Everything produced by a full recovery pass.
#[derive(Clone, Debug)]
pub struct Recovery {
    /// Detected strokes with refined positions, average cc and cluster
    /// assignments.
    pub strokes: StrokeCollection,
    /// Similarity matrix from the final similarity pass.
    pub matrix: SimilarityMatrix,
    /// Threshold envelope from detection.
    pub envelope: Waveform,
    /// Clustering statistics.
    pub stats: ClusterStatistics,
}

/// Runs the full pipeline:
/// detect → similarity → (align → similarity) × `refine_passes` → cluster.
///
/// Each refinement pass re-anchors stroke positions from the current
/// matrix's offsets and recomputes the matrix, tightening alignment
/// before the clusterer runs.
pub fn recover_strokes(
    waveform: WaveformView<'_>,
    params: &Parameters,
    refine_passes: usize,
) -> Result<Recovery> {
    params.validate()?;

    let detection = PeakDetector::from_params(params).detect(waveform)?;
    let mut strokes = detection.strokes;
    info!(strokes = strokes.len(), "peak detection complete");

    let engine = SimilarityEngine::new(params.clone());
    let mut matrix = engine.compute(waveform, &mut strokes)?;

    for pass in 0..refine_passes {
        adjust_positions(&mut strokes, &matrix)?;
        matrix = engine.compute(waveform, &mut strokes)?;
        info!(pass, "alignment pass complete");
    }

    let stats = Clusterer::from_params(params).cluster(&matrix, &mut strokes)?;
    info!(clusters = stats.clusters_found, "clustering complete");

    Ok(Recovery {
        strokes,
        matrix,
        envelope: detection.envelope,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_recording_recovers_nothing() {
        let waveform = vec![0i32; 8192];
        let params = Parameters::default()
            .with_key_press_width(64)
            .with_offset_from_peak(0)
            .with_align_window(16)
            .with_history_size(512);

        let recovery = recover_strokes(WaveformView::new(&waveform), &params, 1).unwrap();
        assert!(recovery.strokes.is_empty());
        assert!(recovery.matrix.is_empty());
        assert_eq!(recovery.strokes.n_clusters, 0);
        assert_eq!(recovery.envelope.len(), waveform.len());
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let waveform = vec![0i32; 1024];
        let params = Parameters::default().with_align_window(0);
        assert!(recover_strokes(WaveformView::new(&waveform), &params, 0).is_err());
    }
}
