//! keysift-algorithms: Signal processing and clustering stages for
//! acoustic keystroke recovery.
//!
//! The stages run over the shared types from `keysift-core`:
//! - Peak detection over a raw waveform (moving-maximum detector with
//!   an adaptive background estimate)
//! - Normalized cross-correlation with an integer-shift alignment
//!   search
//! - Dense pairwise similarity, parallel by matrix row
//! - Joint position refinement from the best-aligned offsets
//! - Agglomerative clustering under a cohesion test

mod align;
mod cluster;
mod correlate;
mod detect;
mod pipeline;
mod similarity;

pub use align::adjust_positions;
pub use cluster::{ClusterStatistics, Clusterer};
pub use correlate::{best_alignment, normalized_cc};
pub use detect::{Detection, PeakDetector};
pub use pipeline::{recover_strokes, Recovery};
pub use similarity::SimilarityEngine;
