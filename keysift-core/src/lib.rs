//! keysift-core: Core types for acoustic keystroke recovery.
//!
//! This crate provides the data model shared by the detection,
//! similarity, alignment and clustering stages: waveform buffers and
//! non-owning views, key stroke records, the dense pairwise similarity
//! matrix, tunable parameters and the error taxonomy.
//!

pub mod error;
pub mod params;
pub mod similarity;
pub mod stroke;
pub mod waveform;

pub use error::{AlignmentError, ClusteringError, Error, ParameterError, Result, SimilarityError};
pub use params::Parameters;
pub use similarity::{Match, SimilarityMatrix};
pub use stroke::{ClusterId, KeyStroke, StrokeCollection, UNCLUSTERED};
pub use waveform::{rectify, sum_and_sum_sq, Position, Sample, Waveform, WaveformView};
