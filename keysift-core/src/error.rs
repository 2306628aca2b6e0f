//! Error types for keysift.

use thiserror::Error;

/// Errors from parameter validation.
#[derive(Error, Debug)]
pub enum ParameterError {
    /// A parameter value is unusable for the requested operation.
    #[error("invalid parameter {name}: {reason}")]
    Invalid {
        /// Name of the offending parameter.
        name: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },
}

/// Errors during similarity computation.
#[derive(Error, Debug)]
pub enum SimilarityError {
    /// A stroke's search window extends outside the waveform.
    #[error("stroke {stroke}: window [{start}, {end}) outside waveform of {len} samples")]
    WindowOutOfRange {
        /// Index of the offending stroke.
        stroke: usize,
        /// First sample of the search window.
        start: i64,
        /// One past the last sample of the search window.
        end: i64,
        /// Length of the waveform.
        len: usize,
    },
}

/// Errors during position alignment.
#[derive(Error, Debug)]
pub enum AlignmentError {
    /// Similarity matrix does not match the stroke collection.
    #[error("similarity matrix is {matrix}x{matrix} but collection has {strokes} strokes")]
    SizeMismatch {
        /// Side length of the similarity matrix.
        matrix: usize,
        /// Number of strokes in the collection.
        strokes: usize,
    },
}

/// Errors during clustering operations.
#[derive(Error, Debug)]
pub enum ClusteringError {
    /// Similarity matrix does not match the stroke collection.
    #[error("similarity matrix is {matrix}x{matrix} but collection has {strokes} strokes")]
    SizeMismatch {
        /// Side length of the similarity matrix.
        matrix: usize,
        /// Number of strokes in the collection.
        strokes: usize,
    },
}

/// Combined error type for the library.
#[derive(Error, Debug)]
pub enum Error {
    /// Error from parameter validation.
    #[error("parameter error: {0}")]
    Parameter(#[from] ParameterError),

    /// Error from similarity computation.
    #[error("similarity error: {0}")]
    Similarity(#[from] SimilarityError),

    /// Error from position alignment.
    #[error("alignment error: {0}")]
    Alignment(#[from] AlignmentError),

    /// Error from clustering.
    #[error("clustering error: {0}")]
    Clustering(#[from] ClusteringError),
}

/// Result type alias using the combined Error.
pub type Result<T> = std::result::Result<T, Error>;
