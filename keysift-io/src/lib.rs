//! keysift-io: Recording ingestion and stroke checkpointing.
//!
//! Recordings are raw little-endian `f32` sample files, memory-mapped
//! and normalized to integer amplitudes on read. Stroke checkpoints
//! hold positions only, in a small fixed binary layout.

mod error;
mod recording;
mod strokes;

pub use error::{Error, Result};
pub use recording::{RecordingReader, NORMALIZED_PEAK};
pub use strokes::{load_strokes, save_strokes, write_strokes_csv};
