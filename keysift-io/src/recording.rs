//! Memory-mapped recording ingestion.

use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::{Error, Result};
use keysift_core::{Sample, Waveform};

/// Peak amplitude that recordings are normalized to on read.
pub const NORMALIZED_PEAK: f64 = 32_000.0;

/// Read-only, memory-mapped recording of raw little-endian `f32`
/// samples.
///
/// The raw format carries no header; the sample rate is supplied by
/// the caller downstream (24 kHz for the stock capture setup).
pub struct RecordingReader {
    mmap: Mmap,
    path: PathBuf,
}

impl RecordingReader {
    /// Opens a recording for memory-mapped reading.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound(path.display().to_string()));
        }
        let file = File::open(path)?;
        // SAFETY: the recording is opened read-only and must not be
        // truncated or rewritten while mapped.
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Self {
            mmap,
            path: path.to_path_buf(),
        })
    }

    /// Returns the file size in bytes.
    #[must_use]
    pub fn file_size(&self) -> usize {
        self.mmap.len()
    }

    /// Returns the number of samples in the recording.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.mmap.len() / 4
    }

    /// Returns true if the recording holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    /// Decodes the mapped samples into a normalized waveform.
    ///
    /// Samples are scaled so the peak magnitude maps to
    /// [`NORMALIZED_PEAK`] and rounded to integer amplitudes. An
    /// all-zero recording stays all zero.
    pub fn read_waveform(&self) -> Result<Waveform> {
        if self.mmap.len() % 4 != 0 {
            return Err(Error::InvalidFormat(format!(
                "file size {} is not a multiple of 4 (file: {})",
                self.mmap.len(),
                self.path.display()
            )));
        }

        let mut peak = 0.0f64;
        for chunk in self.mmap.chunks_exact(4) {
            let bytes: [u8; 4] = chunk.try_into().unwrap();
            let magnitude = f64::from(f32::from_le_bytes(bytes)).abs();
            if magnitude > peak {
                peak = magnitude;
            }
        }

        if peak == 0.0 {
            return Ok(vec![0; self.sample_count()]);
        }

        let scale = NORMALIZED_PEAK / peak;
        let waveform = self
            .mmap
            .chunks_exact(4)
            .map(|chunk| {
                let bytes: [u8; 4] = chunk.try_into().unwrap();
                (f64::from(f32::from_le_bytes(bytes)) * scale).round() as Sample
            })
            .collect();
        Ok(waveform)
    }
}
