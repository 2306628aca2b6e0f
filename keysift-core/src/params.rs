//! Tunable parameters for the recovery pipeline.

use crate::error::ParameterError;

/// Parameters shared by the pipeline stages.
///
/// `key_press_width` is the half-width of the correlation window: a
/// stroke's anchor window covers `2 * key_press_width` samples starting
/// `offset_from_peak` samples after the detected peak, and the
/// candidate side is widened by `align_window` samples on both sides
/// for the offset search.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameters {
    /// Half-width of the correlation window, in samples.
    pub key_press_width: usize,
    /// Samples per second of the recording.
    pub sample_rate: u32,
    /// Offset from the detected peak to the start of the correlation window.
    pub offset_from_peak: i64,
    /// ± search range for the best inter-stroke offset, in samples.
    pub align_window: usize,
    /// Minimum cross-correlation for a merge pair to be considered.
    pub threshold_clustering: f64,
    /// Peak-over-background ratio required to accept a peak.
    pub threshold_background: f64,
    /// Width of the adaptive background estimator, in samples.
    pub history_size: usize,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            key_press_width: 256,
            sample_rate: 24_000,
            offset_from_peak: 128,
            align_window: 256,
            threshold_clustering: 0.5,
            threshold_background: 10.0,
            history_size: 4096,
        }
    }
}

impl Parameters {
    /// Set the correlation window half-width.
    #[must_use]
    pub fn with_key_press_width(mut self, width: usize) -> Self {
        self.key_press_width = width;
        self
    }

    /// Set the sample rate.
    #[must_use]
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set the peak-to-window offset.
    #[must_use]
    pub fn with_offset_from_peak(mut self, offset: i64) -> Self {
        self.offset_from_peak = offset;
        self
    }

    /// Set the alignment search range.
    #[must_use]
    pub fn with_align_window(mut self, align_window: usize) -> Self {
        self.align_window = align_window;
        self
    }

    /// Set the clustering threshold.
    #[must_use]
    pub fn with_threshold_clustering(mut self, threshold: f64) -> Self {
        self.threshold_clustering = threshold;
        self
    }

    /// Set the background acceptance ratio.
    #[must_use]
    pub fn with_threshold_background(mut self, threshold: f64) -> Self {
        self.threshold_background = threshold;
        self
    }

    /// Set the background estimator width.
    #[must_use]
    pub fn with_history_size(mut self, history_size: usize) -> Self {
        self.history_size = history_size;
        self
    }

    /// Length of a stroke's anchor correlation window.
    #[inline]
    #[must_use]
    pub fn window_len(&self) -> usize {
        2 * self.key_press_width
    }

    /// Length of the candidate search window (anchor plus alignment slack).
    #[inline]
    #[must_use]
    pub fn search_len(&self) -> usize {
        2 * self.key_press_width + 2 * self.align_window
    }

    /// Checks that every parameter is usable by the pipeline.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.key_press_width == 0 {
            return Err(ParameterError::Invalid {
                name: "key_press_width",
                reason: "must be at least 1 sample",
            });
        }
        if self.align_window == 0 {
            return Err(ParameterError::Invalid {
                name: "align_window",
                reason: "must be at least 1 sample",
            });
        }
        if self.history_size < 2 {
            return Err(ParameterError::Invalid {
                name: "history_size",
                reason: "must be at least 2 samples",
            });
        }
        if self.sample_rate == 0 {
            return Err(ParameterError::Invalid {
                name: "sample_rate",
                reason: "must be positive",
            });
        }
        if !(self.threshold_background > 0.0) {
            return Err(ParameterError::Invalid {
                name: "threshold_background",
                reason: "must be positive",
            });
        }
        if !self.threshold_clustering.is_finite() {
            return Err(ParameterError::Invalid {
                name: "threshold_clustering",
                reason: "must be finite",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = Parameters::default();
        assert_eq!(params.key_press_width, 256);
        assert_eq!(params.sample_rate, 24_000);
        assert_eq!(params.offset_from_peak, 128);
        assert_eq!(params.align_window, 256);
        assert_eq!(params.threshold_clustering, 0.5);
        assert_eq!(params.threshold_background, 10.0);
        assert_eq!(params.history_size, 4096);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let params = Parameters::default()
            .with_key_press_width(64)
            .with_offset_from_peak(0)
            .with_align_window(16)
            .with_threshold_background(5.0)
            .with_history_size(512);

        assert_eq!(params.key_press_width, 64);
        assert_eq!(params.offset_from_peak, 0);
        assert_eq!(params.align_window, 16);
        assert_eq!(params.window_len(), 128);
        assert_eq!(params.search_len(), 160);
    }

    #[test]
    fn test_validate_rejects_degenerate_values() {
        assert!(Parameters::default()
            .with_key_press_width(0)
            .validate()
            .is_err());
        assert!(Parameters::default().with_align_window(0).validate().is_err());
        assert!(Parameters::default().with_history_size(1).validate().is_err());
        assert!(Parameters::default()
            .with_threshold_background(0.0)
            .validate()
            .is_err());
        assert!(Parameters::default()
            .with_threshold_clustering(f64::NAN)
            .validate()
            .is_err());
    }
}
