//! Keystroke peak detection over a raw waveform.

use std::collections::VecDeque;

use keysift_core::{rectify, KeyStroke, ParameterError, Parameters, StrokeCollection, Waveform, WaveformView};

/// Output of a detection pass.
#[derive(Clone, Debug)]
pub struct Detection {
    /// Detected strokes in chronological order.
    pub strokes: StrokeCollection,
    /// Moving maximum of |samples| at each covered position, for
    /// threshold visualization. Same length as the input waveform.
    pub envelope: Waveform,
}

/// Locates keystroke peaks with a moving-maximum detector and an
/// adaptive background estimate.
///
/// A single linear pass maintains a monotonic index deque over
/// |samples| for the sliding-window maximum and a ring buffer of the
/// most recent `8 * history_size` rectified samples for the rolling
/// background average. A candidate at `i - history_size / 2` is
/// accepted when it is the argmax of its window, clears the configured
/// ratio over the background, and leaves `2 * history_size` samples of
/// margin at both ends for the downstream correlation windows.
///
/// Detection never fails on valid parameters; a recording with no peak
/// above the background simply yields zero strokes.
#[derive(Clone, Debug)]
pub struct PeakDetector {
    threshold_background: f64,
    history_size: usize,
}

impl PeakDetector {
    /// New detector with an explicit ratio and estimator width.
    #[must_use]
    pub fn new(threshold_background: f64, history_size: usize) -> Self {
        Self {
            threshold_background,
            history_size,
        }
    }

    /// New detector from shared pipeline parameters.
    #[must_use]
    pub fn from_params(params: &Parameters) -> Self {
        Self::new(params.threshold_background, params.history_size)
    }

    /// Scans the waveform and returns the detected strokes and the
    /// threshold envelope.
    pub fn detect(&self, waveform: WaveformView<'_>) -> Result<Detection, ParameterError> {
        if self.history_size < 2 {
            return Err(ParameterError::Invalid {
                name: "history_size",
                reason: "must be at least 2 samples",
            });
        }
        if !(self.threshold_background > 0.0) {
            return Err(ParameterError::Invalid {
                name: "threshold_background",
                reason: "must be positive",
            });
        }

        let k = self.history_size;
        let n = waveform.len();
        let abs = rectify(waveform);

        let mut strokes = StrokeCollection::default();
        let mut envelope = vec![0; n];

        // Rolling background average over the last 8k rectified
        // samples, kept as a running value scaled by the buffer size
        // around each update.
        let mut rb_samples = vec![0.0f64; 8 * k];
        let mut rb_begin = 0usize;
        let mut rb_average = 0.0f64;

        let mut que: VecDeque<usize> = VecDeque::with_capacity(k);

        for i in 0..n {
            // The estimate only engages once the candidate index
            // i - k/2 is in range, so the first k/2 samples never
            // enter the background.
            if i >= k / 2 {
                let len = rb_samples.len() as f64;
                rb_average *= len;
                rb_average -= rb_samples[rb_begin];
                let acur = f64::from(abs[i]);
                rb_samples[rb_begin] = acur;
                rb_average += acur;
                rb_average /= len;
                rb_begin += 1;
                if rb_begin >= rb_samples.len() {
                    rb_begin = 0;
                }
            }

            while que.back().is_some_and(|&b| abs[i] >= abs[b]) {
                que.pop_back();
            }
            if i >= k {
                while que.front().is_some_and(|&f| f + k <= i) {
                    que.pop_front();
                }
            }
            que.push_back(i);

            if i >= k {
                let itest = i - k / 2;
                if let Some(&front) = que.front() {
                    if itest >= 2 * k && itest + 2 * k < n && front == itest {
                        let acur = f64::from(abs[itest]);
                        if acur > self.threshold_background * rb_average {
                            strokes.push(KeyStroke::at(itest as i64));
                        }
                    }
                    envelope[itest] = abs[front];
                }
            }
        }

        Ok(Detection { strokes, envelope })
    }
}
