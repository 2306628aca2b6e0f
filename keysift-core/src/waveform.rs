//! Waveform storage, non-owning views and elementary sample ops.
//!

/// A single signed amplitude sample.
pub type Sample = i32;

/// Sample index into a waveform (origin = start of the owning buffer).
pub type Position = i64;

/// An owned, contiguous run of samples at a fixed sample rate.
pub type Waveform = Vec<Sample>;

/// Non-owning, read-only view of a contiguous run of samples.
///
/// Views are cheap to copy and compose by offset/length. The owning
/// buffer must outlive every view into it; the borrow checker enforces
/// this through the view's lifetime.
#[derive(Clone, Copy, Debug)]
pub struct WaveformView<'a> {
    samples: &'a [Sample],
}

impl<'a> WaveformView<'a> {
    /// View over an entire sample slice.
    #[must_use]
    pub fn new(samples: &'a [Sample]) -> Self {
        Self { samples }
    }

    /// Number of samples in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if the view covers no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The viewed samples.
    #[must_use]
    pub fn samples(&self) -> &'a [Sample] {
        self.samples
    }

    /// Sub-view of `len` samples starting at `offset`, if in range.
    #[must_use]
    pub fn window(&self, offset: usize, len: usize) -> Option<WaveformView<'a>> {
        self.samples
            .get(offset..offset.checked_add(len)?)
            .map(WaveformView::new)
    }
}

/// Sum and sum of squares over a view, in 64-bit integer arithmetic.
///
/// No overflow for waveforms up to 2^31 samples of 16-bit amplitude.
#[must_use]
pub fn sum_and_sum_sq(view: WaveformView<'_>) -> (i64, i64) {
    let mut sum = 0i64;
    let mut sum_sq = 0i64;
    for &a in view.samples() {
        let a = i64::from(a);
        sum += a;
        sum_sq += a * a;
    }
    (sum, sum_sq)
}

/// Elementwise absolute value into a fresh buffer of the same length.
#[must_use]
pub fn rectify(view: WaveformView<'_>) -> Waveform {
    view.samples().iter().map(|&a| a.saturating_abs()).collect()
}
