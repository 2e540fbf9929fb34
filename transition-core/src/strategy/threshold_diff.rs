//! Unit-step strategy for two-level signals.
//!
//! Fires off→on at `i` when `x[i+1] - x[i] == 1` and on→off when the step is
//! `-1`. The index is the left sample of the step, so results lie in
//! `[0, N-2]`. No thresholding happens here: continuous input must be
//! binarized by the caller first (see `prep::binarize`).
//!
//! Input is taken as a 0/1 encoding and is not normalized. A sign-encoded
//! (`-1`/`+1`) signal steps by 2 and yields no transitions; map it to 0/1
//! before detection.

use super::TransitionStrategy;
use crate::error::DetectError;

#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdDiff;

impl TransitionStrategy for ThresholdDiff {
    fn name(&self) -> &'static str {
        "threshold_diff"
    }

    fn min_len(&self) -> usize {
        2
    }

    fn rising_edges(&self, signal: &[f64]) -> Result<Vec<usize>, DetectError> {
        Ok(signal
            .windows(2)
            .enumerate()
            .filter(|(_, w)| w[1] - w[0] == 1.0)
            .map(|(i, _)| i)
            .collect())
    }
}
