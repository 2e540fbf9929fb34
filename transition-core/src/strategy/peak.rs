//! Local-extremum strategy for continuous or noisy signals.
//!
//! Off→on fires at strict local maxima: `x[i-1] < x[i] > x[i+1]`. On→off is
//! the same search on the negated signal, i.e. strict local minima.
//! Plateaus are never peaks, and the first and last samples lack a
//! neighbour on one side, so results lie in `[1, N-2]`.

use super::TransitionStrategy;
use crate::error::DetectError;

#[derive(Debug, Clone, Copy, Default)]
pub struct PeakStrategy;

impl TransitionStrategy for PeakStrategy {
    fn name(&self) -> &'static str {
        "peak"
    }

    fn min_len(&self) -> usize {
        3
    }

    fn rising_edges(&self, signal: &[f64]) -> Result<Vec<usize>, DetectError> {
        Ok(signal
            .windows(3)
            .enumerate()
            .filter(|(_, w)| w[1] > w[0] && w[1] > w[2])
            .map(|(i, _)| i + 1)
            .collect())
    }
}
