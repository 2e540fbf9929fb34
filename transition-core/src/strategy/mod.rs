//! Transition strategies — turn a signal into raw off→on / on→off candidates.
//!
//! Every strategy answers a single question: where does the signal *rise*
//! into a higher state? Falling edges are the rising edges of the negated
//! signal, so the on→off side never needs its own implementation and the
//! two kinds are always computed by the same rule.

pub mod change_point;
pub mod peak;
pub mod threshold_diff;

pub use change_point::ChangePoint;
pub use peak::PeakStrategy;
pub use threshold_diff::ThresholdDiff;

use crate::config::{DetectionConfig, StrategyKind};
use crate::domain::{DetectionResult, TransitionSet};
use crate::error::DetectError;

/// Trait for transition strategies.
///
/// # Contract
/// `rising_edges` returns strictly increasing indices within the signal and
/// must be a pure function of its input. Finding nothing is `Ok(vec![])`;
/// `Err` is reserved for computations that could not complete.
pub trait TransitionStrategy: Send + Sync {
    /// Short name (e.g., "peak").
    fn name(&self) -> &'static str;

    /// Shortest signal that can produce any transition.
    fn min_len(&self) -> usize;

    /// Indices where the signal moves into a higher state.
    fn rising_edges(&self, signal: &[f64]) -> Result<Vec<usize>, DetectError>;

    /// Off→on from the raw signal, on→off from the negated signal.
    fn transitions(&self, signal: &[f64]) -> Result<DetectionResult, DetectError> {
        if signal.len() < self.min_len() {
            return Ok(DetectionResult::default());
        }
        let off_to_on = self.rising_edges(signal)?;
        let negated = negate(signal);
        let on_to_off = self.rising_edges(&negated)?;
        Ok(DetectionResult::new(
            TransitionSet::from_sorted(off_to_on),
            TransitionSet::from_sorted(on_to_off),
        ))
    }
}

/// Create the strategy selected by `config`.
///
/// # Errors
/// `InvalidInput` when the change-point parameters are out of domain.
pub fn create_strategy(
    config: &DetectionConfig,
) -> Result<Box<dyn TransitionStrategy>, DetectError> {
    let strategy: Box<dyn TransitionStrategy> = match config.strategy {
        StrategyKind::ThresholdDiff => Box::new(ThresholdDiff),
        StrategyKind::Peak => Box::new(PeakStrategy),
        StrategyKind::ChangePoint => Box::new(ChangePoint::new(
            config.change_point.penalty,
            config.change_point.min_segment_len,
        )?),
    };
    Ok(strategy)
}

pub(crate) fn negate(signal: &[f64]) -> Vec<f64> {
    signal.iter().map(|x| -x).collect()
}
