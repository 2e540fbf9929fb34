//! Transition Core — off/on state transition detection for numeric signals.
//!
//! Given an in-memory signal and a `DetectionConfig`, finds the indices where
//! the signal moves from a low state to a high state (off→on) and back
//! (on→off):
//! - Three interchangeable strategies behind one trait (unit-step difference,
//!   strict local extrema, penalized change-point segmentation)
//! - A shared minimum-duration filter applied to either kind
//! - Pure, stateless entry points (`detect`, `detect_unfiltered`, `detect_batch`)
//!
//! How the signal is loaded and how results are displayed is up to the caller.

pub mod config;
pub mod detector;
pub mod domain;
pub mod error;
pub mod filter;
pub mod prep;
pub mod strategy;

pub use config::{ChangePointParams, DetectionConfig, StrategyKind};
pub use detector::{detect, detect_batch, detect_unfiltered};
pub use domain::{DetectionResult, TransitionEvent, TransitionKind, TransitionSet};
pub use error::DetectError;
pub use filter::DurationFilter;
pub use strategy::{create_strategy, TransitionStrategy};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything a caller may hand to another thread is
    /// Send + Sync, so `detect_batch` and concurrent callers stay possible.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<DetectionConfig>();
        require_sync::<DetectionConfig>();
        require_send::<DetectionResult>();
        require_sync::<DetectionResult>();
        require_send::<TransitionSet>();
        require_sync::<TransitionSet>();
        require_send::<DetectError>();
        require_sync::<DetectError>();
        require_send::<DurationFilter>();
        require_sync::<DurationFilter>();

        require_send::<strategy::ThresholdDiff>();
        require_sync::<strategy::ThresholdDiff>();
        require_send::<strategy::PeakStrategy>();
        require_sync::<strategy::PeakStrategy>();
        require_send::<strategy::ChangePoint>();
        require_sync::<strategy::ChangePoint>();
    }

    /// Architecture contract: strategies see only the signal.
    ///
    /// `rising_edges` takes `&self` and `&[f64]`; there is no mutable state or
    /// result cache to thread through. If the signature grows one, this breaks.
    #[test]
    fn strategy_trait_is_a_pure_signal_function() {
        fn _check_trait_object_builds(
            strategy: &dyn TransitionStrategy,
            signal: &[f64],
        ) -> Result<Vec<usize>, DetectError> {
            strategy.rising_edges(signal)
        }
    }
}
