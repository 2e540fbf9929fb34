//! Detection entry points — validate, dispatch to a strategy, filter.
//!
//! Each call is a pure function of `(signal, config)`: nothing is cached and
//! no state survives the call, so identical inputs give identical outputs and
//! callers may run detections on different signals concurrently.
//!
//! Splitting one long signal into chunks for parallel change-point search is
//! not supported: a shift that straddles a chunk boundary would be missed or
//! counted twice. `detect_batch` parallelizes across whole signals only.

use log::debug;
use rayon::prelude::*;

use crate::config::{DetectionConfig, StrategyKind};
use crate::domain::DetectionResult;
use crate::error::DetectError;
use crate::filter::DurationFilter;
use crate::strategy::create_strategy;

/// Detect off→on and on→off transitions, then apply the minimum-duration
/// filter to each kind.
///
/// # Errors
/// `InvalidInput` for an empty signal, a non-finite sample, an out-of-domain
/// config value or a change-point signal above `max_signal_len`.
/// `StrategyComputation` when the chosen strategy cannot complete.
pub fn detect(signal: &[f64], config: &DetectionConfig) -> Result<DetectionResult, DetectError> {
    let raw = detect_unfiltered(signal, config)?;

    let off_to_on = DurationFilter::new(config.off_to_on_min_duration).apply(&raw.off_to_on);
    let on_to_off = DurationFilter::new(config.on_to_off_min_duration).apply(&raw.on_to_off);
    let result = DetectionResult::new(off_to_on, on_to_off);

    debug!(
        "{} kept {}/{} off->on, {}/{} on->off",
        config.strategy.name(),
        result.off_to_on.len(),
        raw.off_to_on.len(),
        result.on_to_off.len(),
        raw.on_to_off.len(),
    );
    Ok(result)
}

/// Strategy output before the minimum-duration filter.
pub fn detect_unfiltered(
    signal: &[f64],
    config: &DetectionConfig,
) -> Result<DetectionResult, DetectError> {
    validate_input(signal, config)?;

    let strategy = create_strategy(config)?;
    debug!("running {} on {} samples", strategy.name(), signal.len());
    strategy.transitions(signal)
}

/// Run `detect` on every signal in parallel. Results keep input order; one
/// failing signal does not affect the others.
pub fn detect_batch<S>(
    signals: &[S],
    config: &DetectionConfig,
) -> Vec<Result<DetectionResult, DetectError>>
where
    S: AsRef<[f64]> + Sync,
{
    signals
        .par_iter()
        .map(|signal| detect(signal.as_ref(), config))
        .collect()
}

fn validate_input(signal: &[f64], config: &DetectionConfig) -> Result<(), DetectError> {
    config.validate()?;

    if signal.is_empty() {
        return Err(DetectError::invalid("signal is empty"));
    }
    if let Some(i) = signal.iter().position(|x| !x.is_finite()) {
        return Err(DetectError::invalid(format!(
            "signal sample {i} is not finite ({})",
            signal[i]
        )));
    }
    if config.strategy == StrategyKind::ChangePoint
        && signal.len() > config.change_point.max_signal_len
    {
        return Err(DetectError::invalid(format!(
            "signal length {} exceeds change point limit {}",
            signal.len(),
            config.change_point.max_signal_len
        )));
    }
    Ok(())
}
