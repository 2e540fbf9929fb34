//! Input preparation for two-level strategies.
//!
//! `ThresholdDiff` never thresholds on its own. Callers with continuous data
//! binarize it here first.

/// Map a signal onto {0.0, 1.0} with hysteresis.
///
/// - above `high` → 1.0
/// - below `low` → 0.0
/// - in between → previous output (starts at 0.0)
///
/// `low` and `high` are swapped if given in the wrong order. NaN samples hold
/// the previous output.
pub fn binarize(signal: &[f64], low: f64, high: f64) -> Vec<f64> {
    let (low, high) = (low.min(high), low.max(high));
    let mut on = false;
    signal
        .iter()
        .map(|&x| {
            if x > high {
                on = true;
            } else if x < low {
                on = false;
            }
            if on {
                1.0
            } else {
                0.0
            }
        })
        .collect()
}
