//! Change-point strategy — penalized optimal segmentation (PELT).
//!
//! The signal is split into segments minimizing
//! `sum(segment cost) + penalty * boundaries`, where a segment's cost is its
//! sum of squared deviations from its own mean (mean-shift model). The search
//! considers every admissible earlier boundary. PELT pruning drops a
//! candidate `tau` only once a boundary `s` that dominates it has become
//! admissible itself (`s + min_segment_len` samples have been seen), so the
//! result stays optimal for any minimum segment length.
//!
//! Costs are computed on the signal minus its overall mean. Neither the cost
//! nor the segment-mean comparison depends on a constant offset, and centering
//! keeps `sum(x^2) - sum(x)^2 / n` from cancelling away on offset signals.
//!
//! A boundary `b` is the first sample of a new segment. It is reported as a
//! rising edge when the mean of the segment starting at `b` exceeds the mean
//! of the segment ending at `b`. Run on the negated signal, the same rule
//! yields the falling edges. Boundaries lie in
//! `[min_segment_len, N - min_segment_len]`, so index 0 is never reported.

use log::trace;

use super::TransitionStrategy;
use crate::error::DetectError;

#[derive(Debug, Clone, Copy)]
pub struct ChangePoint {
    penalty: f64,
    min_segment_len: usize,
}

impl ChangePoint {
    /// # Errors
    /// `InvalidInput` when `penalty` is not a positive finite number or
    /// `min_segment_len` is 0.
    pub fn new(penalty: f64, min_segment_len: usize) -> Result<Self, DetectError> {
        if !penalty.is_finite() || penalty <= 0.0 {
            return Err(DetectError::invalid(format!(
                "change point penalty must be a positive finite number, got {penalty}"
            )));
        }
        if min_segment_len == 0 {
            return Err(DetectError::invalid("min_segment_len must be >= 1"));
        }
        Ok(Self {
            penalty,
            min_segment_len,
        })
    }

    pub fn penalty(&self) -> f64 {
        self.penalty
    }

    pub fn min_segment_len(&self) -> usize {
        self.min_segment_len
    }

    /// Optimal segment boundaries, without direction.
    pub fn segment(&self, signal: &[f64]) -> Result<Vec<usize>, DetectError> {
        let n = signal.len();
        let min_len = self.min_segment_len;
        if n < 2 * min_len {
            return Ok(Vec::new());
        }

        let sums = PrefixSums::new(signal);

        // best[t]: optimal penalized cost of signal[..t]; prev[t]: last boundary before t.
        let mut best = vec![f64::INFINITY; n + 1];
        let mut prev = vec![0usize; n + 1];
        best[0] = -self.penalty;
        let mut candidates: Vec<usize> = vec![0];

        for t in min_len..=n {
            // A boundary at t - min_len leaves room for a full segment up to t.
            let fresh = t - min_len;
            if fresh >= min_len {
                // Anything `fresh` strictly beats stays beaten for every later end.
                let bound = best[fresh];
                candidates.retain(|&tau| best[tau] + sums.cost(tau, fresh) <= bound);
                candidates.push(fresh);
            }

            let mut min_cost = f64::INFINITY;
            let mut arg_min = 0;
            for &tau in &candidates {
                let cost = best[tau] + sums.cost(tau, t) + self.penalty;
                if !cost.is_finite() {
                    return Err(DetectError::StrategyComputation {
                        strategy: "change_point",
                        reason: format!("non-finite segmentation cost for {tau}..{t}"),
                    });
                }
                if cost < min_cost {
                    min_cost = cost;
                    arg_min = tau;
                }
            }
            best[t] = min_cost;
            prev[t] = arg_min;
        }
        trace!(
            "change point search: n={n}, surviving candidates={}",
            candidates.len()
        );

        let mut boundaries = Vec::new();
        let mut t = n;
        while prev[t] > 0 {
            t = prev[t];
            boundaries.push(t);
        }
        boundaries.reverse();
        Ok(boundaries)
    }
}

impl TransitionStrategy for ChangePoint {
    fn name(&self) -> &'static str {
        "change_point"
    }

    fn min_len(&self) -> usize {
        2 * self.min_segment_len
    }

    fn rising_edges(&self, signal: &[f64]) -> Result<Vec<usize>, DetectError> {
        let boundaries = self.segment(signal)?;
        let sums = PrefixSums::new(signal);

        let mut edges = Vec::new();
        let mut start = 0;
        for (k, &b) in boundaries.iter().enumerate() {
            let end = boundaries.get(k + 1).copied().unwrap_or(signal.len());
            if sums.mean(b, end) > sums.mean(start, b) {
                edges.push(b);
            }
            start = b;
        }
        Ok(edges)
    }
}

/// Running sums of the centered `x` and `x²` for O(1) segment statistics.
/// Means are relative to the signal mean.
struct PrefixSums {
    sum: Vec<f64>,
    sum_sq: Vec<f64>,
}

impl PrefixSums {
    fn new(signal: &[f64]) -> Self {
        let center = if signal.is_empty() {
            0.0
        } else {
            signal.iter().sum::<f64>() / signal.len() as f64
        };
        let mut sum = Vec::with_capacity(signal.len() + 1);
        let mut sum_sq = Vec::with_capacity(signal.len() + 1);
        sum.push(0.0);
        sum_sq.push(0.0);
        let (mut s, mut s2) = (0.0, 0.0);
        for x in signal.iter().map(|x| x - center) {
            s += x;
            s2 += x * x;
            sum.push(s);
            sum_sq.push(s2);
        }
        Self { sum, sum_sq }
    }

    fn mean(&self, start: usize, end: usize) -> f64 {
        (self.sum[end] - self.sum[start]) / (end - start) as f64
    }

    /// Sum of squared deviations from the mean over `start..end`.
    fn cost(&self, start: usize, end: usize) -> f64 {
        let len = (end - start) as f64;
        let s = self.sum[end] - self.sum[start];
        let s2 = self.sum_sq[end] - self.sum_sq[start];
        let cost = s2 - s * s / len;
        // Cancellation can push a near-zero cost slightly negative. NaN passes through.
        if cost < 0.0 {
            0.0
        } else {
            cost
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic small-amplitude noise in [-amp, amp].
    fn jitter(i: usize, amp: f64) -> f64 {
        ((i as f64 * 12.9898).sin() * 43_758.545_3).fract() * amp
    }

    fn step(low: f64, high: f64, n_low: usize, n_high: usize) -> Vec<f64> {
        (0..n_low + n_high)
            .map(|i| if i < n_low { low } else { high } + jitter(i, 0.05))
            .collect()
    }

    #[test]
    fn single_upward_shift() {
        let signal = step(0.0, 5.0, 50, 50);
        let cp = ChangePoint::new(10.0, 2).unwrap();
        let result = cp.transitions(&signal).unwrap();
        assert_eq!(result.off_to_on.as_slice(), &[50]);
        assert!(result.on_to_off.is_empty());
    }

    #[test]
    fn single_downward_shift() {
        let signal = step(5.0, 0.0, 40, 60);
        let cp = ChangePoint::new(10.0, 2).unwrap();
        let result = cp.transitions(&signal).unwrap();
        assert!(result.off_to_on.is_empty());
        assert_eq!(result.on_to_off.as_slice(), &[40]);
    }

    #[test]
    fn pulse_has_both_edges() {
        let mut signal = vec![0.0; 30];
        signal.extend(vec![3.0; 20]);
        signal.extend(vec![0.0; 30]);
        let result = ChangePoint::new(5.0, 2).unwrap().transitions(&signal).unwrap();
        assert_eq!(result.off_to_on.as_slice(), &[30]);
        assert_eq!(result.on_to_off.as_slice(), &[50]);
    }

    #[test]
    fn constant_signal_has_no_boundaries() {
        let cp = ChangePoint::new(1.0, 2).unwrap();
        assert!(cp.segment(&[4.2; 64]).unwrap().is_empty());
        assert!(cp.transitions(&[4.2; 64]).unwrap().is_empty());
    }

    #[test]
    fn huge_penalty_suppresses_everything() {
        let signal = step(0.0, 5.0, 50, 50);
        let result = ChangePoint::new(1e9, 2).unwrap().transitions(&signal).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn shorter_than_two_segments_is_empty() {
        let cp = ChangePoint::new(1.0, 5).unwrap();
        assert_eq!(cp.min_len(), 10);
        let signal = [0.0, 0.0, 0.0, 9.0, 9.0, 9.0, 9.0, 9.0, 9.0];
        assert!(cp.segment(&signal).unwrap().is_empty());
    }

    #[test]
    fn boundaries_respect_min_segment_len() {
        // A one-sample spike cannot form its own segment with min length 3.
        let mut signal = vec![0.0; 20];
        signal[10] = 50.0;
        let boundaries = ChangePoint::new(0.1, 3).unwrap().segment(&signal).unwrap();
        let mut start = 0;
        for &b in boundaries.iter().chain(std::iter::once(&signal.len())) {
            assert!(b - start >= 3, "segment {start}..{b} too short");
            start = b;
        }
    }

    #[test]
    fn overflowing_values_fail_instead_of_guessing() {
        let signal = [1e300, -1e300, 1e300, -1e300, 1e300, -1e300];
        let err = ChangePoint::new(1.0, 1).unwrap().segment(&signal).unwrap_err();
        assert!(matches!(err, DetectError::StrategyComputation { .. }));
    }

    #[test]
    fn prefix_sum_cost_matches_direct() {
        let signal = [1.0, 2.0, 4.0, 8.0];
        let sums = PrefixSums::new(&signal);
        // mean 3.75, deviations: -2.75, -1.75, 0.25, 4.25
        let direct: f64 = [7.5625, 3.0625, 0.0625, 18.0625].iter().sum();
        assert!((sums.cost(0, 4) - direct).abs() < 1e-9);
        // Means are relative to the signal mean: 3.0 - 3.75.
        assert_eq!(sums.mean(1, 3), -0.75);
    }

    #[test]
    fn rejects_zero_min_segment_len_and_bad_penalty() {
        assert!(ChangePoint::new(1.0, 0).unwrap_err().is_invalid_input());
        for penalty in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(ChangePoint::new(penalty, 2).unwrap_err().is_invalid_input());
        }
    }

    /// Penalized cost of a segmentation, computed directly from the samples.
    fn segmentation_cost(signal: &[f64], boundaries: &[usize], penalty: f64) -> f64 {
        let mut total = penalty * boundaries.len() as f64;
        let mut start = 0;
        for &end in boundaries.iter().chain(std::iter::once(&signal.len())) {
            let seg = &signal[start..end];
            let mean = seg.iter().sum::<f64>() / seg.len() as f64;
            total += seg.iter().map(|x| (x - mean).powi(2)).sum::<f64>();
            start = end;
        }
        total
    }

    /// Unpruned O(n²) dynamic program over every admissible last boundary.
    fn optimal_cost(signal: &[f64], penalty: f64, min_len: usize) -> f64 {
        let n = signal.len();
        let mut best = vec![f64::INFINITY; n + 1];
        best[0] = -penalty;
        for t in min_len..=n {
            for tau in (0..=t - min_len).filter(|&tau| tau == 0 || tau >= min_len) {
                let c = best[tau] + segmentation_cost(&signal[tau..t], &[], 0.0) + penalty;
                best[t] = best[t].min(c);
            }
        }
        best[n]
    }

    #[test]
    fn skips_split_that_no_segmentation_beats() {
        let signal = [0.0, 5.0, 8.0, 3.0, 7.0, 6.0, 5.0, 0.0];
        let boundaries = ChangePoint::new(2.0, 3).unwrap().segment(&signal).unwrap();
        assert!(boundaries.is_empty(), "got {boundaries:?}");
        assert!((segmentation_cost(&signal, &boundaries, 2.0) - 63.5).abs() < 1e-9);
    }

    #[test]
    fn matches_unpruned_search_for_every_min_len() {
        // Small integer signals from a fixed LCG.
        let mut state: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = move || {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            (state >> 33) % 10
        };
        for round in 0..300 {
            let len = 6 + round % 20;
            let signal: Vec<f64> = (0..len).map(|_| next() as f64).collect();
            for min_len in 1..=4 {
                for penalty in [0.5, 2.0, 8.0] {
                    let cp = ChangePoint::new(penalty, min_len).unwrap();
                    let boundaries = cp.segment(&signal).unwrap();
                    let got = segmentation_cost(&signal, &boundaries, penalty);
                    let want = if len < 2 * min_len {
                        segmentation_cost(&signal, &[], penalty)
                    } else {
                        optimal_cost(&signal, penalty, min_len)
                    };
                    assert!(
                        got <= want + 1e-6,
                        "{signal:?} min_len={min_len} pen={penalty}: {boundaries:?} costs {got}, optimum {want}"
                    );
                }
            }
        }
    }

    #[test]
    fn large_offset_does_not_change_boundaries() {
        let base = step(0.0, 5.0, 50, 50);
        let cp = ChangePoint::new(10.0, 2).unwrap();
        let expected = cp.transitions(&base).unwrap();
        assert_eq!(expected.off_to_on.as_slice(), &[50]);
        for offset in [1e6, 1e8, -1e9] {
            let shifted: Vec<f64> = base.iter().map(|x| x + offset).collect();
            assert_eq!(cp.transitions(&shifted).unwrap(), expected, "offset {offset}");
        }
    }
}
