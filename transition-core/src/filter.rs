//! Minimum-duration filter applied to every strategy's raw output.
//!
//! Works on indices only and never looks at signal values. The first
//! transition of a set is always kept (its virtual predecessor sits at
//! negative infinity); each later transition is kept only if it lies at
//! least `min_duration` samples after the previously *kept* transition.

use log::debug;

use crate::domain::TransitionSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DurationFilter {
    min_duration: usize,
}

impl DurationFilter {
    pub fn new(min_duration: usize) -> Self {
        Self { min_duration }
    }

    pub fn min_duration(&self) -> usize {
        self.min_duration
    }

    /// True when the filter cannot drop anything.
    pub fn is_noop(&self) -> bool {
        self.min_duration == 0
    }

    pub fn apply(&self, transitions: &TransitionSet) -> TransitionSet {
        if self.is_noop() {
            return transitions.clone();
        }

        let mut kept = Vec::with_capacity(transitions.len());
        let mut last_kept: Option<usize> = None;
        for index in transitions {
            let keep = match last_kept {
                None => true,
                Some(prev) => index - prev >= self.min_duration,
            };
            if keep {
                kept.push(index);
                last_kept = Some(index);
            }
        }

        let dropped = transitions.len() - kept.len();
        if dropped > 0 {
            debug!(
                "duration filter (min {}) dropped {dropped} of {} transitions",
                self.min_duration,
                transitions.len()
            );
        }
        TransitionSet::from_sorted(kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(indices: &[usize]) -> TransitionSet {
        TransitionSet::from_indices(indices.iter().copied())
    }

    #[test]
    fn zero_threshold_is_identity() {
        let input = set(&[0, 1, 2, 3, 50]);
        let filter = DurationFilter::new(0);
        assert!(filter.is_noop());
        assert_eq!(filter.apply(&input), input);
    }

    #[test]
    fn gaps_measured_from_last_retained() {
        let filter = DurationFilter::new(5);
        assert_eq!(filter.apply(&set(&[2, 3, 10, 11, 25])).as_slice(), &[2, 10, 25]);
    }

    #[test]
    fn first_transition_always_kept() {
        // Index 0 survives even though no prior transition exists.
        let filter = DurationFilter::new(100);
        assert_eq!(filter.apply(&set(&[0, 40, 99, 100])).as_slice(), &[0, 100]);
    }

    #[test]
    fn last_transition_is_checked_too() {
        let filter = DurationFilter::new(4);
        assert_eq!(filter.apply(&set(&[10, 20, 22])).as_slice(), &[10, 20]);
    }

    #[test]
    fn chained_close_transitions_collapse_to_anchors() {
        // 1,2,3,4 all lie within 4 of anchor 0; 4 is exactly 4 away and survives.
        let filter = DurationFilter::new(4);
        assert_eq!(filter.apply(&set(&[0, 1, 2, 3, 4, 5])).as_slice(), &[0, 4]);
    }

    #[test]
    fn empty_and_single_sets() {
        let filter = DurationFilter::new(3);
        assert!(filter.apply(&TransitionSet::new()).is_empty());
        assert_eq!(filter.apply(&set(&[7])).as_slice(), &[7]);
    }
}
