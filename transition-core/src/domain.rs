//! Domain types: transition kinds, index sets and the detection result record.
//!
//! A `TransitionSet` is always strictly increasing. Every constructor either
//! normalizes its input or is crate-private and fed by code that already
//! produces sorted, unique indices.

use serde::{Deserialize, Serialize};

/// Direction of a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionKind {
    /// Low/baseline regime to high/active regime.
    OffToOn,
    /// High/active regime back to low/baseline.
    OnToOff,
}

impl TransitionKind {
    pub fn opposite(self) -> Self {
        match self {
            Self::OffToOn => Self::OnToOff,
            Self::OnToOff => Self::OffToOn,
        }
    }
}

/// Strictly increasing sample indices at which one kind of transition occurs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<usize>", into = "Vec<usize>")]
pub struct TransitionSet(Vec<usize>);

impl TransitionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from arbitrary indices: sorted and de-duplicated.
    pub fn from_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        let mut v: Vec<usize> = indices.into_iter().collect();
        v.sort_unstable();
        v.dedup();
        Self(v)
    }

    /// Wrap indices already known to be strictly increasing.
    pub(crate) fn from_sorted(indices: Vec<usize>) -> Self {
        debug_assert!(
            indices.windows(2).all(|w| w[0] < w[1]),
            "transition indices must be strictly increasing"
        );
        Self(indices)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn first(&self) -> Option<usize> {
        self.0.first().copied()
    }

    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.0.binary_search(&index).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    pub fn into_vec(self) -> Vec<usize> {
        self.0
    }
}

impl From<Vec<usize>> for TransitionSet {
    fn from(indices: Vec<usize>) -> Self {
        Self::from_indices(indices)
    }
}

impl From<TransitionSet> for Vec<usize> {
    fn from(set: TransitionSet) -> Self {
        set.0
    }
}

impl<'a> IntoIterator for &'a TransitionSet {
    type Item = usize;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, usize>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}

/// A single transition, used when both kinds are walked together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionEvent {
    pub index: usize,
    pub kind: TransitionKind,
}

/// Output of one detection run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub off_to_on: TransitionSet,
    pub on_to_off: TransitionSet,
}

impl DetectionResult {
    pub fn new(off_to_on: TransitionSet, on_to_off: TransitionSet) -> Self {
        Self {
            off_to_on,
            on_to_off,
        }
    }

    pub fn get(&self, kind: TransitionKind) -> &TransitionSet {
        match kind {
            TransitionKind::OffToOn => &self.off_to_on,
            TransitionKind::OnToOff => &self.on_to_off,
        }
    }

    /// Earliest transition of `kind`, `None` when there is none.
    pub fn first(&self, kind: TransitionKind) -> Option<usize> {
        self.get(kind).first()
    }

    /// Latest transition of `kind`, `None` when there is none.
    pub fn last(&self, kind: TransitionKind) -> Option<usize> {
        self.get(kind).last()
    }

    pub fn first_off_to_on(&self) -> Option<usize> {
        self.first(TransitionKind::OffToOn)
    }

    pub fn last_off_to_on(&self) -> Option<usize> {
        self.last(TransitionKind::OffToOn)
    }

    pub fn first_on_to_off(&self) -> Option<usize> {
        self.first(TransitionKind::OnToOff)
    }

    pub fn last_on_to_off(&self) -> Option<usize> {
        self.last(TransitionKind::OnToOff)
    }

    /// Total number of transitions of both kinds.
    pub fn total(&self) -> usize {
        self.off_to_on.len() + self.on_to_off.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Both kinds merged in index order. On equal indices `OffToOn` comes first.
    pub fn events(&self) -> Vec<TransitionEvent> {
        let on = self.off_to_on.as_slice();
        let off = self.on_to_off.as_slice();
        let mut out = Vec::with_capacity(on.len() + off.len());
        let (mut i, mut j) = (0, 0);
        while i < on.len() || j < off.len() {
            let take_on = match (on.get(i), off.get(j)) {
                (Some(a), Some(b)) => a <= b,
                (Some(_), None) => true,
                _ => false,
            };
            if take_on {
                out.push(TransitionEvent {
                    index: on[i],
                    kind: TransitionKind::OffToOn,
                });
                i += 1;
            } else {
                out.push(TransitionEvent {
                    index: off[j],
                    kind: TransitionKind::OnToOff,
                });
                j += 1;
            }
        }
        out
    }
}
