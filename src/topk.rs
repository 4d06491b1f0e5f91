//! Bounded selection of the highest-ranked candidate links.

use std::cmp::Ordering;

use serde::Serialize;

use crate::error::{LinkError, Result};
use crate::graph::VertexId;

/// A scored candidate edge between `u` and `v`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Link {
    /// Smaller endpoint.
    pub u: VertexId,
    /// Larger endpoint.
    pub v: VertexId,
    /// Metric score; higher ranks first.
    pub score: f64,
}

impl Link {
    /// Creates a link.
    pub fn new(u: VertexId, v: VertexId, score: f64) -> Self {
        Self { u, v, score }
    }

    /// Ranking order: higher score first, then smaller `u`, then smaller `v`.
    ///
    /// `Ordering::Greater` means `self` ranks above `other`. Scores use the
    /// IEEE total order so the comparison is total even for NaN.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.u.cmp(&self.u))
            .then_with(|| other.v.cmp(&self.v))
    }

    /// Returns `true` when `self` ranks strictly above `other`.
    pub fn outranks(&self, other: &Self) -> bool {
        self.rank_cmp(other) == Ordering::Greater
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Slot {
    /// Not yet written; ranks below every link.
    Unfilled,
    Filled(Link),
    /// Popped during extraction; ranks above every link.
    Drained,
}

impl Slot {
    fn tier(&self) -> u8 {
        match self {
            Slot::Unfilled => 0,
            Slot::Filled(_) => 1,
            Slot::Drained => 2,
        }
    }

    fn rank_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Slot::Filled(a), Slot::Filled(b)) => a.rank_cmp(b),
            _ => self.tier().cmp(&other.tier()),
        }
    }
}

/// Fixed-capacity min-heap holding the `k` best links seen so far.
///
/// The root is the weakest resident link, so a candidate only has to beat the
/// root to get in.
#[derive(Clone, Debug)]
pub struct TopK {
    slots: Vec<Slot>,
}

impl TopK {
    /// Creates a selector for the best `k` links.
    pub fn new(k: usize) -> Result<Self> {
        if k == 0 {
            return Err(LinkError::InvalidArgument(
                "top-k capacity must be at least 1".into(),
            ));
        }
        Ok(Self {
            slots: vec![Slot::Unfilled; k],
        })
    }

    /// Maximum number of resident links.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots holding a link.
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Filled(_)))
            .count()
    }

    /// Returns `true` when no link has been accepted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The weakest resident link once every slot is filled.
    pub fn weakest(&self) -> Option<&Link> {
        match &self.slots[0] {
            Slot::Filled(link) => Some(link),
            _ => None,
        }
    }

    /// Inserts `link` if it outranks the weakest resident. Returns whether it
    /// was kept.
    pub fn try_insert(&mut self, link: Link) -> bool {
        let candidate = Slot::Filled(link);
        if candidate.rank_cmp(&self.slots[0]) != Ordering::Greater {
            return false;
        }
        self.slots[0] = candidate;
        self.sift_down(0);
        true
    }

    /// Returns the resident links best-first.
    ///
    /// The heap is drained one root at a time and then rebuilt from the
    /// ascending sequence, which is itself a valid min-heap, so the selector
    /// keeps accepting inserts afterwards.
    pub fn extract_ranked_descending(&mut self) -> Vec<Link> {
        let k = self.slots.len();
        let mut ascending = Vec::with_capacity(k);
        for _ in 0..k {
            ascending.push(self.slots[0]);
            self.slots[0] = Slot::Drained;
            self.sift_down(0);
        }
        self.slots.copy_from_slice(&ascending);
        ascending
            .iter()
            .rev()
            .filter_map(|slot| match slot {
                Slot::Filled(link) => Some(*link),
                _ => None,
            })
            .collect()
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.slots.len();
        loop {
            let left = 2 * index + 1;
            if left >= len {
                return;
            }
            let right = left + 1;
            let weaker = if right < len
                && self.slots[right].rank_cmp(&self.slots[left]) == Ordering::Less
            {
                right
            } else {
                left
            };
            if self.slots[weaker].rank_cmp(&self.slots[index]) != Ordering::Less {
                return;
            }
            self.slots.swap(index, weaker);
            index = weaker;
        }
    }

    #[cfg(test)]
    fn is_min_heap(&self) -> bool {
        (1..self.slots.len())
            .all(|i| self.slots[(i - 1) / 2].rank_cmp(&self.slots[i]) != Ordering::Greater)
    }
}
