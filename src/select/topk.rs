//! Bounded top-K selection with a binary heap.
//!
//! Keeps at most `top_n` candidates while scanning the features once, for
//! O(N log K) instead of the O(N log N) full sort. Candidates are ranked by
//! `(bound, row)`, which reproduces the stable sort's tie order exactly.

use super::Direction;
use crate::interval::BoundedFeature;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Total ranking key: smaller is more extreme.
#[derive(Debug, Clone, Copy)]
struct Rank {
    nan: bool,
    key: f64,
    row: usize,
}

impl Rank {
    fn new(bound: f64, row: usize, direction: Direction) -> Self {
        let key = match direction {
            Direction::Negative => bound,
            Direction::Positive => -bound,
        };
        // -0.0 and 0.0 tie, as they do under partial_cmp
        let key = if key == 0.0 { 0.0 } else { key };
        Self {
            nan: bound.is_nan(),
            key,
            row,
        }
    }
}

impl Ord for Rank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.nan
            .cmp(&other.nan)
            .then_with(|| {
                if self.nan {
                    Ordering::Equal
                } else {
                    self.key.total_cmp(&other.key)
                }
            })
            .then_with(|| self.row.cmp(&other.row))
    }
}

impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Rank {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Rank {}

/// Keep the `top_n` most extreme features using a bounded max-heap.
pub fn top_by_heap<'a>(
    features: &[BoundedFeature<'a>],
    direction: Direction,
    top_n: usize,
) -> Vec<BoundedFeature<'a>> {
    if top_n == 0 {
        return Vec::new();
    }

    // The heap's maximum is the least extreme candidate kept so far
    let mut heap: BinaryHeap<(Rank, usize)> =
        BinaryHeap::with_capacity(top_n.min(features.len()));
    for (idx, feature) in features.iter().enumerate() {
        let rank = Rank::new(direction.key(feature), feature.record.row, direction);
        if heap.len() < top_n {
            heap.push((rank, idx));
        } else if let Some(worst) = heap.peek() {
            if rank < worst.0 {
                heap.pop();
                heap.push((rank, idx));
            }
        }
    }

    heap.into_sorted_vec()
        .into_iter()
        .map(|(_, idx)| features[idx])
        .collect()
}
