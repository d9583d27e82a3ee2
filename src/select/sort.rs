//! Full stable sort, then truncate.

use super::Direction;
use crate::interval::BoundedFeature;
use std::cmp::Ordering;

/// Compare two bounds for ranking. NaN ranks last in either direction.
pub(crate) fn compare_bounds(a: f64, b: f64, direction: Direction) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ord = match direction {
                Direction::Negative => a.partial_cmp(&b),
                Direction::Positive => b.partial_cmp(&a),
            };
            ord.unwrap_or(Ordering::Equal)
        }
    }
}

/// Rank all features and keep the first `top_n`.
///
/// `slice::sort_by` is stable, so equal bounds keep input order.
pub fn top_by_sort<'a>(
    features: &[BoundedFeature<'a>],
    direction: Direction,
    top_n: usize,
) -> Vec<BoundedFeature<'a>> {
    let mut sorted = features.to_vec();
    sorted.sort_by(|a, b| compare_bounds(direction.key(a), direction.key(b), direction));
    sorted.truncate(top_n);
    sorted
}
