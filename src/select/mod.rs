//! Selection of the most negatively and positively associated features.
//!
//! The negative set ranks features by upper bound (`CI_95`) ascending: a
//! feature whose whole interval sits far below zero ranks first. The positive
//! set ranks by lower bound (`CI_5`) descending.

pub mod sort;
pub mod topk;

pub use sort::top_by_sort;
pub use topk::top_by_heap;

use crate::data::{FeatureTable, SelectedFeature, Selection};
use crate::error::Result;
use crate::interval::{compute_bounds, BoundedFeature};
use crate::pipeline::ExtractConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default number of features per selection.
pub const DEFAULT_TOP_N: usize = 100;

/// Which end of the effect-size distribution to select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Lowest upper bound first.
    Negative,
    /// Highest lower bound first.
    Positive,
}

impl Direction {
    /// The bound this direction ranks by.
    #[inline]
    pub fn key(&self, feature: &BoundedFeature<'_>) -> f64 {
        match self {
            Self::Negative => feature.bounds.ci_95,
            Self::Positive => feature.bounds.ci_5,
        }
    }

    /// Get the descriptive name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Negative => "negative",
            Self::Positive => "positive",
        }
    }
}

/// Algorithm used to pick the top features. Both give identical results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    /// Stable sort of all features, then truncate.
    #[default]
    Sort,
    /// Single pass with a bounded heap of `top_n` candidates.
    Heap,
}

/// Both selections from one results table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extremes {
    /// Most negatively associated features.
    pub negative: Selection,
    /// Most positively associated features.
    pub positive: Selection,
    /// Rows in the input table.
    pub n_features: usize,
    /// Rows eligible for ranking (after the standard-error policy).
    pub n_ranked: usize,
}

/// Select the top features in one direction.
pub fn select_direction(
    features: &[BoundedFeature<'_>],
    direction: Direction,
    top_n: usize,
    strategy: SelectionStrategy,
    id_label: &str,
) -> Selection {
    let top = match strategy {
        SelectionStrategy::Sort => top_by_sort(features, direction, top_n),
        SelectionStrategy::Heap => top_by_heap(features, direction, top_n),
    };
    let selected = top
        .iter()
        .map(|f| SelectedFeature {
            row: f.record.row,
            id: f.record.id.clone(),
            bound: direction.key(f),
        })
        .collect();
    Selection::new(id_label.to_string(), selected)
}

/// Select the most negatively and positively associated features of a table.
///
/// # Arguments
/// * `table` - Parsed results table
/// * `config` - Selection parameters (top N, interval width, SE policy, strategy)
///
/// # Returns
/// Negative and positive selections, each of length `min(top_n, ranked rows)`.
pub fn select_extremes(table: &FeatureTable, config: &ExtractConfig) -> Result<Extremes> {
    let bounded = compute_bounds(table, config.width, config.se_policy)?;
    log::debug!(
        "Ranking {} of {} features (top {}, {:?})",
        bounded.len(),
        table.len(),
        config.top_n,
        config.strategy
    );

    let [negative, positive] = [Direction::Negative, Direction::Positive].map(|direction| {
        select_direction(
            &bounded,
            direction,
            config.top_n,
            config.strategy,
            table.id_label(),
        )
    });

    Ok(Extremes {
        negative,
        positive,
        n_features: table.len(),
        n_ranked: bounded.len(),
    })
}

/// Load a results table and select its extremes.
pub fn select_extremes_from_path<P: AsRef<Path>>(
    path: P,
    config: &ExtractConfig,
) -> Result<Extremes> {
    let table = FeatureTable::from_tsv(path, config.id_column.as_deref())?;
    select_extremes(&table, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FeatureRecord;

    fn table(rows: &[(&str, f64, f64)]) -> FeatureTable {
        let records = rows
            .iter()
            .enumerate()
            .map(|(row, &(id, lfc, se))| FeatureRecord {
                row,
                id: id.to_string(),
                log2_fold_change: lfc,
                lfc_se: se,
            })
            .collect();
        FeatureTable::new(records, "Unnamed: 0")
    }

    /// Deterministic pseudo-random table with many exact ties.
    fn tied_table(n: usize) -> FeatureTable {
        let mut seed = 7u64;
        let mut next = || {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (seed >> 33) % 9
        };
        let rows: Vec<(String, f64, f64)> = (0..n)
            .map(|i| {
                let lfc = next() as f64 - 4.0;
                let se = (next() % 3) as f64 * 0.5;
                let lfc = if i % 37 == 0 { f64::NAN } else { lfc };
                (format!("taxon_{}", i), lfc, se)
            })
            .collect();
        let borrowed: Vec<(&str, f64, f64)> =
            rows.iter().map(|(id, l, s)| (id.as_str(), *l, *s)).collect();
        table(&borrowed)
    }

    #[test]
    fn test_scenario_three_rows() {
        let t = table(&[("X", 2.0, 0.1), ("Y", -3.0, 0.2), ("Z", 0.5, 5.0)]);
        let extremes = select_extremes(&t, &ExtractConfig::default()).unwrap();

        assert_eq!(extremes.negative.ids(), vec!["Y", "X", "Z"]);
        // CI_5: X=1.804, Y=-3.392, Z=-9.3
        assert_eq!(extremes.positive.ids(), vec!["X", "Y", "Z"]);
        assert_eq!(extremes.n_features, 3);
    }

    #[test]
    fn test_truncates_to_top_n() {
        let t = tied_table(250);
        let extremes = select_extremes(&t, &ExtractConfig::default()).unwrap();
        assert_eq!(extremes.negative.len(), DEFAULT_TOP_N);
        assert_eq!(extremes.positive.len(), DEFAULT_TOP_N);

        let config = ExtractConfig {
            top_n: 0,
            ..Default::default()
        };
        let extremes = select_extremes(&t, &config).unwrap();
        assert!(extremes.negative.is_empty());
        assert!(extremes.positive.is_empty());
    }

    #[test]
    fn test_sorted_and_exclusive() {
        let t = tied_table(300);
        let extremes = select_extremes(&t, &ExtractConfig::default()).unwrap();

        let neg: Vec<f64> = extremes.negative.iter().map(|f| f.bound).collect();
        assert!(neg.windows(2).all(|w| w[0] <= w[1]));
        let pos: Vec<f64> = extremes.positive.iter().map(|f| f.bound).collect();
        assert!(pos.windows(2).all(|w| w[0] >= w[1]));

        // No excluded feature beats the last included one
        let bounded = compute_bounds(&t, Default::default(), Default::default()).unwrap();
        let included: Vec<usize> = extremes.negative.iter().map(|f| f.row).collect();
        let worst = *neg.last().unwrap();
        for f in bounded.iter().filter(|f| !included.contains(&f.record.row)) {
            let b = f.bounds.ci_95;
            assert!(b.is_nan() || b >= worst);
        }
    }

    #[test]
    fn test_ties_keep_input_order() {
        let t = table(&[("a", 1.0, 0.0), ("b", 0.0, 0.0), ("c", 1.0, 0.0), ("d", 0.0, 0.0)]);
        let extremes = select_extremes(&t, &ExtractConfig::default()).unwrap();
        assert_eq!(extremes.negative.ids(), vec!["b", "d", "a", "c"]);
        assert_eq!(extremes.positive.ids(), vec!["a", "c", "b", "d"]);
    }

    #[test]
    fn test_nan_ranks_last_both_ways() {
        let t = table(&[("n", f64::NAN, 0.1), ("a", 1.0, 0.1), ("b", -1.0, 0.1)]);
        let extremes = select_extremes(&t, &ExtractConfig::default()).unwrap();
        assert_eq!(extremes.negative.ids(), vec!["b", "a", "n"]);
        assert_eq!(extremes.positive.ids(), vec!["a", "b", "n"]);
    }

    #[test]
    fn test_heap_matches_sort() {
        let t = tied_table(500);
        for top_n in [0, 1, 7, 100, 499, 500, 1000] {
            let sort = ExtractConfig {
                top_n,
                ..Default::default()
            };
            let heap = ExtractConfig {
                top_n,
                strategy: SelectionStrategy::Heap,
                ..Default::default()
            };
            let a = select_extremes(&t, &sort).unwrap();
            let b = select_extremes(&t, &heap).unwrap();
            assert_eq!(a.negative.ids(), b.negative.ids(), "negative, top_n={}", top_n);
            assert_eq!(a.positive.ids(), b.positive.ids(), "positive, top_n={}", top_n);
        }
    }

    #[test]
    fn test_heap_with_huge_top_n() {
        let t = tied_table(40);
        for top_n in [1usize << 40, usize::MAX] {
            let config = ExtractConfig::new()
                .top_n(top_n)
                .strategy(SelectionStrategy::Heap);
            let heap = select_extremes(&t, &config).unwrap();
            let sort = select_extremes(&t, &config.clone().strategy(SelectionStrategy::Sort)).unwrap();
            assert_eq!(heap.negative.len(), 40);
            assert_eq!(heap.positive.len(), 40);
            assert_eq!(heap.negative.ids(), sort.negative.ids());
            assert_eq!(heap.positive.ids(), sort.positive.ids());
        }
    }

    #[test]
    fn test_empty_table() {
        let t = table(&[]);
        let extremes = select_extremes(&t, &ExtractConfig::default()).unwrap();
        assert!(extremes.negative.is_empty());
        assert!(extremes.positive.is_empty());
    }
}
