//! Normal-approximation confidence bounds for log2 fold changes.
//!
//! Each feature gets a lower bound `CI_5 = lfc - z * se` and an upper bound
//! `CI_95 = lfc + z * se`. With the default `z = 1.96` this is the usual
//! two-sided 95% interval.

use crate::data::{FeatureRecord, FeatureTable};
use crate::error::{ExtractError, Result};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

/// Default interval multiplier.
pub const DEFAULT_Z: f64 = 1.96;

/// Width of the confidence interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalWidth {
    /// Fixed number of standard errors on each side.
    Multiplier(f64),
    /// Two-sided confidence level (0-1), converted to a normal quantile.
    Level(f64),
}

impl Default for IntervalWidth {
    fn default() -> Self {
        Self::Multiplier(DEFAULT_Z)
    }
}

impl IntervalWidth {
    /// The number of standard errors on each side of the estimate.
    pub fn z(&self) -> Result<f64> {
        match *self {
            Self::Multiplier(z) => {
                if !z.is_finite() || z < 0.0 {
                    return Err(ExtractError::InvalidParameter(format!(
                        "Interval multiplier must be finite and non-negative, got {}",
                        z
                    )));
                }
                Ok(z)
            }
            Self::Level(level) => {
                if !(level > 0.0 && level < 1.0) {
                    return Err(ExtractError::InvalidParameter(format!(
                        "Confidence level must be between 0 and 1 (exclusive), got {}",
                        level
                    )));
                }
                let normal = Normal::new(0.0, 1.0)
                    .map_err(|e| ExtractError::InvalidParameter(e.to_string()))?;
                Ok(normal.inverse_cdf(0.5 + level / 2.0))
            }
        }
    }
}

/// How to treat features whose standard error is negative or missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SePolicy {
    /// Compute bounds anyway; they may be inverted or NaN.
    #[default]
    PassThrough,
    /// Leave such features out of both selections.
    Skip,
    /// Fail on the first such feature.
    Reject,
}

/// Lower and upper confidence bounds of one feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Lower bound (`CI_5`).
    pub ci_5: f64,
    /// Upper bound (`CI_95`).
    pub ci_95: f64,
}

impl Bounds {
    /// Compute bounds for an estimate and its standard error.
    #[inline]
    pub fn new(log2_fold_change: f64, lfc_se: f64, z: f64) -> Self {
        Self {
            ci_5: log2_fold_change - lfc_se * z,
            ci_95: log2_fold_change + lfc_se * z,
        }
    }

    /// Check whether the bounds enclose `value`.
    pub fn contains(&self, value: f64) -> bool {
        self.ci_5 <= value && value <= self.ci_95
    }
}

/// A feature together with its confidence bounds.
#[derive(Debug, Clone, Copy)]
pub struct BoundedFeature<'a> {
    /// The feature as read from the table.
    pub record: &'a FeatureRecord,
    /// Its confidence bounds.
    pub bounds: Bounds,
}

fn is_invalid(record: &FeatureRecord) -> bool {
    record.lfc_se.is_nan() || record.lfc_se < 0.0 || record.log2_fold_change.is_nan()
}

/// Compute confidence bounds for every feature in a table.
///
/// Features come back in input order. Under [`SePolicy::Skip`] invalid
/// features are dropped; under [`SePolicy::Reject`] the first one is an error.
pub fn compute_bounds<'a>(
    table: &'a FeatureTable,
    width: IntervalWidth,
    policy: SePolicy,
) -> Result<Vec<BoundedFeature<'a>>> {
    let z = width.z()?;
    let mut bounded = Vec::with_capacity(table.len());
    let mut n_skipped = 0usize;

    for record in table.records() {
        if policy != SePolicy::PassThrough && is_invalid(record) {
            match policy {
                SePolicy::Reject if record.log2_fold_change.is_nan() => {
                    return Err(ExtractError::InvalidEstimate {
                        feature_id: record.id.clone(),
                        value: record.log2_fold_change,
                        row: record.row,
                    });
                }
                SePolicy::Reject => {
                    return Err(ExtractError::InvalidStandardError {
                        feature_id: record.id.clone(),
                        value: record.lfc_se,
                        row: record.row,
                    });
                }
                _ => {
                    log::warn!(
                        "Skipping '{}' (row {}): log2FoldChange={}, lfcSE={}",
                        record.id,
                        record.row,
                        record.log2_fold_change,
                        record.lfc_se
                    );
                    n_skipped += 1;
                    continue;
                }
            }
        }
        bounded.push(BoundedFeature {
            record,
            bounds: Bounds::new(record.log2_fold_change, record.lfc_se, z),
        });
    }

    if n_skipped > 0 {
        log::info!("Skipped {} features with invalid estimates", n_skipped);
    }
    Ok(bounded)
}
