//! Extreme taxa from differential abundance results.
//!
//! This library picks the most negatively and positively associated features
//! (taxa) from a DESeq2-style results table, ranking each feature by a
//! normal-approximation confidence bound on its log2 fold change.
//!
//! # Overview
//!
//! - **data**: Results table parsing and feature selections
//! - **interval**: Confidence bounds (`CI_5`, `CI_95`) and standard-error policy
//! - **select**: Top-N selection by full sort or bounded heap
//! - **pipeline**: Configuration and end-to-end execution
//!
//! # Example
//!
//! ```no_run
//! use taxa_extremes::prelude::*;
//!
//! let table = FeatureTable::from_tsv("deseq2_results.tsv", None).unwrap();
//! let extremes = select_extremes(&table, &ExtractConfig::default()).unwrap();
//!
//! extremes.negative.to_csv("negative.csv").unwrap();
//! extremes.positive.to_csv("positive.csv").unwrap();
//! ```

pub mod data;
pub mod error;
pub mod interval;
pub mod pipeline;
pub mod select;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::data::{FeatureRecord, FeatureTable, SelectedFeature, Selection};
    pub use crate::error::{ErrorClass, ExtractError, Result};
    pub use crate::interval::{compute_bounds, BoundedFeature, Bounds, IntervalWidth, SePolicy};
    pub use crate::pipeline::{run_extraction, ExtractConfig};
    pub use crate::select::{
        select_extremes, select_extremes_from_path, Direction, Extremes, SelectionStrategy,
    };
}
