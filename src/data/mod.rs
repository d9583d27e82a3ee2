//! Data structures for results tables and feature selections.

mod selection;
mod table;

pub use selection::{SelectedFeature, Selection};
pub use table::{FeatureRecord, FeatureTable, LFC_SE, LOG2_FOLD_CHANGE, UNNAMED_INDEX};
