//! Ordered feature selections and their CSV output.

use crate::error::Result;
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tempfile::{Builder, NamedTempFile};

/// A selected feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedFeature {
    /// 0-based position of the feature in the input table.
    pub row: usize,
    /// Feature identifier.
    pub id: String,
    /// The bound the feature was ranked by.
    pub bound: f64,
}

/// An ordered list of selected features, most extreme first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Selection {
    /// Label of the identifier column (header of the output).
    pub id_label: String,
    /// Selected features in rank order.
    pub features: Vec<SelectedFeature>,
}

impl Selection {
    /// Create a new selection.
    pub fn new(id_label: String, features: Vec<SelectedFeature>) -> Self {
        Self { id_label, features }
    }

    /// Number of selected features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Feature identifiers in rank order.
    pub fn ids(&self) -> Vec<&str> {
        self.features.iter().map(|f| f.id.as_str()).collect()
    }

    /// Iterate over selected features.
    pub fn iter(&self) -> impl Iterator<Item = &SelectedFeature> {
        self.features.iter()
    }

    /// Write the selection as CSV.
    ///
    /// Format: a header `,<id label>` followed by one `<row>,<id>` line per
    /// feature, where `<row>` is the feature's position in the input table.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = WriterBuilder::new().from_writer(writer);
        writer.write_record(["", self.id_label.as_str()])?;
        for f in &self.features {
            writer.write_record([f.row.to_string().as_str(), f.id.as_str()])?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write the selection as CSV to a temporary file next to `path`.
    ///
    /// The returned file is complete on disk; call `persist(path)` to move it
    /// into place.
    pub fn stage_csv<P: AsRef<Path>>(&self, path: P) -> Result<NamedTempFile> {
        let dir = match path.as_ref().parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut builder = Builder::new();
        // Same mode as an ordinary new file (0666 less umask), not tempfile's 0600
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(std::fs::Permissions::from_mode(0o666));
        }
        let mut tmp = builder.tempfile_in(dir)?;
        self.write_csv(tmp.as_file_mut())?;
        tmp.as_file().sync_all()?;
        Ok(tmp)
    }

    /// Write the selection to a CSV file.
    ///
    /// A failed write never leaves a truncated output behind.
    pub fn to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.stage_csv(path.as_ref())?.persist(path.as_ref())?;
        Ok(())
    }
}
