//! Differential abundance results tables (DESeq2-style TSV).

use crate::error::{ExtractError, Result};
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Column holding the effect size estimate.
pub const LOG2_FOLD_CHANGE: &str = "log2FoldChange";
/// Column holding the standard error of the effect size.
pub const LFC_SE: &str = "lfcSE";
/// Label given to an unnamed leading index column.
pub const UNNAMED_INDEX: &str = "Unnamed: 0";

/// Cell values read as missing (NaN).
const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// One feature (taxon) from a results table.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    /// 0-based position of the row in the input.
    pub row: usize,
    /// Feature identifier.
    pub id: String,
    /// Estimated log2 fold change.
    pub log2_fold_change: f64,
    /// Standard error of the log2 fold change.
    pub lfc_se: f64,
}

/// Where the feature identifier lives in each data row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IdSource {
    /// A labelled (possibly blank) header column.
    Column(usize),
    /// R `write.table` layout: rows carry one more field than the header.
    RowNames,
}

/// Column positions resolved once from the header row.
#[derive(Debug, Clone)]
struct Schema {
    id: IdSource,
    id_label: String,
    lfc: usize,
    se: usize,
    width: usize,
}

impl Schema {
    fn resolve(header: &StringRecord, id_column: Option<&str>) -> Result<Self> {
        let find = |label: &str| header.iter().position(|h| h == label);

        let lfc = find(LOG2_FOLD_CHANGE)
            .ok_or_else(|| ExtractError::MissingColumn(LOG2_FOLD_CHANGE.to_string()))?;
        let se = find(LFC_SE).ok_or_else(|| ExtractError::MissingColumn(LFC_SE.to_string()))?;

        let (id, id_label) = match id_column {
            Some(name) => {
                let idx = find(name).ok_or_else(|| ExtractError::MissingColumn(name.to_string()))?;
                (IdSource::Column(idx), index_label(name, idx))
            }
            None => match header.iter().position(|h| h.is_empty() || h == UNNAMED_INDEX) {
                Some(idx) => (IdSource::Column(idx), index_label(&header[idx], idx)),
                None => (IdSource::RowNames, UNNAMED_INDEX.to_string()),
            },
        };

        Ok(Self {
            id,
            id_label,
            lfc,
            se,
            width: header.len(),
        })
    }

    fn parse_row(&self, record: &StringRecord, row: usize) -> Result<FeatureRecord> {
        let (id, offset) = match self.id {
            IdSource::Column(idx) if record.len() == self.width => (record[idx].to_string(), 0),
            IdSource::RowNames if record.len() == self.width + 1 => (record[0].to_string(), 1),
            IdSource::RowNames if record.len() == self.width => {
                return Err(ExtractError::MissingColumn(UNNAMED_INDEX.to_string()));
            }
            IdSource::Column(_) => {
                return Err(ExtractError::RaggedRow {
                    row,
                    expected: self.width,
                    found: record.len(),
                });
            }
            IdSource::RowNames => {
                return Err(ExtractError::RaggedRow {
                    row,
                    expected: self.width + 1,
                    found: record.len(),
                });
            }
        };

        Ok(FeatureRecord {
            row,
            id,
            log2_fold_change: parse_value(&record[self.lfc + offset], LOG2_FOLD_CHANGE, row)?,
            lfc_se: parse_value(&record[self.se + offset], LFC_SE, row)?,
        })
    }
}

/// Label used for an index column in outputs: blank headers become `Unnamed: N`.
fn index_label(header: &str, idx: usize) -> String {
    if header.is_empty() {
        format!("Unnamed: {}", idx)
    } else {
        header.to_string()
    }
}

/// Parse a numeric cell, mapping NA markers to NaN.
fn parse_value(raw: &str, column: &str, row: usize) -> Result<f64> {
    if NA_VALUES.contains(&raw) {
        return Ok(f64::NAN);
    }
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ExtractError::InvalidNumber {
            value: raw.to_string(),
            column: column.to_string(),
            row,
        })
}

/// An in-memory differential abundance results table.
///
/// Only the identifier, `log2FoldChange` and `lfcSE` columns are kept; rows
/// stay in input order.
#[derive(Debug, Clone)]
pub struct FeatureTable {
    records: Vec<FeatureRecord>,
    id_label: String,
}

impl FeatureTable {
    /// Build a table from records already in input order.
    pub fn new(records: Vec<FeatureRecord>, id_label: impl Into<String>) -> Self {
        Self {
            records,
            id_label: id_label.into(),
        }
    }

    /// Load a results table from a TSV file.
    ///
    /// Expected format:
    /// - First row: header containing `log2FoldChange` and `lfcSE`
    /// - Identifier column: the first column labelled `""` or `Unnamed: 0`,
    ///   or the named `id_column`, or R-style row names (header one field short)
    pub fn from_tsv<P: AsRef<Path>>(path: P, id_column: Option<&str>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), id_column)
    }

    /// Load a results table from any TSV reader.
    pub fn from_reader<R: Read>(reader: R, id_column: Option<&str>) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .from_reader(reader);

        let schema = Schema::resolve(reader.headers()?, id_column)?;
        log::debug!(
            "Resolved schema: id={:?} ({}), {}={}, {}={}",
            schema.id,
            schema.id_label,
            LOG2_FOLD_CHANGE,
            schema.lfc,
            LFC_SE,
            schema.se
        );

        let mut records = Vec::new();
        for (row, result) in reader.records().enumerate() {
            records.push(schema.parse_row(&result?, row)?);
        }

        Ok(Self::new(records, schema.id_label))
    }

    /// Records in input order.
    #[inline]
    pub fn records(&self) -> &[FeatureRecord] {
        &self.records
    }

    /// Label of the identifier column, as written to outputs.
    #[inline]
    pub fn id_label(&self) -> &str {
        &self.id_label
    }

    /// Number of features.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the table has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
