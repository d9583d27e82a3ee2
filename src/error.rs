//! Error types for the taxa-extremes library.

use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not write output: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("Table parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing column '{0}' in results table")]
    MissingColumn(String),

    #[error("Invalid number '{value}' in column '{column}' at row {row}")]
    InvalidNumber {
        value: String,
        column: String,
        row: usize,
    },

    #[error("Row {row} has {found} fields, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Invalid standard error {value} for feature '{feature_id}' at row {row}")]
    InvalidStandardError {
        feature_id: String,
        value: f64,
        row: usize,
    },

    #[error("Invalid log2 fold change {value} for feature '{feature_id}' at row {row}")]
    InvalidEstimate {
        feature_id: String,
        value: f64,
        row: usize,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("YAML configuration error: {0}")]
    Config(#[from] serde_yaml::Error),
}

/// Broad failure classes reported at the process boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Input unreadable or output unwritable.
    Io,
    /// A required column is absent.
    Schema,
    /// A cell or row could not be parsed.
    Parse,
    /// Input or parameters rejected by validation.
    Validation,
}

impl ExtractError {
    /// Classify this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Io(_) | Self::Persist(_) => ErrorClass::Io,
            Self::Csv(e) if e.is_io_error() => ErrorClass::Io,
            Self::MissingColumn(_) => ErrorClass::Schema,
            Self::Csv(_) | Self::InvalidNumber { .. } | Self::RaggedRow { .. } => {
                ErrorClass::Parse
            }
            Self::InvalidStandardError { .. }
            | Self::InvalidEstimate { .. }
            | Self::InvalidParameter(_)
            | Self::Config(_) => ErrorClass::Validation,
        }
    }
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, ExtractError>;
