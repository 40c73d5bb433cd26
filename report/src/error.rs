//! Error types for the recce report pipeline.
//!
//! - [`CsvError`] - CSV reading and decoding errors
//! - [`TransformError`] - Field derivation errors
//! - [`RenderError`] - Workbook rendering and writing errors
//! - [`FileProcessingError`] - Any of the above, tagged with the input file
//! - [`BatchError`] - Infrastructure failures that stop the whole batch
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// CSV Reading Errors
// =============================================================================

/// Errors while reading a source CSV file.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to decode the file content.
    #[error("Failed to decode content: {0}")]
    EncodingError(String),

    /// Invalid CSV format.
    #[error("Invalid CSV format at line {line}: {message}")]
    ParseError { line: u64, message: String },

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,
}

impl From<csv::Error> for CsvError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        CsvError::ParseError {
            line,
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Transformation Errors
// =============================================================================

/// Errors while deriving report rows from source records.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A measurement column holds a value that is not a number.
    #[error("Column '{column}' row {row}: '{value}' is not a number")]
    NotANumber {
        column: String,
        row: usize,
        value: String,
    },
}

// =============================================================================
// Rendering Errors
// =============================================================================

/// Errors while rendering or persisting the workbook.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The XLSX encoder rejected an operation.
    #[error("XLSX write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Writing the artifact to disk failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Per-file Errors
// =============================================================================

/// Failure of one pipeline stage for a single file.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// CSV reading error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Transformation error.
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// Rendering error.
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// An earlier file of the same batch already maps to this report.
    #[error("Output {} is already written by {}", .output.display(), .earlier.display())]
    OutputCollision { output: PathBuf, earlier: PathBuf },
}

/// Any failure while processing one input file.
///
/// Caught by the batch runner, reported, and never fatal to the batch.
#[derive(Debug, Error)]
#[error("Error processing {}: {source}", .path.display())]
pub struct FileProcessingError {
    /// The input file that failed.
    pub path: PathBuf,
    /// What went wrong.
    #[source]
    pub source: ProcessingError,
}

impl FileProcessingError {
    pub fn new(path: impl Into<PathBuf>, source: impl Into<ProcessingError>) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
        }
    }
}

// =============================================================================
// Batch Errors (top-level)
// =============================================================================

/// Errors that abort the whole batch.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The output directory could not be created.
    #[error("Cannot create output directory {}: {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input directory could not be listed.
    #[error("Cannot read input directory {}: {source}", .path.display())]
    InputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for transformation operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Result type for batch operations.
pub type BatchResult<T> = Result<T, BatchError>;
