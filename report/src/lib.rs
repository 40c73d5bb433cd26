//! # Recce Report - recce audit exports to formatted Excel reports
//!
//! Recce Report converts the CSV exports of shop surveys (one row per
//! signage element) into a styled XLSX report with measurements in feet,
//! per-shop numbering, filled-down contacts and a live total row.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│  Transform  │────▶│   Render    │
//! │  (any enc)  │     │  (auto-enc) │     │ (derive+run)│     │   (XLSX)    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use recce_report::{run_batch, ReportConfig};
//!
//! fn main() {
//!     let report = run_batch(&ReportConfig::default()).unwrap();
//!     println!("Converted {} files", report.succeeded());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Records, cell values and report columns
//! - [`parser`] - CSV parsing with auto-detection
//! - [`transform`] - Derivation, run grouping and the batch pipeline
//! - [`render`] - Styled grid layout and XLSX output
//! - [`config`] - Folder configuration
//! - [`logs`] - Leveled, broadcast logging

// Core modules
pub mod config;
pub mod error;
pub mod logs;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Rendering
pub mod render;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    BatchError, CsvError, FileProcessingError, ProcessingError, RenderError, TransformError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{FieldValue, InputRecord, OutputRecord, OutputTable, TotalRow, OUTPUT_COLUMNS};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::ReportConfig;

// =============================================================================
// Re-exports - Logging
// =============================================================================

pub use logs::{LogEntry, LogLevel, ProblemSummary, LOG_BROADCASTER};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    decode_content, detect_delimiter, detect_encoding, parse_bytes_auto, parse_csv_file_auto,
    parse_str, ParseResult,
};

// =============================================================================
// Re-exports - Transformation
// =============================================================================

pub use transform::{
    derive_record, group_runs, round2, title_case,
    pipeline::{
        discover_inputs, process_file, run_batch, transform_file, transform_records,
        BatchReport, FileOutcome,
    },
};

// =============================================================================
// Re-exports - Rendering
// =============================================================================

pub use render::{
    render_table, xlsx::save_xlsx, CellContent, CellStyle, GridSink, ReportGrid, StyledCell,
};
