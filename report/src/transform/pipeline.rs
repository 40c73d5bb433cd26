//! High-level pipeline API: recce export CSV in, styled report out.
//!
//! ```text
//! InputFiles/*.csv ─▶ parse ─▶ derive ─▶ group runs ─▶ render ─▶ Output/<stem>_output.xlsx
//! ```
//!
//! Each file is processed on its own; a failing file is reported and the
//! batch moves on.
//!
//! # Example
//!
//! ```rust,ignore
//! use recce_report::{run_batch, ReportConfig};
//!
//! let report = run_batch(&ReportConfig::from_env())?;
//! println!("{} saved, {} failed", report.succeeded(), report.failed());
//! ```

use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::derive::derive_record;
use super::grouper::group_runs;
use crate::config::ReportConfig;
use crate::error::{
    BatchError, BatchResult, FileProcessingError, ProcessingError, TransformResult,
};
use crate::logs::{log_error, log_info, log_info_indent, log_success, log_warning};
use crate::models::{InputRecord, OutputTable};
use crate::parser::parse_csv_file_auto;
use crate::render::render_table;
use crate::render::xlsx::save_xlsx;

/// Derive the full report table from source records.
///
/// Output rows match input rows one to one, in the same order.
pub fn transform_records(records: &[InputRecord]) -> TransformResult<OutputTable> {
    let derived = records
        .iter()
        .enumerate()
        .map(|(i, record)| derive_record(record, i + 1))
        .collect::<TransformResult<Vec<_>>>()?;

    Ok(OutputTable::new(group_runs(derived)))
}

/// Read a CSV file and derive its report table.
pub fn transform_file(path: &Path) -> Result<OutputTable, FileProcessingError> {
    let parsed = parse_csv_file_auto(path).map_err(|e| FileProcessingError::new(path, e))?;
    log_info_indent(
        format!(
            "{} rows, delimiter '{}', encoding {}",
            parsed.records.len(),
            format_delimiter(parsed.delimiter),
            parsed.encoding
        ),
        1,
    );

    transform_records(&parsed.records).map_err(|e| FileProcessingError::new(path, e))
}

/// Convert one CSV file into its report and return the report path.
pub fn process_file(path: &Path, config: &ReportConfig) -> Result<PathBuf, FileProcessingError> {
    let table = transform_file(path)?;
    let grid = render_table(&table, &config.sheet_name);

    let output_path = config.output_path_for(path);
    save_xlsx(&grid, &output_path).map_err(|e| FileProcessingError::new(path, e))?;

    Ok(output_path)
}

/// Format delimiter for display
fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

// =============================================================================
// Batch
// =============================================================================

/// What happened to one input file.
#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub result: Result<PathBuf, FileProcessingError>,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Summary of one batch run.
#[derive(Debug)]
pub struct BatchReport {
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// True when no input file was found.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }
}

fn is_csv(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

/// List the CSV files directly inside `dir`, sorted by name.
///
/// A missing directory simply has no files.
pub fn discover_inputs(dir: &Path) -> BatchResult<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(dir).map_err(|source| BatchError::InputDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) if is_csv(&entry.path()) => files.push(entry.path()),
            Ok(_) => {}
            Err(e) => log_warning(format!(
                "Skipping unreadable entry in {}: {}",
                dir.display(),
                e
            )),
        }
    }
    files.sort();
    Ok(files)
}

/// Convert every CSV file of the input folder.
///
/// Only an uncreatable output folder or an unreadable input folder stops
/// the batch; per-file failures end up in the returned report.
pub fn run_batch(config: &ReportConfig) -> BatchResult<BatchReport> {
    let started_at = Local::now();

    fs::create_dir_all(&config.output_dir).map_err(|source| BatchError::OutputDir {
        path: config.output_dir.clone(),
        source,
    })?;

    let inputs = discover_inputs(&config.input_dir)?;
    if inputs.is_empty() {
        log_warning(format!(
            "No CSV files found in input folder {}",
            config.input_dir.display()
        ));
    }

    let mut outcomes = Vec::with_capacity(inputs.len());
    let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();
    for (i, input) in inputs.into_iter().enumerate() {
        log_info(format!("📄 [{}] Processing {}", i + 1, input.display()));

        let output = config.output_path_for(&input);
        let result = match claimed.get(&output) {
            Some(earlier) => Err(FileProcessingError::new(
                &input,
                ProcessingError::OutputCollision {
                    output,
                    earlier: earlier.clone(),
                },
            )),
            None => {
                claimed.insert(output, input.clone());
                process_file(&input, config)
            }
        };
        match &result {
            Ok(output) => log_success(format!("Saved: {}", output.display())),
            Err(e) => log_error(e.to_string()),
        }
        outcomes.push(FileOutcome { input, result });
    }

    let report = BatchReport {
        started_at,
        finished_at: Local::now(),
        outcomes,
    };

    if !report.is_empty() {
        log_info(format!(
            "📊 {} saved, {} failed in {} ms",
            report.succeeded(),
            report.failed(),
            (report.finished_at - report.started_at).num_milliseconds()
        ));
    }

    Ok(report)
}
