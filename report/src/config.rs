//! Report configuration.
//!
//! Defaults match the operator's folder layout. `RECCE_INPUT_DIR` and
//! `RECCE_OUTPUT_DIR` (from the environment or a `.env` file) override the
//! folders; command-line flags override both.

use std::path::{Path, PathBuf};

/// Folder scanned for recce exports.
pub const DEFAULT_INPUT_DIR: &str = "InputFiles";

/// Folder receiving the generated reports.
pub const DEFAULT_OUTPUT_DIR: &str = "Output";

/// Appended to the input file stem to name the report.
pub const OUTPUT_SUFFIX: &str = "_output";

/// Extension of generated reports.
pub const OUTPUT_EXTENSION: &str = "xlsx";

/// Title of the single worksheet.
pub const SHEET_NAME: &str = "Recce Report";

pub const INPUT_DIR_ENV: &str = "RECCE_INPUT_DIR";
pub const OUTPUT_DIR_ENV: &str = "RECCE_OUTPUT_DIR";

/// Where to read exports from and where to write reports.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub output_suffix: String,
    pub sheet_name: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            output_suffix: OUTPUT_SUFFIX.to_string(),
            sheet_name: SHEET_NAME.to_string(),
        }
    }
}

impl ReportConfig {
    /// Defaults, with folders overridden by the environment when set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(dir) = lookup(INPUT_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            config.input_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(OUTPUT_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            config.output_dir = PathBuf::from(dir);
        }
        config
    }

    pub fn with_input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = dir.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Report path for an input file: `<output_dir>/<stem><suffix>.xlsx`.
    pub fn output_path_for(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.output_dir
            .join(format!("{}{}.{}", stem, self.output_suffix, OUTPUT_EXTENSION))
    }
}
