//! Transformation module.
//!
//! This module turns recce export records into report rows:
//! - Derive: per-row field derivation
//! - Grouper: shop runs, counters and contact fill-down
//! - Pipeline: file and batch processing

pub mod derive;
pub mod grouper;
pub mod pipeline;

pub use derive::{derive_record, round2, title_case};
pub use grouper::group_runs;
pub use pipeline::*;
