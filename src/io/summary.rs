//! JSON run summary.
//!
//! Optional machine-readable companion to the histogram: what was read, the
//! range and bin layout, and how many values were skipped or out of range.
//! Written only after a successful run.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Range;
use crate::error::HistError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub input: String,
    pub output: String,
    pub bin_count: usize,
    pub batch_size: usize,
    pub range: Range,
    pub bin_width: f64,
    pub records: u64,
    pub values_scanned: u64,
    pub values_binned: u64,
    pub skipped_nan: u64,
    pub skipped_infinite: u64,
    pub range_violations: u64,
}

pub fn write_summary_json(path: &Path, summary: &RunSummary) -> Result<(), HistError> {
    let file = File::create(path)
        .map_err(|e| HistError::io(format!("failed to create summary JSON '{}'", path.display()), e))?;
    serde_json::to_writer_pretty(file, summary)
        .map_err(|e| HistError::io(format!("failed to write summary JSON '{}'", path.display()), e.into()))
}

pub fn read_summary_json(path: &Path) -> Result<RunSummary, HistError> {
    let file = File::open(path)
        .map_err(|e| HistError::io(format!("failed to open summary JSON '{}'", path.display()), e))?;
    serde_json::from_reader(file)
        .map_err(|e| HistError::io(format!("invalid summary JSON '{}'", path.display()), e.into()))
}
