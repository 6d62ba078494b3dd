//! The binning pipeline shared by the binary and tests.
//!
//! Stages run strictly in order and never go back:
//! range scan -> histogram spec -> binning -> emit
//!
//! Any error aborts the run. Nothing is written until binning has completed,
//! so a failed run never leaves a partial histogram behind.

use chrono::Utc;

use crate::domain::{BinConfig, HistogramSpec};
use crate::error::HistError;
use crate::hist::{BinningOutcome, RangeScan, bin_values, scan_range};
use crate::io::emit::emit;
use crate::io::source::ValueSource;
use crate::io::summary::{RunSummary, write_summary_json};

/// All computed outputs of one run, before emitting.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub scan: RangeScan,
    pub spec: HistogramSpec,
    pub binned: BinningOutcome,
}

/// Run both passes over `source`.
pub fn run_binning<S: ValueSource>(source: &S, config: &BinConfig) -> Result<RunOutput, HistError> {
    validate_config(config)?;

    // 1) Pass 1: global range.
    let scan = {
        let _span = tracing::info_span!("range_scan").entered();
        scan_range(source, config.batch_size)?
    };

    // 2) Bin layout; a degenerate range stops here, before any division.
    let spec = HistogramSpec::new(scan.range, config.bin_count)?;

    // 3) Pass 2: counts.
    let binned = {
        let _span = tracing::info_span!("binning").entered();
        bin_values(source, spec, &scan, config.batch_size)?
    };

    Ok(RunOutput { scan, spec, binned })
}

/// Write the histogram to the configured sink, then the optional JSON summary.
///
/// Only a failed histogram write is an error; summary failures are logged.
pub fn emit_run<S: ValueSource>(run: &RunOutput, source: &S, config: &BinConfig) -> Result<(), HistError> {
    emit(&run.binned.histogram, &config.sink)?;
    tracing::info!(output = %config.sink.describe(), bins = run.spec.bin_count(), "histogram written");

    // The histogram is already delivered; a failed summary does not fail the run.
    if let Some(path) = &config.summary {
        match write_summary_json(path, &build_summary(run, source, config)) {
            Ok(()) => tracing::info!(path = %path.display(), "summary written"),
            Err(err) => tracing::warn!(path = %path.display(), %err, "summary not written"),
        }
    }
    Ok(())
}

pub fn build_summary<S: ValueSource>(run: &RunOutput, source: &S, config: &BinConfig) -> RunSummary {
    RunSummary {
        tool: "binner".to_string(),
        generated_at: Utc::now(),
        input: source.describe(),
        output: config.sink.describe(),
        bin_count: run.spec.bin_count(),
        batch_size: config.batch_size,
        range: run.scan.range,
        bin_width: run.spec.bin_width(),
        records: run.scan.records,
        values_scanned: run.scan.values,
        values_binned: run.binned.values,
        skipped_nan: run.scan.skipped_nan,
        skipped_infinite: run.scan.skipped_infinite,
        range_violations: run.binned.violations,
    }
}

fn validate_config(config: &BinConfig) -> Result<(), HistError> {
    if config.bin_count == 0 {
        return Err(HistError::invalid_spec("bin count must be > 0 (got 0)"));
    }
    if config.batch_size == 0 {
        return Err(HistError::invalid_spec("batch size must be > 0 (got 0)"));
    }
    Ok(())
}
