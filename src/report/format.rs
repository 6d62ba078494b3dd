//! Formatted terminal output.
//!
//! Kept apart from the passes so the binning code has no presentation concerns
//! and message changes stay in one place.

use crate::app::pipeline::RunOutput;
use crate::domain::BinConfig;

/// One-line status printed after a successful run.
pub fn format_status(violations: u64) -> String {
    match violations {
        0 => "success".to_string(),
        1 => "success (1 range violation)".to_string(),
        n => format!("success ({n} range violations)"),
    }
}

/// Multi-line summary of both passes.
pub fn format_run_report(run: &RunOutput, config: &BinConfig) -> String {
    let mut out = String::new();

    out.push_str("=== binner - two-pass histogram ===\n");
    out.push_str(&format!("Input: {}\n", config.input.display()));
    out.push_str(&format!("Output: {}\n", config.sink.describe()));
    out.push_str(&format!("Batch size: {} records\n", config.batch_size));

    let scan = &run.scan;
    out.push_str(&format!(
        "Pass 1: records={} values={} | min={} max={}\n",
        scan.records, scan.values, scan.range.min, scan.range.max
    ));
    if scan.skipped_nan > 0 || scan.skipped_infinite > 0 {
        out.push_str(&format!(
            "  skipped: nan={} inf={}\n",
            scan.skipped_nan, scan.skipped_infinite
        ));
    }

    let binned = &run.binned;
    out.push_str(&format!(
        "Pass 2: values={} | bins={} width={}\n",
        binned.values,
        run.spec.bin_count(),
        run.spec.bin_width()
    ));
    if binned.values != scan.values {
        out.push_str(&format!(
            "  warning: pass 1 saw {} values, pass 2 saw {}\n",
            scan.values, binned.values
        ));
    }
    if binned.violations > 0 {
        out.push_str(&format!("  range violations: {}\n", binned.violations));
        for v in &binned.first_violations {
            out.push_str(&format!("    line {}: {}\n", v.line, v.value));
        }
        if binned.violations > binned.first_violations.len() as u64 {
            out.push_str("    ...\n");
        }
    }

    out
}
