//! Shared domain types.
//!
//! These types are intentionally small and owned by exactly one stage at a time:
//!
//! - `Range` / `HistogramSpec` are produced by the range scan and consumed by binning
//! - `Histogram` is produced by binning and consumed once by the emitter

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::HistError;

/// Default number of records pulled per batch (`1024 * 300`).
pub const DEFAULT_BATCH_SIZE: usize = 307_200;

/// Where the finished histogram is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sink {
    /// Standard output.
    Console,
    /// A file that is truncated and overwritten.
    File(PathBuf),
}

impl Sink {
    /// Resolve an optional CLI destination. Absent, `-` and `stdout` mean the console.
    pub fn from_destination(dest: Option<PathBuf>) -> Self {
        match dest {
            None => Sink::Console,
            Some(p) if p.as_os_str() == "-" || p.as_os_str() == "stdout" => Sink::Console,
            Some(p) => Sink::File(p),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Sink::Console => "stdout".to_string(),
            Sink::File(p) => p.display().to_string(),
        }
    }
}

/// Validated run configuration.
#[derive(Debug, Clone)]
pub struct BinConfig {
    pub input: PathBuf,
    pub bin_count: usize,
    pub sink: Sink,
    pub batch_size: usize,
    /// Optional JSON run summary written after a successful run.
    pub summary: Option<PathBuf>,
}

/// Global minimum and maximum of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }
}

/// Range plus bin count; the input of the binning pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramSpec {
    range: Range,
    bin_count: usize,
    bin_width: f64,
}

impl HistogramSpec {
    /// Build a spec, rejecting zero bins and degenerate ranges before any division happens.
    pub fn new(range: Range, bin_count: usize) -> Result<Self, HistError> {
        if bin_count == 0 {
            return Err(HistError::invalid_spec("bin count must be > 0 (got 0)"));
        }
        if !(range.max > range.min) {
            return Err(HistError::invalid_spec(format!(
                "degenerate range: min={} max={} (every value is identical)",
                range.min, range.max
            )));
        }

        let n = bin_count as f64;
        let mut bin_width = (range.max - range.min) / n;
        if bin_width.is_infinite() {
            // `max - min` overflows for ranges wider than f64::MAX.
            bin_width = range.max / n - range.min / n;
        }
        if !(bin_width.is_finite() && bin_width > 0.0) {
            return Err(HistError::invalid_spec(format!(
                "bin width {bin_width} for range [{}, {}] with {bin_count} bins is not a positive finite number",
                range.min, range.max
            )));
        }

        Ok(Self {
            range,
            bin_count,
            bin_width,
        })
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn bin_count(&self) -> usize {
        self.bin_count
    }

    pub fn bin_width(&self) -> f64 {
        self.bin_width
    }

    /// Center of bin `i`.
    pub fn center(&self, i: usize) -> f64 {
        let steps = i as f64 + 0.5;
        let center = self.range.min + steps * self.bin_width;
        if center.is_finite() {
            center
        } else {
            let half = steps * (self.bin_width / 2.0);
            self.range.min + half + half
        }
    }

    /// Bin index for `v`, clamped into `[0, bin_count - 1]`.
    ///
    /// `v == max` computes to exactly `bin_count` and lands in the last bin.
    pub fn bin_index(&self, v: f64) -> usize {
        let offset = v - self.range.min;
        let raw = if offset.is_finite() {
            offset / self.bin_width
        } else {
            v / self.bin_width - self.range.min / self.bin_width
        }
        .floor();
        if raw <= 0.0 {
            0
        } else {
            (raw as usize).min(self.bin_count - 1)
        }
    }
}

/// Bin centers and counts.
///
/// Both vectors hold `bin_count + 1` slots. The last slot is the overflow slot,
/// which stays zero because the top edge is clamped into the last real bin.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    centers: Vec<f64>,
    counts: Vec<u64>,
}

impl Histogram {
    pub fn empty(spec: &HistogramSpec) -> Self {
        let slots = spec.bin_count() + 1;
        let centers = (0..slots).map(|i| spec.center(i)).collect();
        Self {
            centers,
            counts: vec![0; slots],
        }
    }

    pub(crate) fn increment(&mut self, idx: usize) {
        self.counts[idx] += 1;
    }

    /// Number of real bins (excludes the overflow slot).
    pub fn bin_count(&self) -> usize {
        self.counts.len().saturating_sub(1)
    }

    /// Centers of the real bins.
    pub fn centers(&self) -> &[f64] {
        &self.centers[..self.bin_count()]
    }

    /// Counts of the real bins.
    pub fn counts(&self) -> &[u64] {
        &self.counts[..self.bin_count()]
    }

    pub fn overflow(&self) -> u64 {
        self.counts.last().copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// `(center, count)` pairs in bin order.
    pub fn bins(&self) -> impl Iterator<Item = (f64, u64)> + '_ {
        self.centers().iter().copied().zip(self.counts().iter().copied())
    }
}

/// A value seen by the binning pass outside the range computed by the scan pass.
///
/// Only possible when the source changed between the two passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeViolation {
    pub line: u64,
    pub value: f64,
}
