//! Pass 2: accumulate per-bin counts.
//!
//! Every finite value lands in `floor((v - min) / bin_width)`, clamped into
//! `[0, bin_count - 1]`. Values outside the scanned range can only appear if the
//! source changed between the passes; they are recorded as range violations,
//! logged, and still clamped into the nearest bin so the counts add up to the
//! number of values binned.

use crate::domain::{Histogram, HistogramSpec, RangeViolation};
use crate::error::HistError;
use crate::hist::range_scan::RangeScan;
use crate::io::source::{Batch, ValueSource, fold_batches};
use crate::io::tokens::{Token, tokens};

/// Violations logged at `warn`; the rest go to `debug`.
const WARN_VIOLATIONS: u64 = 10;

/// Violations kept in the outcome for reporting.
const KEPT_VIOLATIONS: usize = 10;

/// Output of the binning pass.
#[derive(Debug, Clone, PartialEq)]
pub struct BinningOutcome {
    pub histogram: Histogram,
    /// Finite values binned (equals `histogram.total()`).
    pub values: u64,
    pub skipped_nan: u64,
    pub skipped_infinite: u64,
    pub violations: u64,
    /// The first few violations, in file order.
    pub first_violations: Vec<RangeViolation>,
}

/// Running state of the binning pass, threaded through each batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BinAccumulator {
    spec: HistogramSpec,
    histogram: Histogram,
    values: u64,
    skipped_nan: u64,
    skipped_infinite: u64,
    violations: u64,
    first_violations: Vec<RangeViolation>,
}

impl BinAccumulator {
    pub fn new(spec: HistogramSpec) -> Self {
        Self {
            histogram: Histogram::empty(&spec),
            spec,
            values: 0,
            skipped_nan: 0,
            skipped_infinite: 0,
            violations: 0,
            first_violations: Vec::new(),
        }
    }

    pub fn observe(mut self, line: u64, token: Token) -> Self {
        let v = match token {
            Token::Finite(v) => v,
            Token::NaN => {
                self.skipped_nan += 1;
                return self;
            }
            Token::Infinite => {
                self.skipped_infinite += 1;
                return self;
            }
        };

        if !self.spec.range().contains(v) {
            self.record_violation(RangeViolation { line, value: v });
        }

        self.histogram.increment(self.spec.bin_index(v));
        self.values += 1;
        self
    }

    pub fn fold_batch(self, batch: &Batch) -> Self {
        batch.lines().fold(self, |acc, (line, record)| {
            tokens(record).fold(acc, |acc, token| acc.observe(line, token))
        })
    }

    pub fn finish(self) -> BinningOutcome {
        BinningOutcome {
            histogram: self.histogram,
            values: self.values,
            skipped_nan: self.skipped_nan,
            skipped_infinite: self.skipped_infinite,
            violations: self.violations,
            first_violations: self.first_violations,
        }
    }

    fn record_violation(&mut self, violation: RangeViolation) {
        self.violations += 1;
        let range = self.spec.range();
        if self.violations <= WARN_VIOLATIONS {
            tracing::warn!(
                line = violation.line,
                value = violation.value,
                min = range.min,
                max = range.max,
                "value outside scanned range; source changed between passes"
            );
        } else {
            tracing::debug!(line = violation.line, value = violation.value, "range violation");
        }
        if self.first_violations.len() < KEPT_VIOLATIONS {
            self.first_violations.push(violation);
        }
    }
}

/// Run pass 2 over a freshly opened reader of `source`.
///
/// `scan` is the pass-1 result; a different value count in this pass is logged
/// but does not fail the run.
pub fn bin_values<S: ValueSource>(
    source: &S,
    spec: HistogramSpec,
    scan: &RangeScan,
    batch_size: usize,
) -> Result<BinningOutcome, HistError> {
    let mut reader = source.open()?;
    let acc = fold_batches(&mut reader, batch_size, BinAccumulator::new(spec), BinAccumulator::fold_batch)?;
    let outcome = acc.finish();

    if outcome.values != scan.values {
        tracing::warn!(
            scanned = scan.values,
            binned = outcome.values,
            "value count differs between passes; source is not stable"
        );
    }

    tracing::info!(
        values = outcome.values,
        bins = spec.bin_count(),
        bin_width = spec.bin_width(),
        violations = outcome.violations,
        "binning complete"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::io::Cursor;
    use std::sync::Arc;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::domain::Range;
    use crate::hist::range_scan::scan_range;
    use crate::io::source::{BatchedReader, MemorySource};

    fn run(text: &str, bins: usize, batch_size: usize) -> BinningOutcome {
        let src = MemorySource::new("t", text);
        let scan = scan_range(&src, batch_size).unwrap();
        let spec = HistogramSpec::new(scan.range, bins).unwrap();
        bin_values(&src, spec, &scan, batch_size).unwrap()
    }

    /// Serves `first` on the first open and `second` on every later one.
    struct ChangingSource {
        first: &'static str,
        second: &'static str,
        opens: Cell<u32>,
    }

    impl ValueSource for ChangingSource {
        type Reader = Cursor<Arc<[u8]>>;

        fn open(&self) -> Result<BatchedReader<Self::Reader>, HistError> {
            let n = self.opens.get();
            self.opens.set(n + 1);
            let text = if n == 0 { self.first } else { self.second };
            Ok(BatchedReader::new(Cursor::new(Arc::from(text.as_bytes())), "changing"))
        }

        fn describe(&self) -> String {
            "<changing>".to_string()
        }
    }

    #[test]
    fn two_bins_over_one_to_five() {
        let out = run("1\n2\n3\n4\n5\n", 2, 100);
        assert_eq!(out.histogram.centers(), &[2.0, 4.0]);
        assert_eq!(out.histogram.counts(), &[2, 3]);
        assert_eq!(out.histogram.overflow(), 0);
        assert_eq!(out.violations, 0);
    }

    #[test]
    fn multi_token_lines_fold_into_one_stream() {
        let grouped = run("1 2 3\n4 5\n", 4, 100);
        let flat = run("1\n2\n3\n4\n5\n", 4, 100);
        assert_eq!(grouped.histogram, flat.histogram);
        assert_eq!(grouped.values, 5);
        assert_eq!(grouped.histogram.counts(), &[1, 1, 1, 2]);
    }

    #[test]
    fn counts_sum_to_values_observed() {
        let out = run("0.5 1.5\n2.5\n\nx 3.5 y\n9.75\n", 7, 2);
        assert_eq!(out.histogram.bin_count(), 7);
        assert_eq!(out.histogram.total(), out.values);
        assert_eq!(out.values, 5);
    }

    #[test]
    fn batch_size_does_not_change_the_histogram() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut text = String::new();
        for _ in 0..500 {
            let cols = rng.gen_range(1..4);
            let line: Vec<String> = (0..cols)
                .map(|_| format!("{:.6}", rng.gen_range(-250.0..1000.0)))
                .collect();
            text.push_str(&line.join(" "));
            text.push('\n');
        }
        let whole_file = text.lines().count();

        let reference = run(&text, 37, whole_file);
        for batch_size in [1, 7, whole_file + 1] {
            let out = run(&text, 37, batch_size);
            assert_eq!(out.histogram, reference.histogram, "batch size {batch_size}");
            assert_eq!(out.values, reference.values);
        }
    }

    #[test]
    fn nan_tokens_do_not_change_the_histogram() {
        let with_nan = run("1 nan\n2\nNaN\n3\n4 nan 5\n", 3, 2);
        let without = run("1\n2\n3\n4 5\n", 3, 2);
        assert_eq!(with_nan.histogram, without.histogram);
        assert_eq!(with_nan.skipped_nan, 3);
    }

    #[test]
    fn values_outside_scanned_range_are_violations_and_clamped() {
        let src = ChangingSource {
            first: "1\n2\n3\n",
            second: "1\n2\n3\n-10\n50\n",
            opens: Cell::new(0),
        };
        let scan = scan_range(&src, 2).unwrap();
        assert_eq!(scan.range, Range { min: 1.0, max: 3.0 });

        let spec = HistogramSpec::new(scan.range, 2).unwrap();
        let out = bin_values(&src, spec, &scan, 2).unwrap();
        assert_eq!(out.violations, 2);
        assert_eq!(
            out.first_violations,
            vec![
                RangeViolation { line: 4, value: -10.0 },
                RangeViolation { line: 5, value: 50.0 },
            ]
        );
        assert_eq!(out.histogram.counts(), &[2, 3]);
        assert_eq!(out.histogram.total(), 5);
        assert_eq!(out.values, 5);
    }

    #[test]
    fn kept_violations_are_capped() {
        let spec = HistogramSpec::new(Range { min: 0.0, max: 1.0 }, 1).unwrap();
        let acc = (0..25).fold(BinAccumulator::new(spec), |acc, i| acc.observe(i + 1, Token::Finite(2.0)));
        let out = acc.finish();
        assert_eq!(out.violations, 25);
        assert_eq!(out.first_violations.len(), KEPT_VIOLATIONS);
        assert_eq!(out.histogram.counts(), &[25]);
    }
}
