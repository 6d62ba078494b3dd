//! Pass 1: global min/max.
//!
//! The running extremes are seeded from the first finite value observed, so
//! all-negative and all-positive datasets come out right. NaN and infinite
//! tokens are counted and otherwise ignored.

use crate::domain::Range;
use crate::error::HistError;
use crate::io::source::{Batch, ValueSource, fold_batches};
use crate::io::tokens::{Token, tokens};

/// Output of the range scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeScan {
    pub range: Range,
    /// Finite values observed.
    pub values: u64,
    pub records: u64,
    pub skipped_nan: u64,
    pub skipped_infinite: u64,
}

/// Running state of the scan, threaded through each batch.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RangeAccumulator {
    range: Option<Range>,
    values: u64,
    records: u64,
    skipped_nan: u64,
    skipped_infinite: u64,
}

impl RangeAccumulator {
    pub fn observe(mut self, token: Token) -> Self {
        match token {
            Token::Finite(v) => {
                self.values += 1;
                self.range = Some(match self.range {
                    None => Range { min: v, max: v },
                    Some(r) => Range {
                        min: if v < r.min { v } else { r.min },
                        max: if v > r.max { v } else { r.max },
                    },
                });
            }
            Token::NaN => self.skipped_nan += 1,
            Token::Infinite => self.skipped_infinite += 1,
        }
        self
    }

    pub fn fold_batch(self, batch: &Batch) -> Self {
        batch.records.iter().fold(self, |acc, record| {
            let acc = RangeAccumulator {
                records: acc.records + 1,
                ..acc
            };
            tokens(record).fold(acc, RangeAccumulator::observe)
        })
    }

    /// Finish the scan; zero values observed is `EmptyDataset`.
    pub fn finish(self, origin: &str) -> Result<RangeScan, HistError> {
        let range = self.range.ok_or_else(|| HistError::EmptyDataset {
            origin: origin.to_string(),
        })?;
        Ok(RangeScan {
            range,
            values: self.values,
            records: self.records,
            skipped_nan: self.skipped_nan,
            skipped_infinite: self.skipped_infinite,
        })
    }
}

/// Run pass 1 over a freshly opened reader of `source`.
pub fn scan_range<S: ValueSource>(source: &S, batch_size: usize) -> Result<RangeScan, HistError> {
    let mut reader = source.open()?;
    let acc = fold_batches(&mut reader, batch_size, RangeAccumulator::default(), RangeAccumulator::fold_batch)?;
    let scan = acc.finish(&source.describe())?;

    tracing::info!(
        values = scan.values,
        records = scan.records,
        min = scan.range.min,
        max = scan.range.max,
        skipped_nan = scan.skipped_nan,
        skipped_infinite = scan.skipped_infinite,
        "range scan complete"
    );
    Ok(scan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::source::MemorySource;

    fn batch(lines: &[&str]) -> Batch {
        Batch {
            records: lines.iter().map(|s| s.to_string()).collect(),
            first_line: 1,
            is_last: true,
        }
    }

    #[test]
    fn fold_step_is_pure() {
        let acc = RangeAccumulator::default().fold_batch(&batch(&["3 1", "2"]));
        let scan = acc.finish("t").unwrap();
        assert_eq!(scan.range, Range { min: 1.0, max: 3.0 });
        assert_eq!(scan.values, 3);
        assert_eq!(scan.records, 2);

        // Folding a second batch continues from the returned value.
        let acc = acc.fold_batch(&batch(&["-4", "10"]));
        let scan = acc.finish("t").unwrap();
        assert_eq!(scan.range, Range { min: -4.0, max: 10.0 });
        assert_eq!(scan.values, 5);
    }

    #[test]
    fn all_negative_values_seed_from_first_value() {
        let scan = scan_range(&MemorySource::new("neg", "-5\n-2.5\n-9\n"), 2).unwrap();
        assert_eq!(scan.range, Range { min: -9.0, max: -2.5 });
    }

    #[test]
    fn all_positive_values_seed_from_first_value() {
        let scan = scan_range(&MemorySource::new("pos", "7\n3\n12\n"), 1).unwrap();
        assert_eq!(scan.range, Range { min: 3.0, max: 12.0 });
    }

    #[test]
    fn nan_never_becomes_min_or_max() {
        let scan = scan_range(&MemorySource::new("nan", "nan\n2\nNaN 4\nnan\n"), 3).unwrap();
        assert_eq!(scan.range, Range { min: 2.0, max: 4.0 });
        assert_eq!(scan.values, 2);
        assert_eq!(scan.skipped_nan, 3);
    }

    #[test]
    fn infinities_are_skipped() {
        let scan = scan_range(&MemorySource::new("inf", "inf 1\n-inf 2\n"), 10).unwrap();
        assert_eq!(scan.range, Range { min: 1.0, max: 2.0 });
        assert_eq!(scan.skipped_infinite, 2);
    }

    #[test]
    fn empty_or_non_numeric_source_is_empty_dataset() {
        for text in ["", "\n\n", "abc def\nnan\n"] {
            let err = scan_range(&MemorySource::new("e", text), 4).unwrap_err();
            assert!(matches!(err, HistError::EmptyDataset { .. }), "{text:?}: {err}");
        }
    }

    #[test]
    fn blank_lines_do_not_stop_the_scan() {
        let scan = scan_range(&MemorySource::new("gap", "1\n\n\n8\n"), 1).unwrap();
        assert_eq!(scan.range, Range { min: 1.0, max: 8.0 });
        assert_eq!(scan.records, 4);
    }
}
