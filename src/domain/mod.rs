//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - run configuration (`BinConfig`, `Sink`)
//! - the scan/binning handoff (`Range`, `HistogramSpec`)
//! - the binning output (`Histogram`, `RangeViolation`)

pub mod types;

pub use types::*;
