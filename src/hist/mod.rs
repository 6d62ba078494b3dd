//! The two streaming passes.
//!
//! - `range_scan`: pass 1, global min/max over every finite value
//! - `binning`: pass 2, per-bin counts for a fixed `HistogramSpec`
//!
//! Both passes are reductions over the batch sequence: an accumulator value is
//! folded through `fold_batch` and turned into the pass output by `finish`.

pub mod binning;
pub mod range_scan;

pub use binning::*;
pub use range_scan::*;
