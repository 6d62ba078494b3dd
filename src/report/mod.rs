//! Run reporting: the final status line and a human-readable run report.

pub mod format;

pub use format::*;
