//! `binner` library crate.
//!
//! The binary (`binner`) is a thin wrapper around this library so that:
//!
//! - both passes are testable without spawning processes
//! - other tools can bin any `ValueSource`, not only files on disk

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod hist;
pub mod io;
pub mod report;
