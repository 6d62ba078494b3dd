//! Command-line parsing for the histogram binner.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! passes; validation of the parsed values happens in `app`.

use std::path::PathBuf;

use clap::Parser;

/// Top-level CLI.
///
/// `binner data.dat 2000` prints the histogram to stdout;
/// `binner data.dat 2000 data.hist 102400` writes it to a file, reading 102400 lines per batch.
#[derive(Debug, Parser, Clone)]
#[command(name = "binner", version, about = "Two-pass streaming histogram of numeric text files")]
pub struct Cli {
    /// Text file with one or more whitespace-separated columns of numbers.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Number of bins (> 0).
    #[arg(value_name = "BINS", allow_negative_numbers = true)]
    pub bins: i64,

    /// Output file; omitted, `-` or `stdout` prints to standard output.
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Maximum number of lines read per batch (> 0).
    #[arg(value_name = "BATCH_SIZE", allow_negative_numbers = true)]
    pub batch_size: Option<i64>,

    /// Also write a JSON run summary to this path.
    #[arg(long, value_name = "JSON")]
    pub summary: Option<PathBuf>,

    /// Log verbosity level (trace, debug, info, warn, error).
    #[arg(long, default_value = "warn")]
    pub log_level: tracing::Level,
}
