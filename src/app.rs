//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments into a validated `BinConfig`
//! - sets up logging
//! - runs both passes and writes the histogram
//! - prints the final status line

use clap::Parser;

use crate::cli::Cli;
use crate::domain::{BinConfig, DEFAULT_BATCH_SIZE, Sink};
use crate::error::{AppError, HistError};
use crate::io::source::FileSource;

pub mod pipeline;

/// Entry point for the `binner` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = bin_config_from_args(&cli)?;
    let status = run_config(&config)?;

    // Stdout may carry the histogram itself, so the status goes to stderr.
    eprintln!("{status}");
    Ok(())
}

/// Run a validated config end to end and return the status line.
pub fn run_config(config: &BinConfig) -> Result<String, AppError> {
    let source = FileSource::new(&config.input);
    tracing::info!(input = %config.input.display(), bins = config.bin_count, batch_size = config.batch_size, "starting");

    let run = pipeline::run_binning(&source, config)?;
    tracing::info!("\n{}", crate::report::format_run_report(&run, config));

    pipeline::emit_run(&run, &source, config)?;
    Ok(crate::report::format_status(run.binned.violations))
}

pub fn bin_config_from_args(cli: &Cli) -> Result<BinConfig, AppError> {
    let bin_count = positive("bin count", cli.bins)?;
    let batch_size = match cli.batch_size {
        Some(n) => positive("batch size", n)?,
        None => DEFAULT_BATCH_SIZE,
    };

    Ok(BinConfig {
        input: cli.input.clone(),
        bin_count,
        sink: Sink::from_destination(cli.output.clone()),
        batch_size,
        summary: cli.summary.clone(),
    })
}

fn positive(what: &str, value: i64) -> Result<usize, HistError> {
    match usize::try_from(value) {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(HistError::invalid_spec(format!("{what} must be > 0 (got {value})"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["binner"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_to_console_and_default_batch() {
        let cfg = bin_config_from_args(&parse(&["data.dat", "2000"])).unwrap();
        assert_eq!(cfg.bin_count, 2000);
        assert_eq!(cfg.sink, Sink::Console);
        assert_eq!(cfg.batch_size, DEFAULT_BATCH_SIZE);
        assert!(cfg.summary.is_none());
    }

    #[test]
    fn all_positionals_and_summary() {
        let cli = parse(&["data.dat", "16", "out.hist", "102400", "--summary", "run.json"]);
        let cfg = bin_config_from_args(&cli).unwrap();
        assert_eq!(cfg.sink, Sink::File("out.hist".into()));
        assert_eq!(cfg.batch_size, 102_400);
        assert_eq!(cfg.summary, Some("run.json".into()));
    }

    #[test]
    fn non_positive_counts_are_invalid_spec() {
        let cases: [&[&str]; 4] = [&["d", "0"], &["d", "-3"], &["d", "4", "stdout", "0"], &["d", "4", "-", "-1"]];
        for args in cases {
            let err = bin_config_from_args(&parse(args)).unwrap_err();
            assert_eq!(err.exit_code(), 4, "{args:?}");
            assert!(err.to_string().starts_with("InvalidSpec:"), "{err}");
        }
    }

    #[test]
    fn missing_input_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = BinConfig {
            input: dir.path().join("nope.dat"),
            bin_count: 4,
            sink: Sink::Console,
            batch_size: 10,
            summary: None,
        };
        let err = run_config(&cfg).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().starts_with("IoError:"), "{err}");
    }
}
