//! Write a finished histogram as `center<TAB>count` lines.

use std::fs::File;
use std::io::{BufWriter, Write};

use crate::domain::{Histogram, Sink};
use crate::error::HistError;

/// Write `histogram` to `sink`.
///
/// The file sink truncates any existing file. A histogram without bins is an
/// `IoError`, as is any failed open/write/flush.
pub fn emit(histogram: &Histogram, sink: &Sink) -> Result<(), HistError> {
    if histogram.bin_count() == 0 {
        return Err(HistError::io(
            format!("refusing to write to {}", sink.describe()),
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "histogram has no bins"),
        ));
    }

    match sink {
        Sink::Console => {
            // Stdout is line-buffered.
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            write_histogram(histogram, &mut out)
                .and_then(|()| out.flush())
                .map_err(|e| HistError::io("failed to write histogram to stdout", e))
        }
        Sink::File(path) => {
            let file = File::create(path).map_err(|e| {
                HistError::io(format!("failed to create output '{}'", path.display()), e)
            })?;
            let mut out = BufWriter::new(file);
            write_histogram(histogram, &mut out)
                .and_then(|()| out.flush())
                .map_err(|e| HistError::io(format!("failed to write output '{}'", path.display()), e))
        }
    }
}

/// Write one line per bin, in bin order.
pub fn write_histogram<W: Write>(histogram: &Histogram, out: &mut W) -> std::io::Result<()> {
    for (center, count) in histogram.bins() {
        writeln!(out, "{}\t{count}", format_center(center))?;
    }
    Ok(())
}

/// Shortest round-trip representation that always keeps a decimal point (`2.0`, `0.125`).
pub fn format_center(center: f64) -> String {
    format!("{center:?}")
}
