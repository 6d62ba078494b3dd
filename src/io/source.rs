//! Value sources and the batched line reader.
//!
//! A `ValueSource` can be opened any number of times; every `open` yields a
//! fresh `BatchedReader` positioned at the start of the data. Each pass opens
//! its own reader and drops it when done, so the underlying file handle is
//! never shared between passes.

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::HistError;

/// A bounded chunk of raw records pulled in one call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    pub records: Vec<String>,
    /// 1-based line number of `records[0]`.
    pub first_line: u64,
    /// Set on the call that reached end-of-stream.
    pub is_last: bool,
}

impl Batch {
    /// Records paired with their 1-based line numbers.
    pub fn lines(&self) -> impl Iterator<Item = (u64, &str)> + '_ {
        self.records
            .iter()
            .enumerate()
            .map(|(i, r)| (self.first_line + i as u64, r.as_str()))
    }
}

/// Pulls at most `max_records` lines per call from a buffered reader.
pub struct BatchedReader<R> {
    reader: R,
    origin: String,
    next_line: u64,
    exhausted: bool,
    buf: Vec<u8>,
}

impl<R: BufRead> BatchedReader<R> {
    pub fn new(reader: R, origin: impl Into<String>) -> Self {
        Self {
            reader,
            origin: origin.into(),
            next_line: 1,
            exhausted: false,
            buf: Vec::new(),
        }
    }

    /// Read the next batch.
    ///
    /// `is_last` is set as soon as end-of-stream is observed, which includes
    /// the call returning the final records when nothing follows them. Once
    /// exhausted, every call returns an empty batch with `is_last = true`.
    pub fn next_batch(&mut self, max_records: usize) -> Result<Batch, HistError> {
        if max_records == 0 {
            return Err(HistError::invalid_spec("batch size must be > 0 (got 0)"));
        }

        let first_line = self.next_line;
        let mut records = Vec::with_capacity(max_records.min(4096));

        while !self.exhausted && records.len() < max_records {
            self.buf.clear();
            let n = self
                .reader
                .read_until(b'\n', &mut self.buf)
                .map_err(|e| self.read_error(e))?;
            if n == 0 {
                self.exhausted = true;
                break;
            }
            // Lossy decoding: invalid bytes become U+FFFD and the token is skipped later.
            records.push(String::from_utf8_lossy(trim_newline(&self.buf)).into_owned());
            self.next_line += 1;
        }

        if !self.exhausted {
            let at_eof = self.reader.fill_buf().map(|rest| rest.is_empty());
            self.exhausted = at_eof.map_err(|e| self.read_error(e))?;
        }

        Ok(Batch {
            records,
            first_line,
            is_last: self.exhausted,
        })
    }

    /// Lines handed out so far.
    pub fn lines_read(&self) -> u64 {
        self.next_line - 1
    }

    fn read_error(&self, err: std::io::Error) -> HistError {
        HistError::io(
            format!("failed to read {} near line {}", self.origin, self.next_line),
            err,
        )
    }
}

fn trim_newline(bytes: &[u8]) -> &[u8] {
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    bytes.strip_suffix(b"\r").unwrap_or(bytes)
}

/// Fold every batch of `reader` into an accumulator, in order, until `is_last`.
///
/// The accumulator is threaded through by value; no batch is retained past its step.
pub fn fold_batches<R, A, F>(
    reader: &mut BatchedReader<R>,
    batch_size: usize,
    init: A,
    mut step: F,
) -> Result<A, HistError>
where
    R: BufRead,
    F: FnMut(A, &Batch) -> A,
{
    let mut acc = init;
    loop {
        let batch = reader.next_batch(batch_size)?;
        tracing::debug!(
            first_line = batch.first_line,
            records = batch.records.len(),
            is_last = batch.is_last,
            "batch"
        );
        acc = step(acc, &batch);
        if batch.is_last {
            return Ok(acc);
        }
    }
}

/// Something that can be traversed from the start more than once.
pub trait ValueSource {
    type Reader: BufRead;

    /// Open a fresh reader positioned at the beginning of the data.
    fn open(&self) -> Result<BatchedReader<Self::Reader>, HistError>;

    /// Human-readable name used in messages.
    fn describe(&self) -> String;
}

/// Text file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ValueSource for FileSource {
    type Reader = BufReader<File>;

    fn open(&self) -> Result<BatchedReader<Self::Reader>, HistError> {
        let file = File::open(&self.path)
            .map_err(|e| HistError::io(format!("failed to open input '{}'", self.path.display()), e))?;
        Ok(BatchedReader::new(BufReader::new(file), self.describe()))
    }

    fn describe(&self) -> String {
        format!("'{}'", self.path.display())
    }
}

/// In-memory text; every open shares the same bytes.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    bytes: Arc<[u8]>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, text: impl AsRef<[u8]>) -> Self {
        Self {
            name: name.into(),
            bytes: Arc::from(text.as_ref()),
        }
    }
}

impl ValueSource for MemorySource {
    type Reader = Cursor<Arc<[u8]>>;

    fn open(&self) -> Result<BatchedReader<Self::Reader>, HistError> {
        Ok(BatchedReader::new(Cursor::new(Arc::clone(&self.bytes)), self.describe()))
    }

    fn describe(&self) -> String {
        format!("<{}>", self.name)
    }
}
