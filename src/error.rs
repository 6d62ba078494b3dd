//! Error types.
//!
//! - `HistError` is raised by the binning core (sources, passes, emitter).
//! - `AppError` is what the binary reports: a message plus a process exit code.

/// Fatal failures of the binning core.
///
/// Every variant aborts the run. Range violations are not errors; they are
/// counted by the binning pass and reported with the final status.
#[derive(Debug, thiserror::Error)]
pub enum HistError {
    #[error("IoError: {context}: {err}")]
    Io {
        context: String,
        #[source]
        err: std::io::Error,
    },

    #[error("EmptyDataset: no numeric values found in {origin}")]
    EmptyDataset { origin: String },

    #[error("InvalidSpec: {0}")]
    InvalidSpec(String),
}

impl HistError {
    pub fn io(context: impl Into<String>, err: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            err,
        }
    }

    pub fn invalid_spec(message: impl Into<String>) -> Self {
        Self::InvalidSpec(message.into())
    }

    /// Process exit code used when this error terminates the binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            HistError::Io { .. } => 2,
            HistError::EmptyDataset { .. } => 3,
            HistError::InvalidSpec(_) => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<HistError> for AppError {
    fn from(err: HistError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
