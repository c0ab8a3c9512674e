/// Coarse failure classes for a run.
///
/// Row-level parse failures are not errors; they surface as
/// `io::ingest::DropReason` values and never abort a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid CLI or environment configuration.
    Config,
    /// Network or HTTP status failure while fetching the feed.
    Fetch,
    /// The feed body does not have the expected shape (missing columns).
    Feed,
    /// Nothing left to save after parsing/aggregation.
    Empty,
    /// Failed to write one of the output files.
    Write,
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
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
            .field("kind", &self.kind)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
