use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for every operation in this crate.
pub type ToolResult<T> = Result<T, ToolError>;

/// Coarse classification of a [`ToolError`], for callers that branch on cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    MalformedInput,
    Cancelled,
    Io,
    Parse,
    Task,
}

/// Error type returned by statistics, flattening and organize operations.
///
/// A single enum shared across all operations. The three domain failures (`NotFound`,
/// `MalformedInput`, `Cancelled`) are distinct variants so they can be told apart from
/// infrastructure failures.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The referenced input path does not exist.
    #[error("not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The input does not have the expected hierarchical dataset shape.
    #[error("malformed input: missing or invalid '{field}': {message}")]
    MalformedInput { field: String, message: String },

    /// Cooperative cancellation was observed mid-stream.
    #[error("operation cancelled")]
    Cancelled,

    /// Underlying I/O error (permission denied, disk full, ...).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The JSON document could not be parsed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The blocking task hosting an operation panicked or was aborted.
    #[error("task failed: {message}")]
    Task { message: String },
}

impl ToolError {
    pub(crate) fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub(crate) fn malformed(field: &str, message: impl Into<String>) -> Self {
        Self::MalformedInput {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::MalformedInput { .. } => ErrorKind::MalformedInput,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Io(_) => ErrorKind::Io,
            Self::Csv(err) => match err.kind() {
                csv::ErrorKind::Io(_) => ErrorKind::Io,
                _ => ErrorKind::Parse,
            },
            Self::Json(err) if err.is_io() => ErrorKind::Io,
            Self::Json(_) => ErrorKind::Parse,
            Self::Task { .. } => ErrorKind::Task,
        }
    }
}

impl From<tokio::task::JoinError> for ToolError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task {
            message: err.to_string(),
        }
    }
}
