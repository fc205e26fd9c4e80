//! Error handling for table generation and release staging
//!
//! Every failure in this crate is developer-facing and fatal: nothing is
//! retried, and the binaries turn any [`GenError`] into a non-zero exit.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type shared by the table compiler and the release orchestrator
#[derive(Debug, Error)]
pub enum GenError {
    /// The dataset file does not exist
    #[error("missing input: dataset not found at {}", .path.display())]
    MissingInput { path: PathBuf },

    /// The dataset exists but could not be decoded
    #[error("could not read dataset {}: {message}", .path.display())]
    DatasetFormat { path: PathBuf, message: String },

    /// The data cannot be rendered safely (delimiter collision, empty table, ...)
    #[error("malformed data in {table}: {message}")]
    MalformedData { table: String, message: String },

    /// An external build, signing or cleanup step did not succeed
    #[error("{step} failed{}: {status}{}", fmt_platform(.platform), fmt_stderr(.stderr))]
    ExternalToolFailure {
        step: String,
        platform: Option<String>,
        status: String,
        stderr: String,
    },

    /// A build reported success but the expected binary is not there
    #[error("expected binary for {platform} at {}", .path.display())]
    MissingArtifact { platform: String, path: PathBuf },

    /// The environment is not in the state required to start
    #[error("precondition violated: {message}")]
    PreconditionViolation { message: String },

    /// Filesystem error with the operation that caused it
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

fn fmt_platform(platform: &Option<String>) -> String {
    match platform {
        Some(p) => format!(" for {}", p),
        None => String::new(),
    }
}

fn fmt_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("\n{}", trimmed)
    }
}

/// Result type for generation and release operations
pub type GenResult<T> = Result<T, GenError>;

// Convenience constructors for errors
impl GenError {
    pub fn missing_input(path: impl AsRef<Path>) -> Self {
        GenError::MissingInput {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn dataset_format(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        GenError::DatasetFormat {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    pub fn malformed(table: impl Into<String>, message: impl Into<String>) -> Self {
        GenError::MalformedData {
            table: table.into(),
            message: message.into(),
        }
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        GenError::PreconditionViolation {
            message: message.into(),
        }
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        GenError::Io {
            context: context.into(),
            source,
        }
    }

    /// Whether this error was caused by the dataset rather than the environment
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            GenError::MalformedData { .. } | GenError::DatasetFormat { .. }
        )
    }
}
