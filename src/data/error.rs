use std::path::PathBuf;

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Why the element sheet could not be turned into a [`Table`](super::model::Table).
///
/// Every variant is fatal at startup; the same file always yields the same
/// error, so callers never retry.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("data file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("cannot read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("malformed data in {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}

impl DataLoadError {
    pub(crate) fn unreadable(path: &std::path::Path, source: impl Into<BoxError>) -> Self {
        DataLoadError::Unreadable {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }

    pub(crate) fn malformed(path: &std::path::Path, reason: impl Into<String>) -> Self {
        DataLoadError::Malformed {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}
