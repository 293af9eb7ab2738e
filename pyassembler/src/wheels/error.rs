//! Wheel fetch errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of one download+unpack attempt.
#[derive(Debug, Error)]
pub enum WheelError {
    #[error("HTTP error for {url}: {reason}")]
    Http { url: String, reason: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Timed out after {timeout_secs}s fetching {url}")]
    Timeout { url: String, timeout_secs: u64 },

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot unpack {}: {reason}", .archive.display())]
    Extract { archive: PathBuf, reason: String },
}

impl WheelError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        WheelError::Io {
            path: path.into(),
            source,
        }
    }
}
