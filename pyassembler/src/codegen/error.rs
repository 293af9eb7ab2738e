//! Code generation errors.

use std::io;
use thiserror::Error;

/// Failure of one external generator invocation.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// The process could not be launched at all
    #[error("Cannot launch `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    /// The process ran but exited abnormally
    #[error("`{command}` failed with {status}: {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },

    /// The build output did not name a usable builder executable
    #[error("Builder executable for `{target}` not found in build output")]
    ExecutableNotFound { target: String },
}

impl CodegenError {
    /// I/O kind of this failure, for callers that bridge to `io::Error`.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            CodegenError::Spawn { source, .. } => source.kind(),
            CodegenError::Failed { .. } => io::ErrorKind::Other,
            CodegenError::ExecutableNotFound { .. } => io::ErrorKind::NotFound,
        }
    }
}

impl From<CodegenError> for io::Error {
    fn from(e: CodegenError) -> Self {
        io::Error::new(e.kind(), e.to_string())
    }
}
