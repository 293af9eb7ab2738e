//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and a single exit code.

use std::fmt;
use std::path::PathBuf;
use std::process;

use pyassembler::config::ConfigFileError;
use pyassembler::manifest::ManifestError;
use pyassembler::wheels::WheelError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(ConfigFileError),
    /// Manifest could not be loaded
    Manifest(ManifestError),
    /// Failed to create the wheel downloader
    Setup(WheelError),
    /// Failed to serialize the report
    Report(serde_json::Error),
    /// Failed to create or write a file or directory
    FileWrite { path: PathBuf, error: std::io::Error },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        if let CliError::Config(ConfigFileError::InvalidValue { section, key, .. }) = self {
            eprintln!();
            eprintln!(
                "Fix [{}] {} in the config file, or delete the line to use the default.",
                section, key
            );
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Manifest(e) => write!(f, "{}", e),
            CliError::Setup(e) => write!(f, "Failed to create wheel downloader: {}", e),
            CliError::Report(e) => write!(f, "Failed to serialize report: {}", e),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write '{}': {}", path.display(), error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Manifest(e) => Some(e),
            CliError::Setup(e) => Some(e),
            CliError::Report(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            CliError::LoggingInit(_) => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<ManifestError> for CliError {
    fn from(e: ManifestError) -> Self {
        CliError::Manifest(e)
    }
}

impl From<WheelError> for CliError {
    fn from(e: WheelError) -> Self {
        CliError::Setup(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_write_message_names_path() {
        let err = CliError::FileWrite {
            path: PathBuf::from("/out/report.json"),
            error: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "Failed to write '/out/report.json': denied");
    }

    #[test]
    fn test_config_error_converts() {
        let err: CliError = ConfigFileError::InvalidValue {
            section: "wheels".to_string(),
            key: "fetch_attempts".to_string(),
            value: "0".to_string(),
            reason: "must be at least 1".to_string(),
        }
        .into();
        assert!(err.to_string().starts_with("Configuration error:"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
