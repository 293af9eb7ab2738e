//! CLI runner for common setup.
//!
//! Encapsulates config loading, logging initialization and assembler creation
//! so command handlers stay small.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use pyassembler::config::{config_file_path, ConfigFile};
use pyassembler::log::TracingLogger;
use pyassembler::logging::{default_log_file, init_logging, LoggingGuard};
use pyassembler::orchestrator::Assembler;
use pyassembler::wheels::ShellExtractor;

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    config: ConfigFile,
    config_path: PathBuf,
}

impl CliRunner {
    /// Load config (default path unless `config_path` is given) and
    /// initialize logging.
    ///
    /// # Arguments
    ///
    /// * `debug_mode` - When true, enables debug-level logging regardless of RUST_LOG
    pub fn new(config_path: Option<&Path>, debug_mode: bool) -> Result<Self, CliError> {
        let config_path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(config_file_path);
        let config = ConfigFile::load_from(&config_path)?;

        let log_path = &config.logging.file;
        let log_dir = log_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let log_file = log_path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| default_log_file().to_string());

        let logging_guard = init_logging(&log_dir, &log_file, debug_mode)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
            config_path,
        })
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("pyassembler v{}", pyassembler::VERSION);
        info!("pyassembler CLI: {} command", command);
        info!("Config: {}", self.config_path.display());
    }

    /// Create the production assembler.
    ///
    /// Missing `unzip` is only a warning: builds without wheels still work.
    pub async fn create_assembler(
        &self,
        buck_root: &Path,
        output_directory: &Path,
    ) -> Result<Assembler, CliError> {
        let extractor = ShellExtractor::new(self.config.wheels.unzip_tool.clone());
        if !extractor.is_available().await {
            warn!(
                "'{}' not found; python wheels cannot be unpacked",
                self.config.wheels.unzip_tool
            );
        }

        let assembler = Assembler::from_config(
            buck_root,
            output_directory,
            &self.config,
            Arc::new(TracingLogger),
        )?;
        info!("Assembler created successfully");
        Ok(assembler)
    }
}
