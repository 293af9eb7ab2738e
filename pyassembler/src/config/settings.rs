//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.

use std::path::PathBuf;
use std::time::Duration;

use super::defaults::*;

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub assembler: AssemblerSettings,
    pub codegen: CodegenSettings,
    pub wheels: WheelSettings,
    pub logging: LoggingSettings,
}

/// `[assembler]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblerSettings {
    /// Maximum in-flight items per phase; 0 means available parallelism
    pub max_concurrency: usize,
}

/// `[codegen]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenSettings {
    /// Shell that receives each opaque command via `-c`
    pub shell: String,
    /// Build tool invoked to resolve the SWIG executable
    pub build_tool: String,
    /// Build target whose output is the SWIG executable
    pub swig_builder_target: String,
}

/// `[wheels]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WheelSettings {
    /// Total download+unpack attempts per URL
    pub fetch_attempts: u32,
    /// HTTP timeout per download, in seconds
    pub timeout_secs: u64,
    /// Unzip executable
    pub unzip_tool: String,
}

impl WheelSettings {
    /// HTTP timeout for a single download.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub file: PathBuf,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            assembler: AssemblerSettings {
                max_concurrency: DEFAULT_MAX_CONCURRENCY,
            },
            codegen: CodegenSettings {
                shell: DEFAULT_SHELL.to_string(),
                build_tool: DEFAULT_BUILD_TOOL.to_string(),
                swig_builder_target: DEFAULT_SWIG_BUILDER_TARGET.to_string(),
            },
            wheels: WheelSettings {
                fetch_attempts: DEFAULT_FETCH_ATTEMPTS,
                timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
                unzip_tool: DEFAULT_UNZIP_TOOL.to_string(),
            },
            logging: LoggingSettings {
                file: default_log_file(),
            },
        }
    }
}
