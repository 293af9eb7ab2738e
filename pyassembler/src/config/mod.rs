//! Configuration for the assembler.
//!
//! User settings live in `~/.pyassembler/config.ini`. Settings structs are in
//! [`settings`], defaults in [`defaults`], INI parsing in `parser` and
//! serialization in `writer`.
//!
//! ```
//! use pyassembler::config::ConfigFile;
//!
//! let config = ConfigFile::default();
//! assert_eq!(config.wheels.fetch_attempts, 2);
//! assert_eq!(config.codegen.build_tool, "buck");
//! ```

pub mod defaults;
mod file;
mod parser;
pub mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFile, ConfigFileError};
pub use settings::{AssemblerSettings, CodegenSettings, LoggingSettings, WheelSettings};
