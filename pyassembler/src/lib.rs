//! pyassembler - Python output-tree assembly for type checking
//!
//! Given build facts resolved from a Buck graph, this library materializes a
//! single output directory a Python type checker can read: it runs Thrift and
//! SWIG code generators, symlinks first-party sources, unpacks third-party
//! wheels, and writes placeholder stubs for generated files nothing produced.
//!
//! # High-Level API
//!
//! ```ignore
//! use pyassembler::config::ConfigFile;
//! use pyassembler::log::TracingLogger;
//! use pyassembler::orchestrator::Assembler;
//! use std::sync::Arc;
//!
//! let config = ConfigFile::load()?;
//! let mut assembler = Assembler::from_config(buck_root, output_dir, &config, Arc::new(TracingLogger))?;
//! assembler.add_source_mapping(source, output);
//! assembler.add_thrift_library_build_command(command);
//!
//! let report = assembler.assemble().await;
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! ```

pub mod codegen;
pub mod config;
pub mod log;
pub mod logging;
pub mod manifest;
pub mod orchestrator;
pub mod paths;
pub(crate) mod phase;
pub mod report;
pub mod sources;
pub mod stubs;
pub mod wheels;

/// Version of the pyassembler library and CLI.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
