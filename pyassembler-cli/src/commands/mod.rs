//! CLI command implementations.
//!
//! # Command Modules
//!
//! - [`assemble`] - Build the output tree from a manifest
//! - [`config`] - Configuration inspection (path, show)

pub mod assemble;
pub mod config;
