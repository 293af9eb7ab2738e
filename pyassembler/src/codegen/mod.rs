//! External code generation.
//!
//! Thrift (IDL) and SWIG (native binding) libraries are produced by opaque
//! shell commands run from the build root. Both builders share the
//! [`CommandRunner`] seam; they differ in failure policy:
//!
//! - [`ThriftLibraryBuilder`] is fail-open: each command stands alone.
//! - [`SwigLibraryBuilder`] must first resolve the SWIG executable; without it
//!   the whole phase is skipped.

mod error;
mod runner;
mod swig;
mod thrift;

pub use error::CodegenError;
pub use runner::{CommandRunner, ShellCommandRunner};
pub use swig::SwigLibraryBuilder;
pub use thrift::{dedupe, ThriftLibraryBuilder, PLAIN_MARKER, PROGRESS_INTERVAL, TYPED_STUB_MARKER};
