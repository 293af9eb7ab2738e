//! Logging abstraction layer.
//!
//! Assembly components never call `tracing` directly. They accept an
//! `Arc<dyn Logger>` so that log events stay an observable side effect: the
//! CLI wires in [`TracingLogger`], tests wire in [`MemoryLogger`] and assert on
//! what was recorded.
//!
//! # Usage
//!
//! ```
//! use pyassembler::log::{Logger, MemoryLogger};
//! use pyassembler::{log_info, log_warn};
//! use std::sync::Arc;
//!
//! let memory = Arc::new(MemoryLogger::new());
//! let logger: Arc<dyn Logger> = memory.clone();
//!
//! log_info!(logger, "Building {} thrift libraries...", 3);
//! log_warn!(logger, "Code generation command failed");
//!
//! assert_eq!(memory.events().len(), 2);
//! ```

mod memory;
mod noop;
mod tracing_adapter;
mod r#trait;

pub use memory::{LogEvent, MemoryLogger};
pub use noop::NoOpLogger;
pub use r#trait::{LogLevel, Logger};
pub use tracing_adapter::TracingLogger;
