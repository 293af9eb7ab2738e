//! Assembly orchestration.
//!
//! [`Assembler`] owns every registry. A caller registers resolved build facts
//! through the `add_*` methods, then calls [`Assembler::assemble`] once:
//!
//! ```text
//! thrift commands ─▶ swig commands ─▶ source links ─▶ wheels ─▶ placeholder stubs
//! ```
//!
//! Each arrow is a barrier: a phase's items all finish before the next phase
//! starts. Generators run first so their files exist before the stub phase
//! looks for gaps; stubs run last as the catch-all.

mod assembler;
mod options;

pub use assembler::Assembler;
pub use options::AssemblyOptions;
