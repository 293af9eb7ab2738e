//! Source mapping registry.
//!
//! Holds the output→source link table. Registration is single-writer and
//! first-writer-wins; [`SourceMappingRegistry::materialize`] later turns every
//! stored pair into a symbolic link inside the output root.

mod link;
mod registry;

pub use link::{link_source, LinkOutcome};
pub use registry::{Registration, SourceMappingRegistry};
