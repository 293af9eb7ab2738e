//! Diagnostic collections and the assembly report.

use dashmap::DashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Concurrency-safe set of output-root-relative paths.
///
/// Cheap to clone; clones share the same underlying set so workers of a phase
/// can each hold one.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticSet {
    inner: Arc<DashSet<String>>,
}

impl DiagnosticSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a path. Returns false if it was already present.
    pub fn insert(&self, path: impl Into<String>) -> bool {
        self.inner.insert(path.into())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.inner.contains(path)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Sorted copy of the current contents.
    pub fn to_sorted(&self) -> BTreeSet<String> {
        self.inner.iter().map(|entry| entry.key().clone()).collect()
    }
}

/// Result of one assembly run.
///
/// Both sets hold paths relative to the output root. Serialization is left to
/// the caller; the CLI prints it as JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyReport {
    /// Paths where two producers disagreed, or two source mappings collided
    pub conflicting_files: BTreeSet<String>,
    /// Paths that received only a placeholder stub
    pub unsupported_files: BTreeSet<String>,
}

impl AssemblyReport {
    pub fn new(conflicting: &DiagnosticSet, unsupported: &DiagnosticSet) -> Self {
        Self {
            conflicting_files: conflicting.to_sorted(),
            unsupported_files: unsupported.to_sorted(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.conflicting_files.is_empty() && self.unsupported_files.is_empty()
    }
}
