//! Output→source table with conflict bookkeeping.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::log::Logger;
use crate::paths::relative_to;
use crate::phase::fan_out;
use crate::report::DiagnosticSet;
use crate::{log_debug, log_info, log_warn};

use super::link::{link_source, LinkOutcome};

/// What happened to a single `register` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// First mapping for this output path; stored.
    Inserted,
    /// Same source already mapped to this output; nothing changed.
    Unchanged,
    /// A different source already owns this output path. The new mapping was
    /// discarded and the relative path recorded as conflicting.
    Conflict { relative_path: String },
}

/// Output→source link table.
///
/// Keyed by output path. Once an output has a source it is never replaced.
#[derive(Debug)]
pub struct SourceMappingRegistry {
    output_root: PathBuf,
    sources: HashMap<PathBuf, PathBuf>,
    conflicts: DiagnosticSet,
}

impl SourceMappingRegistry {
    /// Creates an empty registry recording conflicts into `conflicts`.
    pub fn new(output_root: impl Into<PathBuf>, conflicts: DiagnosticSet) -> Self {
        Self {
            output_root: output_root.into(),
            sources: HashMap::new(),
            conflicts,
        }
    }

    /// Map `output` to `source` unless `output` is already taken.
    pub fn register(&mut self, source: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Registration {
        let source = source.into();
        let output = output.into();

        match self.sources.get(&output) {
            Some(existing) if *existing == source => Registration::Unchanged,
            Some(_) => {
                let relative_path = relative_to(&self.output_root, &output);
                self.conflicts.insert(relative_path.clone());
                Registration::Conflict { relative_path }
            }
            None => {
                self.sources.insert(output, source);
                Registration::Inserted
            }
        }
    }

    /// Source currently mapped to `output`.
    pub fn source_for(&self, output: &Path) -> Option<&Path> {
        self.sources.get(output).map(PathBuf::as_path)
    }

    /// All stored `(output, source)` pairs.
    pub fn mappings(&self) -> &HashMap<PathBuf, PathBuf> {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Link every stored pair into the output root, concurrently.
    ///
    /// A pair whose link cannot be created is logged and skipped. A pair whose
    /// output path is already occupied by something else (a generated file,
    /// for instance) keeps the existing content and is recorded as conflicting.
    pub async fn materialize(&self, max_concurrency: usize, logger: &Arc<dyn Logger>) {
        log_info!(logger, "Building {} python sources...", self.sources.len());

        let elapsed = fan_out(
            "source link",
            self.sources.clone(),
            max_concurrency,
            logger,
            |(output, source)| {
                let logger = Arc::clone(logger);
                let conflicts = self.conflicts.clone();
                let output_root = self.output_root.clone();
                async move {
                    match link_source(&source, &output).await {
                        Ok(LinkOutcome::Created) => {}
                        Ok(LinkOutcome::AlreadyLinked) => {
                            log_debug!(logger, "{} already links to {}", output.display(), source.display());
                        }
                        Ok(LinkOutcome::Occupied) => {
                            conflicts.insert(relative_to(&output_root, &output));
                            log_warn!(
                                logger,
                                "Not linking {} to {}: path already produced by an earlier step",
                                output.display(),
                                source.display()
                            );
                        }
                        Err(e) => {
                            log_warn!(
                                logger,
                                "Cannot link {} to {}: {}",
                                output.display(),
                                source.display(),
                                e
                            );
                        }
                    }
                }
            },
        )
        .await;

        log_info!(logger, "Built python sources in {}ms.", elapsed);
    }
}
