//! Placeholder stubs for expected-but-missing generated sources.
//!
//! Runs after every other producer. Whatever expected path is still missing
//! gets a one-line placeholder that type checkers recognise, so analysis can
//! proceed without the real generated code.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs;

use crate::log::Logger;
use crate::paths::{relative_to, stub_sibling};
use crate::phase::fan_out;
use crate::report::DiagnosticSet;
use crate::{log_info, log_warn};

/// Content of every placeholder stub.
pub const PLACEHOLDER_STUB: &str = "# pyre-placeholder-stub\n";

/// Fills gaps in the output root with placeholder stubs.
pub struct StubGenerator {
    logger: Arc<dyn Logger>,
    unsupported: DiagnosticSet,
    max_concurrency: usize,
}

impl StubGenerator {
    /// Creates a generator recording placeholder paths into `unsupported`.
    pub fn new(logger: Arc<dyn Logger>, unsupported: DiagnosticSet, max_concurrency: usize) -> Self {
        Self {
            logger,
            unsupported,
            max_concurrency,
        }
    }

    /// Write a placeholder for every path in `sources` that nothing produced.
    ///
    /// A path is skipped when a file already exists there, or when it is a
    /// `.py` file whose `.pyi` sibling exists.
    pub async fn fill_gaps(&self, sources: HashSet<PathBuf>, output_root: &Path) {
        log_info!(self.logger, "Generating empty stubs...");

        let elapsed = fan_out(
            "stub",
            sources,
            self.max_concurrency,
            &self.logger,
            |source| {
                let logger = Arc::clone(&self.logger);
                let unsupported = self.unsupported.clone();
                let output_root = output_root.to_path_buf();
                async move {
                    if !needs_placeholder(&source).await {
                        return;
                    }
                    unsupported.insert(relative_to(&output_root, &source));
                    if let Err(e) = write_placeholder(&source).await {
                        log_warn!(
                            logger,
                            "Cannot write placeholder stub {}: {}",
                            source.display(),
                            e
                        );
                    }
                }
            },
        )
        .await;

        log_info!(self.logger, "Generated empty stubs in {}ms.", elapsed);
    }
}

async fn exists(path: &Path) -> bool {
    fs::try_exists(path).await.unwrap_or(false)
}

async fn needs_placeholder(source: &Path) -> bool {
    if exists(source).await {
        return false;
    }
    match stub_sibling(source) {
        Some(sibling) => !exists(&sibling).await,
        None => true,
    }
}

async fn write_placeholder(path: &Path) -> std::io::Result<()> {
    // A dangling link must not be written through into its target's tree.
    if fs::symlink_metadata(path).await.is_ok() {
        fs::remove_file(path).await?;
    } else if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, PLACEHOLDER_STUB).await
}
