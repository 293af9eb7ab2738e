//! Thrift library builder.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::log::Logger;
use crate::phase::fan_out;
use crate::{log_info, log_warn};

use super::CommandRunner;

/// Marks a command generating plain Python code.
pub const PLAIN_MARKER: &str = "py:";

/// Marks a command generating Python code plus `.pyi` stubs.
pub const TYPED_STUB_MARKER: &str = "mstch_pyi:";

/// A progress line is logged every this many completed commands.
pub const PROGRESS_INTERVAL: usize = 100;

/// Drop plain commands whose typed-stub twin is also present.
///
/// The typed-stub generator writes a superset of the plain generator's files
/// for the same target, so running both would only race on identical paths.
pub fn dedupe(commands: HashSet<String>) -> HashSet<String> {
    let redundant: Vec<String> = commands
        .iter()
        .filter(|command| {
            command.contains(PLAIN_MARKER)
                && commands.contains(&command.replace(PLAIN_MARKER, TYPED_STUB_MARKER))
        })
        .cloned()
        .collect();

    let mut kept = commands;
    for command in &redundant {
        kept.remove(command);
    }
    kept
}

/// Runs thrift generator commands concurrently.
///
/// A failing command is logged and never stops its siblings.
pub struct ThriftLibraryBuilder<R: CommandRunner> {
    runner: Arc<R>,
    logger: Arc<dyn Logger>,
    max_concurrency: usize,
}

impl<R: CommandRunner> ThriftLibraryBuilder<R> {
    pub fn new(runner: Arc<R>, logger: Arc<dyn Logger>, max_concurrency: usize) -> Self {
        Self {
            runner,
            logger,
            max_concurrency,
        }
    }

    /// Dedupe `commands`, then run the rest from `working_root`.
    pub async fn build_all(&self, commands: HashSet<String>, working_root: &Path) {
        let commands = dedupe(commands);
        if commands.is_empty() {
            return;
        }

        let total = commands.len();
        log_info!(self.logger, "Building {} thrift libraries...", total);
        let built = Arc::new(AtomicUsize::new(0));

        let elapsed = fan_out(
            "thrift",
            commands,
            self.max_concurrency,
            &self.logger,
            |command| {
                let runner = Arc::clone(&self.runner);
                let logger = Arc::clone(&self.logger);
                let built = Arc::clone(&built);
                let working_root: PathBuf = working_root.to_path_buf();
                async move {
                    if let Err(e) = runner.run(&command, &working_root).await {
                        log_warn!(logger, "Code generation command failed: {}", e);
                    }
                    let so_far = built.fetch_add(1, Ordering::SeqCst) + 1;
                    if so_far % PROGRESS_INTERVAL == 0 {
                        log_info!(logger, "Built {}/{} thrift libraries.", so_far, total);
                    }
                }
            },
        )
        .await;

        log_info!(self.logger, "Built thrift libraries in {}ms.", elapsed);
    }
}
