//! SWIG library builder.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::log::Logger;
use crate::phase::fan_out;
use crate::{log_debug, log_error, log_info, log_warn};

use super::{CodegenError, CommandRunner};

/// Runs SWIG binding commands with a once-resolved SWIG executable.
pub struct SwigLibraryBuilder<R: CommandRunner> {
    runner: Arc<R>,
    logger: Arc<dyn Logger>,
    build_tool: String,
    builder_target: String,
    max_concurrency: usize,
}

impl<R: CommandRunner> SwigLibraryBuilder<R> {
    /// # Arguments
    ///
    /// * `build_tool` - Executable that can build `builder_target` (e.g. `buck`)
    /// * `builder_target` - Build target whose output is the SWIG binary
    pub fn new(
        runner: Arc<R>,
        logger: Arc<dyn Logger>,
        build_tool: impl Into<String>,
        builder_target: impl Into<String>,
        max_concurrency: usize,
    ) -> Self {
        Self {
            runner,
            logger,
            build_tool: build_tool.into(),
            builder_target: builder_target.into(),
            max_concurrency,
        }
    }

    /// Build the SWIG target and return the path of its output.
    ///
    /// `--show-output` prints `<target> <path>` lines; the last non-empty line
    /// is used. Relative paths are resolved against `working_root`.
    pub async fn resolve_executable(&self, working_root: &Path) -> Result<PathBuf, CodegenError> {
        let command = format!(
            "{} build {} --show-output",
            self.build_tool, self.builder_target
        );
        let stdout = self.runner.run(&command, working_root).await?;

        let path = stdout
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .and_then(|line| line.split_whitespace().nth(1))
            .ok_or_else(|| CodegenError::ExecutableNotFound {
                target: self.builder_target.clone(),
            })?;

        Ok(working_root.join(path))
    }

    /// Resolve the executable, then run every command prefixed by it.
    ///
    /// Fails closed: if the executable cannot be resolved no command runs.
    pub async fn build_all(&self, commands: HashSet<String>, working_root: &Path) {
        if commands.is_empty() {
            return;
        }
        log_info!(self.logger, "Building {} swig libraries...", commands.len());

        let executable = match self.resolve_executable(working_root).await {
            Ok(path) => path,
            Err(e) => {
                log_error!(
                    self.logger,
                    "Unable to build any swig libraries because its builder is not found: {}",
                    e
                );
                return;
            }
        };
        log_debug!(self.logger, "Using swig builder {}", executable.display());

        let elapsed = fan_out(
            "swig",
            commands,
            self.max_concurrency,
            &self.logger,
            |command| {
                let runner = Arc::clone(&self.runner);
                let logger = Arc::clone(&self.logger);
                let working_root = working_root.to_path_buf();
                let full_command = format!("{}{}", executable.display(), command);
                async move {
                    if let Err(e) = runner.run(&full_command, &working_root).await {
                        log_warn!(logger, "Code generation command failed: {}", e);
                    }
                }
            },
        )
        .await;

        log_info!(self.logger, "Built swig libraries in {}ms.", elapsed);
    }
}
