//! Runs one opaque generator command.

use std::future::Future;
use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use super::CodegenError;

/// Executes external commands on behalf of the generator builders.
///
/// Implementations must be shareable across the tasks of a phase.
pub trait CommandRunner: Send + Sync + 'static {
    /// Run `command` with `working_root` as its current directory and wait for
    /// it to finish.
    ///
    /// # Returns
    ///
    /// Captured stdout on success.
    fn run(
        &self,
        command: &str,
        working_root: &Path,
    ) -> impl Future<Output = Result<String, CodegenError>> + Send;
}

/// Runs commands through a POSIX shell (`<shell> -c <command>`).
#[derive(Debug, Clone)]
pub struct ShellCommandRunner {
    shell: String,
}

impl ShellCommandRunner {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl Default for ShellCommandRunner {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_SHELL)
    }
}

impl CommandRunner for ShellCommandRunner {
    async fn run(&self, command: &str, working_root: &Path) -> Result<String, CodegenError> {
        let output = Command::new(&self.shell)
            .arg("-c")
            .arg(command)
            .current_dir(working_root)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| CodegenError::Spawn {
                command: command.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(CodegenError::Failed {
                command: command.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
