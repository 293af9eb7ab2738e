//! Archive listing and extraction.

use std::future::Future;
use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use super::WheelError;

/// Lists and unpacks archives.
pub trait ArchiveExtractor: Send + Sync + 'static {
    /// File entries of `archive`, as archive-relative paths. Directory
    /// entries are omitted.
    fn list_contents(
        &self,
        archive: &Path,
    ) -> impl Future<Output = Result<Vec<String>, WheelError>> + Send;

    /// Unpack `archive` into `dest`. Files that already exist in `dest` are
    /// left untouched.
    ///
    /// # Returns
    ///
    /// The number of file entries in the archive.
    fn extract(
        &self,
        archive: &Path,
        dest: &Path,
    ) -> impl Future<Output = Result<usize, WheelError>> + Send;
}

/// Extractor shelling out to Info-ZIP `unzip`.
#[derive(Debug, Clone)]
pub struct ShellExtractor {
    tool: String,
}

impl ShellExtractor {
    pub fn new(tool: impl Into<String>) -> Self {
        Self { tool: tool.into() }
    }

    /// True if the unzip tool can be launched.
    pub async fn is_available(&self) -> bool {
        Command::new(&self.tool)
            .arg("-v")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|status| status.success())
            .unwrap_or(false)
    }

    async fn run(&self, archive: &Path, args: &[&str]) -> Result<String, WheelError> {
        let output = Command::new(&self.tool)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| WheelError::Extract {
                archive: archive.to_path_buf(),
                reason: format!("cannot launch {}: {}", self.tool, e),
            })?;

        if !output.status.success() {
            return Err(WheelError::Extract {
                archive: archive.to_path_buf(),
                reason: format!(
                    "{} exited with {}: {}",
                    self.tool,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for ShellExtractor {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_UNZIP_TOOL)
    }
}

impl ArchiveExtractor for ShellExtractor {
    async fn list_contents(&self, archive: &Path) -> Result<Vec<String>, WheelError> {
        let archive_arg = archive.to_string_lossy();
        let stdout = self.run(archive, &["-Z1", &archive_arg]).await?;
        Ok(parse_listing(&stdout))
    }

    async fn extract(&self, archive: &Path, dest: &Path) -> Result<usize, WheelError> {
        let entries = self.list_contents(archive).await?;
        let archive_arg = archive.to_string_lossy();
        let dest_arg = dest.to_string_lossy();
        // -n: never overwrite, earlier producers keep their files
        self.run(archive, &["-n", "-qq", &archive_arg, "-d", &dest_arg])
            .await?;
        Ok(entries.len())
    }
}

/// File entries from `unzip -Z1` output.
fn parse_listing(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty() && !line.ends_with('/'))
        .map(str::to_string)
        .collect()
}
