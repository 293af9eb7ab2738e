//! Symbolic link creation.

use std::io;
use std::path::Path;

use tokio::fs;

/// Result of linking one output path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// A new link was created.
    Created,
    /// A link to the same source was already there.
    AlreadyLinked,
    /// Something else already exists at the output path; left untouched.
    Occupied,
}

/// Create a symbolic link at `output` pointing to `source`.
///
/// Missing parent directories of `output` are created. An existing entry at
/// `output` is never replaced.
pub async fn link_source(source: &Path, output: &Path) -> io::Result<LinkOutcome> {
    if let Ok(metadata) = fs::symlink_metadata(output).await {
        if metadata.file_type().is_symlink() && fs::read_link(output).await? == source {
            return Ok(LinkOutcome::AlreadyLinked);
        }
        return Ok(LinkOutcome::Occupied);
    }

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).await?;
    }

    match fs::symlink(source, output).await {
        Ok(()) => Ok(LinkOutcome::Created),
        // Lost a race against another producer for the same path.
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(LinkOutcome::Occupied),
        Err(e) => Err(e),
    }
}
