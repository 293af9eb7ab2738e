//! Default configuration values.

use std::path::PathBuf;

/// Worker pool size when `max_concurrency = 0`.
pub const DEFAULT_MAX_CONCURRENCY: usize = 0;

/// Shell used to run opaque generator commands.
pub const DEFAULT_SHELL: &str = "sh";

/// Build tool used to resolve the binding generator executable.
pub const DEFAULT_BUILD_TOOL: &str = "buck";

/// Build target producing the SWIG executable.
pub const DEFAULT_SWIG_BUILDER_TARGET: &str = "//third-party-buck/platform007/tools/swig:bin/swig";

/// Download+unpack attempts per wheel: the first try plus one retry.
pub const DEFAULT_FETCH_ATTEMPTS: u32 = 2;

/// HTTP timeout for a single wheel download.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 120;

/// Tool used to list and unpack wheel archives.
pub const DEFAULT_UNZIP_TOOL: &str = "unzip";

/// Resolve `max_concurrency = 0` to the machine's available parallelism.
pub fn effective_concurrency(configured: usize) -> usize {
    if configured > 0 {
        return configured;
    }
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Default log file (`~/.pyassembler/pyassembler.log`).
pub fn default_log_file() -> PathBuf {
    super::config_directory().join(crate::logging::default_log_file())
}
