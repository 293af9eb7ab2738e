//! INI serialization logic for converting `ConfigFile` → INI string.

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[assembler]
; Maximum concurrent items per phase (0 = number of CPUs)
max_concurrency = {}

[codegen]
; Shell that runs each thrift/swig command via `-c`
shell = {}
; Build tool used to locate the swig executable
build_tool = {}
swig_builder_target = {}

[wheels]
; Download+unpack attempts per wheel (first try + retries)
fetch_attempts = {}
timeout_secs = {}
unzip_tool = {}

[logging]
file = {}
"#,
        config.assembler.max_concurrency,
        config.codegen.shell,
        config.codegen.build_tool,
        config.codegen.swig_builder_target,
        config.wheels.fetch_attempts,
        config.wheels.timeout_secs,
        config.wheels.unzip_tool,
        config.logging.file.display(),
    )
}
