//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! The single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;
use std::str::FromStr;

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    if let Some(section) = ini.section(Some("assembler")) {
        if let Some(v) = section.get("max_concurrency") {
            config.assembler.max_concurrency =
                parse_number(v, "assembler", "max_concurrency", "expected a non-negative integer")?;
        }
    }

    if let Some(section) = ini.section(Some("codegen")) {
        if let Some(v) = non_empty(section.get("shell")) {
            config.codegen.shell = v.to_string();
        }
        if let Some(v) = non_empty(section.get("build_tool")) {
            config.codegen.build_tool = v.to_string();
        }
        if let Some(v) = non_empty(section.get("swig_builder_target")) {
            config.codegen.swig_builder_target = v.to_string();
        }
    }

    if let Some(section) = ini.section(Some("wheels")) {
        if let Some(v) = section.get("fetch_attempts") {
            let attempts: u32 =
                parse_number(v, "wheels", "fetch_attempts", "expected a positive integer")?;
            if attempts == 0 {
                return Err(invalid("wheels", "fetch_attempts", v, "must be at least 1"));
            }
            config.wheels.fetch_attempts = attempts;
        }
        if let Some(v) = section.get("timeout_secs") {
            config.wheels.timeout_secs =
                parse_number(v, "wheels", "timeout_secs", "expected a number of seconds")?;
        }
        if let Some(v) = non_empty(section.get("unzip_tool")) {
            config.wheels.unzip_tool = v.to_string();
        }
    }

    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = non_empty(section.get("file")) {
            config.logging.file = expand_tilde(v);
        }
    }

    Ok(config)
}

fn parse_number<T: FromStr>(
    value: &str,
    section: &str,
    key: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, reason))
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
