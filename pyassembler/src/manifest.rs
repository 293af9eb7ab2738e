//! Build-fact manifest.
//!
//! A [`Manifest`] is the JSON form of the registration calls a graph walker
//! would make. The CLI loads one and [`apply`](Manifest::apply)s it to an
//! [`Assembler`].
//!
//! ```json
//! {
//!   "sources": [{"source": "lib/a.py", "output": "lib/a.py"}],
//!   "thrift_commands": ["thrift1 --gen mstch_pyi:json lib/a.thrift"],
//!   "swig_commands": [" -python -o out/b_wrap.c lib/b.i"],
//!   "wheel_urls": ["https://pypi.example/six-1.16.0-py2.py3-none-any.whl"],
//!   "unsupported_generated_sources": ["lib/c.py"]
//! }
//! ```
//!
//! Every field is optional. Relative source paths are resolved against the
//! buck root; relative output and unsupported paths against the output
//! directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codegen::CommandRunner;
use crate::orchestrator::Assembler;
use crate::wheels::{ArchiveExtractor, WheelDownloader};

/// Errors loading a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to read manifest {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid manifest {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One output-to-source link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEntry {
    pub source: PathBuf,
    pub output: PathBuf,
}

/// Registration calls in serialized form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    pub sources: Vec<SourceEntry>,
    pub thrift_commands: Vec<String>,
    pub swig_commands: Vec<String>,
    pub wheel_urls: Vec<String>,
    pub unsupported_generated_sources: Vec<PathBuf>,
}

impl Manifest {
    /// Load a manifest from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }

    /// Total number of registrations this manifest makes.
    pub fn len(&self) -> usize {
        self.sources.len()
            + self.thrift_commands.len()
            + self.swig_commands.len()
            + self.wheel_urls.len()
            + self.unsupported_generated_sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Register every entry with `assembler`, in manifest order.
    pub fn apply<R, D, X>(self, assembler: &mut Assembler<R, D, X>)
    where
        R: CommandRunner,
        D: WheelDownloader,
        X: ArchiveExtractor,
    {
        let buck_root = assembler.buck_root().to_path_buf();
        let output_directory = assembler.output_directory().to_path_buf();

        for entry in self.sources {
            assembler.add_source_mapping(
                resolve(&buck_root, entry.source),
                resolve(&output_directory, entry.output),
            );
        }
        for command in self.thrift_commands {
            assembler.add_thrift_library_build_command(command);
        }
        for command in self.swig_commands {
            assembler.add_swig_library_build_command(command);
        }
        for url in self.wheel_urls {
            assembler.add_python_wheel_url(url);
        }
        for path in self.unsupported_generated_sources {
            assembler.add_unsupported_generated_source(resolve(&output_directory, path));
        }
    }
}

fn resolve(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}
