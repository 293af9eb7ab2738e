//! Integration tests for a full `Assembler::assemble` run.
//!
//! These tests drive every phase against a temporary buck root and output
//! directory:
//! - Generator commands run through a real shell from the buck root
//! - Sources are linked, wheels unpacked, gaps stubbed
//! - Conflicts and unsupported files end up in the report
//!
//! Run with: `cargo test --test assemble_integration`

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use pyassembler::codegen::{CodegenError, CommandRunner, ShellCommandRunner};
use pyassembler::log::{LogLevel, MemoryLogger};
use pyassembler::orchestrator::{Assembler, AssemblyOptions};
use pyassembler::report::AssemblyReport;
use pyassembler::stubs::PLACEHOLDER_STUB;
use pyassembler::wheels::{ArchiveExtractor, RetryPolicy, WheelDownloader, WheelError};

// ============================================================================
// Test Helpers
// ============================================================================

const SWIG_RESOLVE: &str = "buck build //tools:swig --show-output";

/// Shell runner that answers the SWIG resolution itself.
///
/// With `swig` set, resolution prints `//tools:swig <swig>`; without it,
/// resolution fails as if the target did not build.
struct FakeBuckRunner {
    shell: ShellCommandRunner,
    swig: Option<String>,
}

impl CommandRunner for FakeBuckRunner {
    async fn run(&self, command: &str, working_root: &Path) -> Result<String, CodegenError> {
        if command == SWIG_RESOLVE {
            return match &self.swig {
                Some(swig) => Ok(format!("//tools:swig {}\n", swig)),
                None => Err(CodegenError::Failed {
                    command: command.to_string(),
                    status: "exit status: 1".to_string(),
                    stderr: "BUILD FAILED".to_string(),
                }),
            };
        }
        self.shell.run(command, working_root).await
    }
}

/// Serves in-memory wheels as `path<TAB>content` lines.
#[derive(Default)]
struct FakeIndex {
    wheels: HashMap<String, Vec<(String, String)>>,
    failures: HashMap<String, u32>,
    attempts: Mutex<HashMap<String, u32>>,
}

impl FakeIndex {
    fn with_wheel(mut self, url: &str, entries: &[(&str, &str)]) -> Self {
        self.wheels.insert(
            url.to_string(),
            entries
                .iter()
                .map(|(p, c)| (p.to_string(), c.to_string()))
                .collect(),
        );
        self
    }

    fn failing(mut self, url: &str, times: u32) -> Self {
        self.failures.insert(url.to_string(), times);
        self
    }
}

impl WheelDownloader for FakeIndex {
    async fn download(&self, url: &str, dest: &Path) -> Result<u64, WheelError> {
        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            let count = attempts.entry(url.to_string()).or_insert(0);
            *count += 1;
            *count
        };
        if attempt <= self.failures.get(url).copied().unwrap_or(0) {
            return Err(WheelError::Status {
                url: url.to_string(),
                status: 500 + attempt as u16,
            });
        }
        let entries = self.wheels.get(url).ok_or_else(|| WheelError::Status {
            url: url.to_string(),
            status: 404,
        })?;
        let body: String = entries
            .iter()
            .map(|(path, content)| format!("{}\t{}\n", path, content))
            .collect();
        fs::write(dest, &body).unwrap();
        Ok(body.len() as u64)
    }
}

/// Unpacks the `FakeIndex` format; existing files are never overwritten.
#[derive(Default)]
struct FakeUnzip {
    extractions: AtomicU32,
}

fn read_entries(archive: &Path) -> Vec<(String, String)> {
    fs::read_to_string(archive)
        .unwrap()
        .lines()
        .filter_map(|line| line.split_once('\t'))
        .map(|(p, c)| (p.to_string(), c.to_string()))
        .collect()
}

impl ArchiveExtractor for FakeUnzip {
    async fn list_contents(&self, archive: &Path) -> Result<Vec<String>, WheelError> {
        Ok(read_entries(archive).into_iter().map(|(p, _)| p).collect())
    }

    async fn extract(&self, archive: &Path, dest: &Path) -> Result<usize, WheelError> {
        self.extractions.fetch_add(1, Ordering::SeqCst);
        let entries = read_entries(archive);
        for (path, content) in &entries {
            let target = dest.join(path);
            if fs::symlink_metadata(&target).is_ok() {
                continue;
            }
            fs::create_dir_all(target.parent().unwrap()).unwrap();
            fs::write(&target, content).unwrap();
        }
        Ok(entries.len())
    }
}

struct Workspace {
    _temp: TempDir,
    buck_root: PathBuf,
    out: PathBuf,
    memory: Arc<MemoryLogger>,
}

impl Workspace {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let buck_root = temp.path().join("repo");
        let out = temp.path().join("out");
        fs::create_dir_all(&buck_root).unwrap();
        fs::create_dir_all(&out).unwrap();
        Self {
            _temp: temp,
            buck_root,
            out,
            memory: Arc::new(MemoryLogger::new()),
        }
    }

    /// Write a first-party source file under the buck root.
    fn source(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.buck_root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    fn assembler(
        &self,
        swig: Option<&str>,
        index: FakeIndex,
    ) -> Assembler<FakeBuckRunner, FakeIndex, FakeUnzip> {
        Assembler::with_collaborators(
            &self.buck_root,
            &self.out,
            AssemblyOptions::new()
                .with_max_concurrency(4)
                .with_retry_policy(RetryPolicy::single_retry())
                .with_swig_builder_target("//tools:swig"),
            Arc::new(FakeBuckRunner {
                shell: ShellCommandRunner::default(),
                swig: swig.map(str::to_string),
            }),
            Arc::new(index),
            Arc::new(FakeUnzip::default()),
            self.memory.clone(),
        )
    }
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

const SIX: &str = "https://pypi.example/six-1.16.0-py2.py3-none-any.whl";
const ATTRS: &str = "https://pypi.example/attrs-23.1.0-py3-none-any.whl";

// ============================================================================
// End-to-end
// ============================================================================

#[tokio::test]
async fn test_link_wheel_and_placeholder() {
    let ws = Workspace::new();
    let a = ws.source("a.py", "A = 1\n");
    let mut assembler = ws.assembler(None, FakeIndex::default().with_wheel(SIX, &[("b.py", "B = 2")]));

    assembler.add_source_mapping(&a, ws.out.join("a.py"));
    assembler.add_python_wheel_url(SIX);
    assembler.add_unsupported_generated_source(ws.out.join("c.py"));

    let report = assembler.assemble().await;

    assert_eq!(fs::read_link(ws.out.join("a.py")).unwrap(), a);
    assert_eq!(fs::read_to_string(ws.out.join("a.py")).unwrap(), "A = 1\n");
    assert_eq!(fs::read_to_string(ws.out.join("b.py")).unwrap(), "B = 2");
    assert_eq!(fs::read_to_string(ws.out.join("c.py")).unwrap(), PLACEHOLDER_STUB);
    assert_eq!(
        report,
        AssemblyReport {
            conflicting_files: BTreeSet::new(),
            unsupported_files: set(&["c.py"]),
        }
    );
}

#[tokio::test]
async fn test_registration_conflict_keeps_first_source() {
    let ws = Workspace::new();
    let a = ws.source("a.py", "first\n");
    let b = ws.source("b.py", "second\n");
    let mut assembler = ws.assembler(None, FakeIndex::default());

    assembler.add_source_mapping(&a, ws.out.join("x.py"));
    assembler.add_source_mapping(&b, ws.out.join("x.py"));
    // Identical re-registration is not a conflict.
    assembler.add_source_mapping(&a, ws.out.join("x.py"));

    let report = assembler.assemble().await;

    assert_eq!(fs::read_link(ws.out.join("x.py")).unwrap(), a);
    assert_eq!(report.conflicting_files, set(&["x.py"]));
    assert!(report.unsupported_files.is_empty());
}

#[tokio::test]
async fn test_empty_assembler_reports_clean() {
    let ws = Workspace::new();
    let report = ws.assembler(None, FakeIndex::default()).assemble().await;

    assert!(report.is_clean());
    assert!(ws.memory.messages_at(LogLevel::Warn).is_empty());
    assert!(ws.memory.messages_at(LogLevel::Error).is_empty());
}

// ============================================================================
// Phase ordering
// ============================================================================

#[tokio::test]
async fn test_generated_files_are_not_stubbed() {
    let ws = Workspace::new();
    let mut assembler = ws.assembler(None, FakeIndex::default());

    let generated = ws.out.join("gen/service/ttypes.py");
    assembler.add_thrift_library_build_command(format!(
        "mkdir -p {dir} && echo 'X = 1' > {file}",
        dir = generated.parent().unwrap().display(),
        file = generated.display()
    ));
    assembler.add_unsupported_generated_source(&generated);

    let report = assembler.assemble().await;

    assert_eq!(fs::read_to_string(&generated).unwrap(), "X = 1\n");
    assert!(report.is_clean());
}

#[tokio::test]
async fn test_generators_run_from_buck_root() {
    let ws = Workspace::new();
    let mut assembler = ws.assembler(None, FakeIndex::default());
    let marker = ws.out.join("cwd.txt");
    assembler.add_thrift_library_build_command(format!("pwd > {}", marker.display()));

    assembler.assemble().await;

    let cwd = PathBuf::from(fs::read_to_string(&marker).unwrap().trim());
    assert_eq!(
        fs::canonicalize(cwd).unwrap(),
        fs::canonicalize(&ws.buck_root).unwrap()
    );
}

#[tokio::test]
async fn test_pyi_sibling_suppresses_placeholder() {
    let ws = Workspace::new();
    let mut assembler = ws.assembler(None, FakeIndex::default());

    let typed = ws.out.join("lib/typed.py");
    assembler.add_thrift_library_build_command(format!(
        "mkdir -p {dir} && echo 'def f() -> int: ...' > {file}i",
        dir = typed.parent().unwrap().display(),
        file = typed.display()
    ));
    assembler.add_unsupported_generated_source(&typed);

    let report = assembler.assemble().await;

    assert!(!typed.exists());
    assert!(ws.out.join("lib/typed.pyi").exists());
    assert!(report.unsupported_files.is_empty());
}

#[tokio::test]
async fn test_swig_output_available_to_later_phases() {
    let ws = Workspace::new();
    let mut assembler = ws.assembler(Some("/bin/sh"), FakeIndex::default());

    let wrapper = ws.out.join("native/wrapper.py");
    fs::create_dir_all(wrapper.parent().unwrap()).unwrap();
    // `<executable><command>`: the command carries its own leading space.
    assembler.add_swig_library_build_command(format!(" -c 'echo W = 1 > {}'", wrapper.display()));
    assembler.add_unsupported_generated_source(&wrapper);

    let report = assembler.assemble().await;

    assert_eq!(fs::read_to_string(&wrapper).unwrap(), "W = 1\n");
    assert!(report.is_clean());
}

#[tokio::test]
async fn test_swig_resolution_failure_skips_only_swig() {
    let ws = Workspace::new();
    let a = ws.source("a.py", "A = 1\n");
    let mut assembler = ws.assembler(None, FakeIndex::default());

    let never = ws.out.join("never.txt");
    assembler.add_swig_library_build_command(format!(" -c 'touch {}'", never.display()));
    assembler.add_source_mapping(&a, ws.out.join("a.py"));
    assembler.add_unsupported_generated_source(ws.out.join("native/b.py"));

    let report = assembler.assemble().await;

    assert!(!never.exists());
    assert!(ws.out.join("a.py").exists());
    assert_eq!(report.unsupported_files, set(&["native/b.py"]));
    let errors = ws.memory.messages_at(LogLevel::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("builder is not found"));
}

#[tokio::test]
async fn test_failing_command_does_not_abort_siblings() {
    let ws = Workspace::new();
    let mut assembler = ws.assembler(None, FakeIndex::default());
    let ok = ws.out.join("ok.py");
    assembler.add_thrift_library_build_command("exit 3");
    assembler.add_thrift_library_build_command(format!("touch {}", ok.display()));

    let report = assembler.assemble().await;

    assert!(ok.exists());
    assert!(report.is_clean());
    assert!(ws
        .memory
        .contains("Code generation command failed"));
}

// ============================================================================
// Wheels
// ============================================================================

#[tokio::test]
async fn test_wheel_entry_over_linked_source_is_conflict() {
    let ws = Workspace::new();
    let local = ws.source("vendored/six.py", "# local six\n");
    let index = FakeIndex::default().with_wheel(SIX, &[("six.py", "# wheel six")]);
    let mut assembler = ws.assembler(None, index);

    assembler.add_source_mapping(&local, ws.out.join("six.py"));
    assembler.add_python_wheel_url(SIX);

    let report = assembler.assemble().await;

    assert_eq!(fs::read_link(ws.out.join("six.py")).unwrap(), local);
    assert_eq!(fs::read_to_string(&local).unwrap(), "# local six\n");
    assert_eq!(report.conflicting_files, set(&["six.py"]));
}

#[tokio::test]
async fn test_two_wheels_sharing_a_file_conflict_once() {
    let ws = Workspace::new();
    let index = FakeIndex::default()
        .with_wheel(SIX, &[("six.py", "six"), ("shared/__init__.py", "")])
        .with_wheel(ATTRS, &[("attr/__init__.py", "attrs"), ("shared/__init__.py", "")]);
    let mut assembler = ws.assembler(None, index);
    assembler.add_python_wheel_url(SIX);
    assembler.add_python_wheel_url(ATTRS);

    let report = assembler.assemble().await;

    assert!(ws.out.join("six.py").exists());
    assert!(ws.out.join("attr/__init__.py").exists());
    assert_eq!(report.conflicting_files, set(&["shared/__init__.py"]));
}

#[tokio::test]
async fn test_wheel_failing_once_is_retried() {
    let ws = Workspace::new();
    let index = FakeIndex::default()
        .with_wheel(SIX, &[("six.py", "six")])
        .failing(SIX, 1);
    let mut assembler = ws.assembler(None, index);
    assembler.add_python_wheel_url(SIX);

    let report = assembler.assemble().await;

    assert!(ws.out.join("six.py").exists());
    assert!(report.is_clean());
    assert!(!ws.memory.contains("Cannot fetch and unzip"));
}

#[tokio::test]
async fn test_wheel_failing_twice_is_abandoned() {
    let ws = Workspace::new();
    let index = FakeIndex::default()
        .with_wheel(SIX, &[("six.py", "six")])
        .failing(SIX, 2);
    let mut assembler = ws.assembler(None, index);
    assembler.add_python_wheel_url(SIX);
    assembler.add_unsupported_generated_source(ws.out.join("six.py"));

    let report = assembler.assemble().await;

    // The placeholder fills the gap the wheel would have covered.
    assert_eq!(fs::read_to_string(ws.out.join("six.py")).unwrap(), PLACEHOLDER_STUB);
    assert_eq!(report.unsupported_files, set(&["six.py"]));
    assert!(report.conflicting_files.is_empty());

    let warnings = ws.memory.messages_at(LogLevel::Warn);
    assert!(warnings
        .iter()
        .any(|w| w.contains("Cannot fetch and unzip remote python dependency") && w.contains(SIX)));
    assert!(warnings.iter().any(|w| w.contains("HTTP 501")));
    assert!(warnings.iter().any(|w| w.contains("HTTP 502")));
}
