//! The assembler: registries plus the five-phase run.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::codegen::{CommandRunner, ShellCommandRunner, SwigLibraryBuilder, ThriftLibraryBuilder};
use crate::config::ConfigFile;
use crate::log::Logger;
use crate::log_info;
use crate::report::{AssemblyReport, DiagnosticSet};
use crate::sources::{Registration, SourceMappingRegistry};
use crate::stubs::StubGenerator;
use crate::wheels::{
    ArchiveExtractor, HttpWheelDownloader, ShellExtractor, WheelDownloader, WheelError,
    WheelFetcher,
};

use super::AssemblyOptions;

/// Builds one output directory from registered build facts.
///
/// Registration takes `&mut self` and does no I/O. [`assemble`](Self::assemble)
/// consumes the assembler, so every instance produces exactly one report.
///
/// # Example
///
/// ```ignore
/// use pyassembler::config::ConfigFile;
/// use pyassembler::log::TracingLogger;
/// use pyassembler::orchestrator::Assembler;
/// use std::sync::Arc;
///
/// let mut assembler = Assembler::from_config(
///     "/repo", "/repo/buck-out/pyre", &ConfigFile::load()?, Arc::new(TracingLogger),
/// )?;
/// assembler.add_source_mapping("/repo/lib/a.py", "/repo/buck-out/pyre/lib/a.py");
/// assembler.add_python_wheel_url("https://pypi.example/six-1.16.0-py2.py3-none-any.whl");
/// let report = assembler.assemble().await;
/// ```
pub struct Assembler<R = ShellCommandRunner, D = HttpWheelDownloader, X = ShellExtractor>
where
    R: CommandRunner,
    D: WheelDownloader,
    X: ArchiveExtractor,
{
    buck_root: PathBuf,
    output_directory: PathBuf,
    options: AssemblyOptions,
    runner: Arc<R>,
    downloader: Arc<D>,
    extractor: Arc<X>,
    logger: Arc<dyn Logger>,

    sources: SourceMappingRegistry,
    unsupported_generated_sources: HashSet<PathBuf>,
    python_wheel_urls: HashSet<String>,
    thrift_library_build_commands: HashSet<String>,
    swig_library_build_commands: HashSet<String>,

    conflicting_files: DiagnosticSet,
    unsupported_files: DiagnosticSet,
}

impl Assembler {
    /// Production assembler: shell commands, HTTP downloads, `unzip`.
    pub fn from_config(
        buck_root: impl Into<PathBuf>,
        output_directory: impl Into<PathBuf>,
        config: &ConfigFile,
        logger: Arc<dyn Logger>,
    ) -> Result<Self, WheelError> {
        let downloader = HttpWheelDownloader::new(config.wheels.timeout())?;
        Ok(Self::with_collaborators(
            buck_root,
            output_directory,
            AssemblyOptions::from_config(config),
            Arc::new(ShellCommandRunner::new(config.codegen.shell.clone())),
            Arc::new(downloader),
            Arc::new(ShellExtractor::new(config.wheels.unzip_tool.clone())),
            logger,
        ))
    }
}

impl<R, D, X> Assembler<R, D, X>
where
    R: CommandRunner,
    D: WheelDownloader,
    X: ArchiveExtractor,
{
    /// Assembler with explicit collaborators.
    ///
    /// # Arguments
    ///
    /// * `buck_root` - Working directory for every generator command
    /// * `output_directory` - Root of the assembled tree; reported paths are relative to it
    pub fn with_collaborators(
        buck_root: impl Into<PathBuf>,
        output_directory: impl Into<PathBuf>,
        options: AssemblyOptions,
        runner: Arc<R>,
        downloader: Arc<D>,
        extractor: Arc<X>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        let output_directory = output_directory.into();
        let conflicting_files = DiagnosticSet::new();
        Self {
            buck_root: buck_root.into(),
            sources: SourceMappingRegistry::new(output_directory.clone(), conflicting_files.clone()),
            output_directory,
            options,
            runner,
            downloader,
            extractor,
            logger,
            unsupported_generated_sources: HashSet::new(),
            python_wheel_urls: HashSet::new(),
            thrift_library_build_commands: HashSet::new(),
            swig_library_build_commands: HashSet::new(),
            conflicting_files,
            unsupported_files: DiagnosticSet::new(),
        }
    }

    pub fn buck_root(&self) -> &Path {
        &self.buck_root
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    pub fn options(&self) -> &AssemblyOptions {
        &self.options
    }

    /// Map `output_path` to `source_path`; first registration per output wins.
    pub fn add_source_mapping(
        &mut self,
        source_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> Registration {
        self.sources.register(source_path, output_path)
    }

    /// Expect `path` to be produced by some generator; stubbed if it is not.
    pub fn add_unsupported_generated_source(&mut self, path: impl Into<PathBuf>) {
        self.unsupported_generated_sources.insert(path.into());
    }

    pub fn add_python_wheel_url(&mut self, url: impl Into<String>) {
        self.python_wheel_urls.insert(url.into());
    }

    pub fn add_thrift_library_build_command(&mut self, command: impl Into<String>) {
        self.thrift_library_build_commands.insert(command.into());
    }

    pub fn add_swig_library_build_command(&mut self, command: impl Into<String>) {
        self.swig_library_build_commands.insert(command.into());
    }

    pub fn sources(&self) -> &SourceMappingRegistry {
        &self.sources
    }

    pub fn unsupported_generated_sources(&self) -> &HashSet<PathBuf> {
        &self.unsupported_generated_sources
    }

    pub fn python_wheel_urls(&self) -> &HashSet<String> {
        &self.python_wheel_urls
    }

    pub fn thrift_library_build_commands(&self) -> &HashSet<String> {
        &self.thrift_library_build_commands
    }

    pub fn swig_library_build_commands(&self) -> &HashSet<String> {
        &self.swig_library_build_commands
    }

    /// Conflicts recorded so far (registration conflicts before `assemble`).
    pub fn conflicting_files(&self) -> &DiagnosticSet {
        &self.conflicting_files
    }

    /// Run every phase in order and report what conflicted or was stubbed.
    ///
    /// Never fails: per-item failures are logged and the run carries on.
    pub async fn assemble(self) -> AssemblyReport {
        let Self {
            buck_root,
            output_directory,
            options,
            runner,
            downloader,
            extractor,
            logger,
            sources,
            unsupported_generated_sources,
            python_wheel_urls,
            thrift_library_build_commands,
            swig_library_build_commands,
            conflicting_files,
            unsupported_files,
        } = self;
        let max_concurrency = options.max_concurrency();

        log_info!(
            logger,
            "Assembling {} from {}",
            output_directory.display(),
            buck_root.display()
        );

        ThriftLibraryBuilder::new(Arc::clone(&runner), Arc::clone(&logger), max_concurrency)
            .build_all(thrift_library_build_commands, &buck_root)
            .await;

        SwigLibraryBuilder::new(
            Arc::clone(&runner),
            Arc::clone(&logger),
            options.build_tool(),
            options.swig_builder_target(),
            max_concurrency,
        )
        .build_all(swig_library_build_commands, &buck_root)
        .await;

        sources.materialize(max_concurrency, &logger).await;

        WheelFetcher::new(
            downloader,
            extractor,
            options.retry_policy(),
            Arc::clone(&logger),
            conflicting_files.clone(),
            max_concurrency,
        )
        .fetch_all(python_wheel_urls, &output_directory)
        .await;

        StubGenerator::new(Arc::clone(&logger), unsupported_files.clone(), max_concurrency)
            .fill_gaps(unsupported_generated_sources, &output_directory)
            .await;

        let report = AssemblyReport::new(&conflicting_files, &unsupported_files);
        log_info!(
            logger,
            "Assembly finished: {} conflicting, {} unsupported files",
            report.conflicting_files.len(),
            report.unsupported_files.len()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::testing::ScriptedRunner;
    use crate::log::MemoryLogger;
    use crate::wheels::RetryPolicy;

    /// Downloader/extractor pair that is never expected to be called.
    struct Unreachable;

    impl WheelDownloader for Unreachable {
        async fn download(&self, url: &str, _dest: &Path) -> Result<u64, WheelError> {
            panic!("unexpected download of {}", url)
        }
    }

    impl ArchiveExtractor for Unreachable {
        async fn list_contents(&self, _archive: &Path) -> Result<Vec<String>, WheelError> {
            panic!("unexpected listing")
        }

        async fn extract(&self, _archive: &Path, _dest: &Path) -> Result<usize, WheelError> {
            panic!("unexpected extraction")
        }
    }

    fn assembler(runner: Arc<ScriptedRunner>) -> Assembler<ScriptedRunner, Unreachable, Unreachable> {
        Assembler::with_collaborators(
            "/repo",
            "/repo/out",
            AssemblyOptions::new()
                .with_max_concurrency(2)
                .with_retry_policy(RetryPolicy::single_retry()),
            runner,
            Arc::new(Unreachable),
            Arc::new(Unreachable),
            Arc::new(MemoryLogger::new()),
        )
    }

    #[test]
    fn test_registries_deduplicate() {
        let mut asm = assembler(Arc::new(ScriptedRunner::default()));
        asm.add_python_wheel_url("https://pypi.example/a.whl");
        asm.add_python_wheel_url("https://pypi.example/a.whl");
        asm.add_thrift_library_build_command("gen py:json a");
        asm.add_thrift_library_build_command("gen py:json a");
        asm.add_swig_library_build_command(" -python a.i");
        asm.add_unsupported_generated_source("/repo/out/a.py");
        asm.add_unsupported_generated_source("/repo/out/a.py");

        assert_eq!(asm.python_wheel_urls().len(), 1);
        assert_eq!(asm.thrift_library_build_commands().len(), 1);
        assert_eq!(asm.swig_library_build_commands().len(), 1);
        assert_eq!(asm.unsupported_generated_sources().len(), 1);
    }

    #[test]
    fn test_registration_conflict_recorded_immediately() {
        let mut asm = assembler(Arc::new(ScriptedRunner::default()));
        asm.add_source_mapping("/repo/a.py", "/repo/out/x.py");
        let outcome = asm.add_source_mapping("/repo/b.py", "/repo/out/x.py");

        assert!(matches!(outcome, Registration::Conflict { .. }));
        assert!(asm.conflicting_files().contains("x.py"));
        assert_eq!(
            asm.sources().source_for(Path::new("/repo/out/x.py")),
            Some(Path::new("/repo/a.py"))
        );
    }

    #[test]
    fn test_accessors() {
        let asm = assembler(Arc::new(ScriptedRunner::default()));
        assert_eq!(asm.buck_root(), Path::new("/repo"));
        assert_eq!(asm.output_directory(), Path::new("/repo/out"));
        assert_eq!(asm.options().max_concurrency(), 2);
    }

    #[tokio::test]
    async fn test_generators_run_from_buck_root_in_phase_order() {
        let runner = Arc::new(ScriptedRunner {
            stdout: std::collections::HashMap::from([(
                "buck build //third-party-buck/platform007/tools/swig:bin/swig --show-output"
                    .to_string(),
                "//third-party-buck/platform007/tools/swig:bin/swig /opt/swig\n".to_string(),
            )]),
            ..Default::default()
        });
        let mut asm = assembler(Arc::clone(&runner));
        asm.add_thrift_library_build_command("thrift1 --gen py:json a.thrift");
        asm.add_swig_library_build_command(" -python a.i");

        let report = asm.assemble().await;

        let calls = runner.calls.lock().unwrap();
        let order: Vec<&str> = calls.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(
            order,
            vec![
                "thrift1 --gen py:json a.thrift",
                "buck build //third-party-buck/platform007/tools/swig:bin/swig --show-output",
                "/opt/swig -python a.i",
            ]
        );
        assert!(calls.iter().all(|(_, root)| root == Path::new("/repo")));
        assert!(report.is_clean());
    }
}
