//! The `assemble` command: manifest in, output tree and report out.

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::info;

use pyassembler::manifest::Manifest;
use pyassembler::report::AssemblyReport;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for `pyassembler assemble`.
#[derive(Debug, Args)]
pub struct AssembleArgs {
    /// Repository root; generator commands run from here
    #[arg(long)]
    pub buck_root: PathBuf,

    /// Output directory to assemble into (created if missing)
    #[arg(long)]
    pub output: PathBuf,

    /// JSON manifest of sources, commands, wheels and expected generated files
    #[arg(long)]
    pub manifest: PathBuf,

    /// Config file (default: ~/.pyassembler/config.ini)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write the JSON report here instead of stdout
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

/// Run the assemble command.
pub async fn run(args: AssembleArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(args.config.as_deref(), args.debug)?;
    runner.log_startup("assemble");

    let manifest = Manifest::load(&args.manifest)?;
    info!(
        "Loaded {} registrations from {}",
        manifest.len(),
        args.manifest.display()
    );

    std::fs::create_dir_all(&args.output).map_err(|error| CliError::FileWrite {
        path: args.output.clone(),
        error,
    })?;

    let mut assembler = runner
        .create_assembler(&args.buck_root, &args.output)
        .await?;
    manifest.apply(&mut assembler);

    let report = assembler.assemble().await;
    emit_report(&report, args.report.as_deref())
}

/// Pretty JSON to `path`, or to stdout when no path is given.
fn emit_report(report: &AssemblyReport, path: Option<&Path>) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(report).map_err(CliError::Report)?;
    match path {
        Some(path) => {
            std::fs::write(path, format!("{}\n", json)).map_err(|error| CliError::FileWrite {
                path: path.to_path_buf(),
                error,
            })?;
            info!("Report written to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
