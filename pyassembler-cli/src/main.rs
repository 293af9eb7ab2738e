//! pyassembler CLI - Command-line interface
//!
//! Assembles a Python output tree from a JSON manifest of resolved build facts
//! and prints the resulting report.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::assemble::AssembleArgs;
use commands::config::ConfigCommands;

#[derive(Parser)]
#[command(name = "pyassembler")]
#[command(version = pyassembler::VERSION)]
#[command(about = "Assemble a Python output tree for type checking", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run code generators, link sources, unpack wheels and stub the gaps
    Assemble(AssembleArgs),

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Assemble(args) => commands::assemble::run(args).await,
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
