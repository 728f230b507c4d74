mod commands;
mod sink;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dartvision", about = "Camera-based dart scoring")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scoring session over a frame source
    Run(commands::run::RunArgs),
    /// Write the enhanced frame and edge map for one image
    Preprocess(commands::preprocess::PreprocessArgs),
    /// Print or save the default configuration
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Preprocess(args) => commands::preprocess::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
