use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use dartvision_core::pipeline::config::DartConfig;

#[derive(Args)]
pub struct ConfigArgs {
    /// Write the defaults to this file instead of stdout
    #[arg(short, long, conflicts_with = "check")]
    pub output: Option<PathBuf>,

    /// Validate an existing config file and print the effective values
    #[arg(long)]
    pub check: Option<PathBuf>,
}

pub fn run(args: &ConfigArgs) -> Result<()> {
    if let Some(ref path) = args.check {
        let config = DartConfig::load(path)
            .with_context(|| format!("{} is not a usable config", path.display()))?;
        eprintln!("{} {}", style("OK").green().bold(), path.display());
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let defaults = DartConfig::default().to_toml_string()?;
    match args.output {
        Some(ref path) => {
            std::fs::write(path, &defaults)
                .with_context(|| format!("Failed to write config to {}", path.display()))?;
            println!("Default config saved to {}", path.display());
        }
        None => print!("{defaults}"),
    }
    Ok(())
}
