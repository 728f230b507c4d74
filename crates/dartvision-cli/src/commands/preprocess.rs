use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use dartvision_core::io::image_io::{load_frame, save_encoded};
use dartvision_core::pipeline::config::EdgeRendering;
use dartvision_core::preprocess::prepare;

use super::load_config;

#[derive(Args)]
pub struct PreprocessArgs {
    /// Input image
    pub file: PathBuf,

    /// Config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the target width
    #[arg(long)]
    pub width: Option<u32>,

    /// Skip the edge map
    #[arg(long)]
    pub no_edges: bool,

    /// Shade edges by gradient strength instead of pure white
    #[arg(long)]
    pub proportional: bool,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
}

pub fn run(args: &PreprocessArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?.preprocess;
    if let Some(width) = args.width {
        config.target_width = width;
    }
    if args.no_edges {
        config.emit_edges = false;
    }
    if args.proportional {
        config.edge_rendering = EdgeRendering::proportional();
    }

    let frame = load_frame(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let prepared = prepare(&frame, &config)?;

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;

    println!("Input:     {} ({}x{})", args.file.display(), frame.width(), frame.height());

    let enhanced_path = args.output.join("enhanced.jpg");
    save_encoded(&prepared.enhanced, &enhanced_path)?;
    println!(
        "Enhanced:  {} ({}x{}, {} bytes)",
        enhanced_path.display(),
        prepared.enhanced.width,
        prepared.enhanced.height,
        prepared.enhanced.bytes.len()
    );

    if let Some(ref edges) = prepared.edges {
        let edges_path = args.output.join("edges.jpg");
        save_encoded(edges, &edges_path)?;
        println!(
            "Edges:     {} ({}x{}, {} bytes)",
            edges_path.display(),
            edges.width,
            edges.height,
            edges.bytes.len()
        );
    }

    Ok(())
}
