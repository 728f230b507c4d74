pub mod config;
pub mod preprocess;
pub mod run;

use std::path::Path;

use anyhow::{Context, Result};
use dartvision_core::pipeline::config::DartConfig;

/// Load the config file if one was given, otherwise the defaults.
pub fn load_config(path: Option<&Path>) -> Result<DartConfig> {
    match path {
        Some(path) => DartConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(DartConfig::default()),
    }
}
