//! Output configuration resolution
//!
//! The output directory comes from, in order of precedence:
//! 1. `--output-dir` / `BDSUMMARY_OUTPUT_DIR`
//! 2. `output_file_path` in the TOML config file
//!
//! The config file is `--config <FILE>` when given, otherwise `bdsummary.toml`
//! in the working directory if it exists.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use bdsummary_core::ReportConfig;
use serde::Deserialize;

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "bdsummary.toml";

/// On-disk configuration file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Directory that receives the report
    #[serde(alias = "OutputFilePath")]
    pub output_file_path: Option<PathBuf>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }
}

/// Resolve the report configuration from flags and the config file
pub fn resolve(output_dir: Option<PathBuf>, config_path: Option<&Path>) -> Result<ReportConfig> {
    let file = match config_path {
        Some(path) => Some(FileConfig::load(path)?),
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.is_file() {
                Some(FileConfig::load(default)?)
            } else {
                None
            }
        }
    };

    let Some(dir) = output_dir.or_else(|| file.and_then(|f| f.output_file_path)) else {
        bail!(
            "No output directory configured: pass --output-dir, set BDSUMMARY_OUTPUT_DIR, \
             or set output_file_path in {DEFAULT_CONFIG_FILE}"
        );
    };

    let config = ReportConfig::new(dir);
    config.validate()?;
    Ok(config)
}
