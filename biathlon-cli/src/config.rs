//! Race config file loading
//!
//! The config is a JSON record by default; a `.toml` extension switches to TOML
//! with the same (camelCase) keys.

use anyhow::{Context, Result};
use biathlon_core::RaceConfig;
use std::fs;
use std::path::Path;

/// On-disk config encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Pick the encoding from the file extension (JSON unless `.toml`)
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

/// Load and validate a race config file
pub fn load_config(path: &Path) -> Result<RaceConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config = parse_config(&content, ConfigFormat::from_path(path))
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    config
        .validate()
        .with_context(|| format!("Invalid race config in {:?}", path))?;

    log::debug!(
        "Race: {} laps x {}m, penalty loop {}m, {} firing lines, start {} (+{})",
        config.laps,
        config.lap_len,
        config.penalty_len,
        config.firing_lines,
        config.start,
        config.start_delta
    );

    Ok(config)
}

/// Parse config text in the given encoding
pub fn parse_config(content: &str, format: ConfigFormat) -> Result<RaceConfig> {
    let config: RaceConfig = match format {
        ConfigFormat::Json => serde_json::from_str(content)?,
        ConfigFormat::Toml => toml::from_str(content)?,
    };
    Ok(config)
}
