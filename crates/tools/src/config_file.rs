//! Loading `GameConfig` from TOML files.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chambers::GameConfig;

/// Reads and validates a config file. Keys left out keep their defaults.
pub fn load(path: &Path) -> Result<GameConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: GameConfig = toml::from_str(&text)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    config.validate().with_context(|| format!("invalid config in {}", path.display()))?;
    Ok(config)
}
