pub mod settings;

pub use settings::{Config, DebugLogRotation, GoogleSettings};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the configuration file path
pub fn config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Failed to get config directory")?
        .join("rankcheck");

    // Create config directory if it doesn't exist
    fs::create_dir_all(&config_dir)
        .context("Failed to create config directory")?;

    Ok(config_dir.join("config.toml"))
}

/// Load configuration from file, or create default if not exists.
///
/// Environment overrides are applied after loading and never written back.
pub fn load_or_create_config() -> Result<Config> {
    let path = config_path()?;
    let mut config = load_or_create_at(&path)?;
    config.apply_env_overrides();
    Ok(config)
}

/// Same as [`load_or_create_config`] for an explicit path, without env overrides
pub fn load_or_create_at(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    } else {
        let config = Config::default();
        save_config_at(&config, path)?;

        // stdout belongs to the tool protocol.
        eprintln!("Created default config at: {}", path.display());
        eprintln!("Please edit this file to add your Google API credentials.");

        Ok(config)
    }
}

fn save_config_at(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }
    let content = toml::to_string_pretty(config)
        .context("Failed to serialize config")?;
    fs::write(path, content)
        .context("Failed to write config file")?;
    Ok(())
}

/// Where the key-value store lives: `store_path` if configured, otherwise
/// `store.json` next to the config file.
pub fn store_path(config: &Config) -> Result<PathBuf> {
    match config.store_path.as_deref() {
        Some(raw) => Ok(PathBuf::from(crate::logging::expand_tilde(raw))),
        None => Ok(config_path()?.with_file_name("store.json")),
    }
}
