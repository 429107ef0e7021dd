mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

use crate::library::MediaRoot;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = ["./reelshelf.toml", "~/.config/reelshelf/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.stream_buffer_size == 0 {
        anyhow::bail!("Stream buffer size cannot be 0");
    }

    if config.server.read_timeout_secs == 0 {
        anyhow::bail!("Read timeout cannot be 0");
    }

    if config.extension_filter().extensions().is_empty() {
        tracing::warn!("No playable extensions configured; search will return nothing");
    }

    Ok(())
}

/// Resolve the media root to an absolute path and make sure it is a directory.
pub fn resolve_root(path: &Path) -> Result<MediaRoot> {
    let root = MediaRoot::new(path)
        .with_context(|| format!("Invalid root directory {:?}", path))?;

    match std::fs::metadata(root.path()) {
        Ok(meta) if meta.is_dir() => Ok(root),
        Ok(_) => anyhow::bail!("Root {:?} is not a directory", root.path()),
        Err(_) => anyhow::bail!(
            "Root directory {:?} not found. Create it and add videos",
            root.path()
        ),
    }
}
