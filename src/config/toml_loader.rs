//! TOML configuration file loading.
use anyhow::{Context, Result};
use std::path::Path;

use crate::error::ConfigError;

use super::store::ConfigStore;

/// Read and decode a TOML configuration file into a [`ConfigStore`].
///
/// # Errors
///
/// Returns an error if the file does not exist, cannot be read, or is not
/// valid TOML.
pub fn load_store(path: &Path) -> Result<ConfigStore> {
    if !path.exists() {
        anyhow::bail!("configuration file not found: {}", path.display());
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;

    ConfigStore::parse(&content, &path.display().to_string())
        .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
}
