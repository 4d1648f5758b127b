//! Configuration loading and profile resolution.
pub mod catalog;
pub mod definition;
pub mod flags;
pub mod global;
pub mod inheritance;
pub mod paths;
pub mod profiles;
pub mod sections;
pub mod store;
pub mod toml_loader;
pub mod value;

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub use flags::Flags;
pub use global::Global;
pub use profiles::Profile;
pub use store::ConfigStore;
pub use value::{Table, Value};

/// A loaded configuration file.
#[derive(Debug)]
pub struct Config {
    /// Directory relative profile paths are resolved against.
    pub base_dir: PathBuf,
    /// Decoded configuration.
    pub store: ConfigStore,
    /// Settings from `[global]`.
    pub global: Global,
}

impl Config {
    /// Load a configuration file; relative profile paths resolve against
    /// the file's directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be located, read or parsed, or if
    /// `[global]` is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        let store = toml_loader::load_store(path)?;
        let path = dunce::canonicalize(path)
            .with_context(|| format!("resolving {}", path.display()))?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(Self::from_store(store, base_dir)?)
    }

    /// Wrap an already-built store.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MalformedSection`] if `[global]` is malformed.
    pub fn from_store(store: ConfigStore, base_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let global = Global::from_store(&store)?;
        Ok(Self {
            base_dir: base_dir.into(),
            store,
            global,
        })
    }

    /// Resolve a profile and fix its relative paths against [`Config::base_dir`].
    ///
    /// Returns `Ok(None)` when the profile does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the inheritance chain is broken or a section is
    /// malformed.
    pub fn profile(&self, name: &str) -> Result<Option<Profile>, ConfigError> {
        let base = self.base_dir.to_string_lossy();
        Ok(profiles::resolve(&self.store, name)?.map(|p| p.with_root_path(&base)))
    }

    /// Like [`Config::profile`], treating an absent profile as an error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ProfileNotFound`] when the profile does not
    /// exist, or any resolution error.
    pub fn require_profile(&self, name: &str) -> Result<Profile, ConfigError> {
        self.profile(name)?
            .ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))
    }

    /// See [`catalog::profile_keys`].
    #[must_use]
    pub fn profile_keys(&self) -> Option<Vec<String>> {
        catalog::profile_keys(&self.store)
    }

    /// See [`catalog::profile_groups`].
    ///
    /// # Errors
    ///
    /// Returns an error if `[groups]` is malformed.
    pub fn profile_groups(&self) -> Result<Option<BTreeMap<String, Vec<String>>>, ConfigError> {
        catalog::profile_groups(&self.store)
    }

    /// See [`catalog::profile_sections`].
    #[must_use]
    pub fn profile_sections(&self) -> Option<BTreeMap<String, Vec<String>>> {
        catalog::profile_sections(&self.store)
    }
}
