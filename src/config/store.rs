//! Read-only hierarchical key/value store backing profile resolution.
use crate::error::ConfigError;

use super::value::{Table, Value, decode_table};

/// An already-loaded configuration snapshot.
///
/// Keys are lower-cased when the store is built, so every lookup is
/// case-insensitive. The store is never mutated once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigStore {
    root: Table,
}

impl ConfigStore {
    /// Wrap an already-decoded root table.
    ///
    /// Keys must already be lower-cased; use [`ConfigStore::from_toml_str`]
    /// to decode raw TOML.
    #[must_use]
    pub const fn new(root: Table) -> Self {
        Self { root }
    }

    /// Decode TOML text into a store.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not valid TOML, or
    /// [`ConfigError::MalformedSection`] if two keys differ only by case and
    /// cannot be folded together.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, "<string>")
    }

    pub(crate) fn parse(content: &str, file: &str) -> Result<Self, ConfigError> {
        let raw: toml::Table = toml::from_str(content).map_err(|e| ConfigError::Parse {
            file: file.to_string(),
            message: e.message().to_string(),
        })?;
        Ok(Self::new(decode_table(raw, "")?))
    }

    /// The root table.
    #[must_use]
    pub const fn root(&self) -> &Table {
        &self.root
    }

    /// Look up a dotted path such as `"profile.backup.source"`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.').map(str::to_lowercase);
        let first = segments.next()?;
        let mut current = self.root.get(&first)?;
        for segment in segments {
            current = current.as_table()?.get(&segment)?;
        }
        Some(current)
    }

    /// Look up a top-level table by name.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.root.get(&name.to_lowercase())?.as_table()
    }

    /// Whether a top-level key exists, whatever its type.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.root.contains_key(&name.to_lowercase())
    }
}
