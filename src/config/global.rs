//! Settings from the reserved `[global]` section.
use serde::Serialize;

use crate::error::ConfigError;

use super::catalog::GLOBAL_SECTION;
use super::store::ConfigStore;
use super::value::Value;

/// Command run when none is given on the command line.
pub const DEFAULT_COMMAND: &str = "snapshots";

/// Process-wide settings shared by every profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Global {
    /// Backup engine command to run when none is given.
    pub default_command: String,
    /// Initialize repositories of every profile.
    pub initialize: bool,
    /// Path to the backup engine binary; empty means search `PATH`.
    pub restic_binary: String,
    /// Process niceness.
    pub nice: i64,
    /// Whether to set the I/O scheduling class.
    pub ionice: bool,
    /// I/O scheduling class.
    pub ionice_class: i64,
    /// I/O scheduling priority within the class.
    pub ionice_level: i64,
}

impl Default for Global {
    fn default() -> Self {
        Self {
            default_command: DEFAULT_COMMAND.to_string(),
            initialize: false,
            restic_binary: String::new(),
            nice: 0,
            ionice: false,
            ionice_class: 0,
            ionice_level: 0,
        }
    }
}

impl Global {
    /// Read `[global]`, falling back to defaults for absent keys.
    ///
    /// Unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MalformedSection`] if `global` is not a table or
    /// a known key has the wrong type.
    pub fn from_store(store: &ConfigStore) -> Result<Self, ConfigError> {
        let mut global = Self::default();
        let Some(value) = store.root().get(GLOBAL_SECTION) else {
            return Ok(global);
        };
        let table = value.as_table().ok_or_else(|| {
            ConfigError::malformed(GLOBAL_SECTION, format!("must be a table, found {}", value.kind()))
        })?;

        for (key, value) in table {
            match key.as_str() {
                "default-command" => global.default_command = expect_string(key, value)?,
                "initialize" => global.initialize = expect_bool(key, value)?,
                "restic-binary" => global.restic_binary = expect_string(key, value)?,
                "nice" => global.nice = expect_int(key, value)?,
                "ionice" => global.ionice = expect_bool(key, value)?,
                "ionice-class" => global.ionice_class = expect_int(key, value)?,
                "ionice-level" => global.ionice_level = expect_int(key, value)?,
                _ => {}
            }
        }
        Ok(global)
    }
}

fn mismatch(key: &str, expected: &str, value: &Value) -> ConfigError {
    ConfigError::malformed(
        GLOBAL_SECTION,
        format!("'{key}' must be {expected}, found {}", value.kind()),
    )
}

fn expect_string(key: &str, value: &Value) -> Result<String, ConfigError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| mismatch(key, "a string", value))
}

fn expect_bool(key: &str, value: &Value) -> Result<bool, ConfigError> {
    value.as_bool().ok_or_else(|| mismatch(key, "a bool", value))
}

fn expect_int(key: &str, value: &Value) -> Result<i64, ConfigError> {
    match value {
        Value::Int(i) => Ok(*i),
        _ => Err(mismatch(key, "an integer", value)),
    }
}
