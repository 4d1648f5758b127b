//! Raw, unmerged view of one profile table.
use std::collections::BTreeMap;

use tracing::warn;

use crate::error::ConfigError;

use super::sections::{self, string_list, validate_flag};
use super::value::{Table, Value};

/// Key naming the parent profile.
pub const INHERIT_KEY: &str = "inherit";
/// Key holding environment variables for the backup engine.
pub const ENV_KEY: &str = "env";

/// Dedicated profile fields, each `None` when the profile does not set it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScalarFields {
    /// `initialize`: create the repository when it does not exist.
    pub initialize: Option<bool>,
    /// `quiet`
    pub quiet: Option<bool>,
    /// `verbose`
    pub verbose: Option<bool>,
    /// `repository`, emitted as `repo`.
    pub repository: Option<String>,
    /// `password-file`
    pub password_file: Option<String>,
    /// `cache-dir`
    pub cache_dir: Option<String>,
    /// `lock`: lock file guarding concurrent runs.
    pub lock: Option<String>,
    /// `run-before`: shell commands run before the profile.
    pub run_before: Option<Vec<String>>,
    /// `run-after`: shell commands run after the profile.
    pub run_after: Option<Vec<String>>,
}

/// One top-level profile table as written, before inheritance is applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileDefinition {
    /// Lower-cased profile key.
    pub name: String,
    /// Parent profile, if any.
    pub inherit: Option<String>,
    /// Dedicated fields.
    pub fields: ScalarFields,
    /// Environment variables declared by this profile, names upper-cased.
    pub env: BTreeMap<String, String>,
    /// Every other profile-level key.
    pub other_flags: Table,
    /// Nested tables keyed by command name.
    pub sections: BTreeMap<String, Table>,
}

impl ProfileDefinition {
    /// Decode and shape-check a profile table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MalformedSection`] if a dedicated field has the
    /// wrong type, a known command is not a table, or a section or flag value
    /// has an unsupported shape.
    pub fn parse(name: &str, table: &Table) -> Result<Self, ConfigError> {
        let mut def = Self {
            name: name.to_string(),
            ..Self::default()
        };

        for (key, value) in table {
            match key.as_str() {
                INHERIT_KEY => {
                    let parent = value.as_str().ok_or_else(|| {
                        ConfigError::malformed(
                            name,
                            format!("'{INHERIT_KEY}' must be a string, found {}", value.kind()),
                        )
                    })?;
                    if parent.trim().is_empty() {
                        warn!("profile '{name}' has an empty '{INHERIT_KEY}'; ignoring it");
                    } else {
                        def.inherit = Some(parent.trim().to_string());
                    }
                }
                "initialize" => def.fields.initialize = Some(bool_field(name, key, value)?),
                "quiet" => def.fields.quiet = Some(bool_field(name, key, value)?),
                "verbose" => def.fields.verbose = Some(bool_field(name, key, value)?),
                "repository" => def.fields.repository = Some(string_field(name, key, value)?),
                "password-file" => {
                    def.fields.password_file = Some(string_field(name, key, value)?);
                }
                "cache-dir" => def.fields.cache_dir = Some(string_field(name, key, value)?),
                "lock" => def.fields.lock = Some(string_field(name, key, value)?),
                "run-before" => def.fields.run_before = Some(list_field(name, key, value)?),
                "run-after" => def.fields.run_after = Some(list_field(name, key, value)?),
                ENV_KEY => def.env = env_table(name, value)?,
                command if sections::is_known_command(command) || value.as_table().is_some() => {
                    let location = format!("{name}.{command}");
                    let section = value.as_table().ok_or_else(|| {
                        ConfigError::malformed(
                            &location,
                            format!("command section must be a table, found {}", value.kind()),
                        )
                    })?;
                    sections::validate(command, &location, section)?;
                    def.sections.insert(command.to_string(), section.clone());
                }
                flag => {
                    validate_flag(name, flag, value)?;
                    def.other_flags.insert(flag.to_string(), value.clone());
                }
            }
        }

        Ok(def)
    }
}

fn bool_field(profile: &str, key: &str, value: &Value) -> Result<bool, ConfigError> {
    value.as_bool().ok_or_else(|| {
        ConfigError::malformed(profile, format!("'{key}' must be a bool, found {}", value.kind()))
    })
}

fn string_field(profile: &str, key: &str, value: &Value) -> Result<String, ConfigError> {
    value.as_str().map(str::to_string).ok_or_else(|| {
        ConfigError::malformed(profile, format!("'{key}' must be a string, found {}", value.kind()))
    })
}

fn list_field(profile: &str, key: &str, value: &Value) -> Result<Vec<String>, ConfigError> {
    string_list(value).ok_or_else(|| {
        ConfigError::malformed(profile, format!("'{key}' must be a string or a list of strings"))
    })
}

fn env_table(profile: &str, value: &Value) -> Result<BTreeMap<String, String>, ConfigError> {
    let location = format!("{profile}.{ENV_KEY}");
    let table = value.as_table().ok_or_else(|| {
        ConfigError::malformed(&location, format!("must be a table, found {}", value.kind()))
    })?;
    table
        .iter()
        .map(|(k, v)| {
            v.to_argument()
                .map(|s| (k.to_uppercase(), s))
                .ok_or_else(|| ConfigError::malformed(&location, format!("'{k}' must be a plain value")))
        })
        .collect()
}
