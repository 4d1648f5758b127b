//! Per-command section rules: typed options, host substitution and
//! retention path defaulting.
use tracing::debug;

use crate::error::ConfigError;

use super::flags::{self, Flags};
use super::value::{Table, Value};

/// The `backup` command section.
pub const BACKUP: &str = "backup";
/// The `retention` pseudo-command, run as `forget` around a backup.
pub const RETENTION: &str = "retention";

/// Command names recognised as profile sections.
pub const KNOWN_COMMANDS: &[&str] = &[
    BACKUP, "check", "forget", "init", "mount", "prune", "restore", RETENTION, "snapshots",
    "stats", "unlock",
];

/// Section key substituted with the current host.
pub const HOST_KEY: &str = "host";
/// Backup key holding the paths to back up.
pub const SOURCE_KEY: &str = "source";
/// Retention key restricting `forget` to a path.
pub const PATH_KEY: &str = "path";

/// Shape of a typed, non-flag section option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OptionKind {
    Bool,
    StringList,
}

/// Section keys consumed as typed options and never emitted as flags.
const SECTION_OPTIONS: &[(&str, &str, OptionKind)] = &[
    (BACKUP, SOURCE_KEY, OptionKind::StringList),
    (BACKUP, "check-before", OptionKind::Bool),
    (BACKUP, "check-after", OptionKind::Bool),
    (BACKUP, "run-before", OptionKind::StringList),
    (BACKUP, "run-after", OptionKind::StringList),
    (RETENTION, "before-backup", OptionKind::Bool),
    (RETENTION, "after-backup", OptionKind::Bool),
];

/// Whether `name` is a recognised command section.
#[must_use]
pub fn is_known_command(name: &str) -> bool {
    KNOWN_COMMANDS.contains(&name)
}

fn option_kind(command: &str, key: &str) -> Option<OptionKind> {
    SECTION_OPTIONS
        .iter()
        .find(|(c, k, _)| *c == command && *k == key)
        .map(|(_, _, kind)| *kind)
}

/// Read a string or a list of strings.
pub(crate) fn string_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::String(s) => Some(vec![s.clone()]),
        Value::List(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => None,
    }
}

/// Check that a flag value is a scalar or a list of scalars.
pub(crate) fn validate_flag(location: &str, key: &str, value: &Value) -> Result<(), ConfigError> {
    match value {
        Value::Map(_) => Err(ConfigError::malformed(
            location,
            format!("nested table '{key}' is not allowed here"),
        )),
        Value::List(items) if !items.iter().all(Value::is_scalar) => Err(ConfigError::malformed(
            location,
            format!("'{key}' must be a list of plain values"),
        )),
        _ => Ok(()),
    }
}

/// Check the shape of every entry of a command section.
pub(crate) fn validate(command: &str, location: &str, section: &Table) -> Result<(), ConfigError> {
    for (key, value) in section {
        match option_kind(command, key) {
            Some(OptionKind::Bool) if value.as_bool().is_none() => {
                return Err(ConfigError::malformed(
                    location,
                    format!("'{key}' must be a bool, found {}", value.kind()),
                ));
            }
            Some(OptionKind::StringList) if string_list(value).is_none() => {
                return Err(ConfigError::malformed(
                    location,
                    format!("'{key}' must be a string or a list of strings"),
                ));
            }
            Some(_) => {}
            None if key == HOST_KEY => {
                if !matches!(value, Value::Bool(_) | Value::String(_)) {
                    return Err(ConfigError::malformed(
                        location,
                        format!("'{HOST_KEY}' must be a bool or a string, found {}", value.kind()),
                    ));
                }
            }
            None => validate_flag(location, key, value)?,
        }
    }
    Ok(())
}

/// Flag-bearing entries of a section, with typed options removed and the
/// `host` entry substituted.
///
/// `host = true` becomes `current_host`, a string is kept verbatim and
/// `host = false` is dropped.
#[must_use]
pub fn flag_values(command: &str, section: &Table, current_host: &str) -> Table {
    let mut values: Table = section
        .iter()
        .filter(|(key, _)| option_kind(command, key).is_none())
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    match values.get(HOST_KEY) {
        Some(Value::Bool(true)) => {
            debug!("{command}: host resolved to current host '{current_host}'");
            values.insert(HOST_KEY.to_string(), Value::String(current_host.to_string()));
        }
        Some(Value::Bool(false)) => {
            values.remove(HOST_KEY);
        }
        _ => {}
    }
    values
}

/// Serialize a command section into flags after host substitution.
#[must_use]
pub fn command_flags(command: &str, section: Option<&Table>, current_host: &str) -> Flags {
    section.map_or_else(Flags::new, |section| {
        flags::serialize(&flag_values(command, section, current_host))
    })
}

/// Serialize the retention section, defaulting `path` to the backup source
/// when it is not set explicitly.
#[must_use]
pub fn retention_flags(
    retention: Option<&Table>,
    backup_source: Option<&Value>,
    current_host: &str,
) -> Flags {
    let mut values = retention.map_or_else(Table::new, |section| {
        flag_values(RETENTION, section, current_host)
    });
    if !values.contains_key(PATH_KEY)
        && let Some(source) = backup_source
    {
        debug!("retention: path defaulted to backup source {source}");
        values.insert(PATH_KEY.to_string(), source.clone());
    }
    flags::serialize(&values)
}
