//! Merging an inheritance chain into one resolved profile.
use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::error::ConfigError;

use super::definition::ProfileDefinition;
use super::flags::{self, Flags};
use super::inheritance::build_chain;
use super::paths::fix_path;
use super::sections::{self, BACKUP, RETENTION, SOURCE_KEY};
use super::store::ConfigStore;
use super::value::{Table, Value};

/// Backup flags holding paths relative to the configuration file.
const BACKUP_PATH_FLAGS: &[&str] = &[SOURCE_KEY, "exclude-file", "files-from"];

/// A profile with its whole `inherit` chain folded in.
///
/// Dedicated fields take the value of the nearest profile in the chain that
/// sets them. Other flags, environment variables and every section hold the
/// union of keys across the chain, each key taken from the nearest profile
/// that defines it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Profile {
    /// Name as requested by the caller.
    pub name: String,
    /// Chain of profile keys, self first, root last.
    pub lineage: Vec<String>,
    /// Initialize the repository when it does not exist.
    pub initialize: bool,
    /// Emit `--quiet`.
    pub quiet: bool,
    /// Emit `--verbose`.
    pub verbose: bool,
    /// Repository location, emitted as `--repo`.
    pub repository: String,
    /// Emitted as `--password-file`.
    pub password_file: String,
    /// Emitted as `--cache-dir`.
    pub cache_dir: String,
    /// Lock file guarding concurrent runs.
    pub lock: String,
    /// Shell commands run before the profile.
    pub run_before: Vec<String>,
    /// Shell commands run after the profile.
    pub run_after: Vec<String>,
    /// Environment variables for the backup engine.
    pub env: BTreeMap<String, String>,
    /// Profile-level flags not modelled as dedicated fields.
    pub other_flags: Table,
    /// Command sections keyed by command name.
    pub sections: BTreeMap<String, Table>,
}

/// Resolve `name` against `store`.
///
/// Returns `Ok(None)` when no such profile exists. Resolution is
/// all-or-nothing: any error in the chain discards the whole profile.
///
/// # Errors
///
/// Propagates the errors of [`build_chain`].
pub fn resolve(store: &ConfigStore, name: &str) -> Result<Option<Profile>, ConfigError> {
    let Some(chain) = build_chain(store, name)? else {
        return Ok(None);
    };
    let profile = merge(name, &chain);
    debug!(
        "resolved profile '{name}' from {} definition(s): {} flag(s), {} section(s)",
        chain.len(),
        profile.other_flags.len(),
        profile.sections.len()
    );
    Ok(Some(profile))
}

/// Fold a `[self, parent, ..., root]` chain into one profile.
#[must_use]
pub fn merge(name: &str, chain: &[ProfileDefinition]) -> Profile {
    let mut profile = Profile {
        name: name.to_string(),
        lineage: chain.iter().map(|def| def.name.clone()).collect(),
        initialize: chain.iter().find_map(|d| d.fields.initialize).unwrap_or(false),
        quiet: chain.iter().find_map(|d| d.fields.quiet).unwrap_or(false),
        verbose: chain.iter().find_map(|d| d.fields.verbose).unwrap_or(false),
        repository: nearest(chain, |d| d.fields.repository.as_ref()).unwrap_or_default(),
        password_file: nearest(chain, |d| d.fields.password_file.as_ref()).unwrap_or_default(),
        cache_dir: nearest(chain, |d| d.fields.cache_dir.as_ref()).unwrap_or_default(),
        lock: nearest(chain, |d| d.fields.lock.as_ref()).unwrap_or_default(),
        run_before: nearest(chain, |d| d.fields.run_before.as_ref()).unwrap_or_default(),
        run_after: nearest(chain, |d| d.fields.run_after.as_ref()).unwrap_or_default(),
        ..Profile::default()
    };

    // Root first, so that nearer profiles overwrite.
    for def in chain.iter().rev() {
        profile
            .other_flags
            .extend(def.other_flags.iter().map(|(k, v)| (k.clone(), v.clone())));
        profile
            .env
            .extend(def.env.iter().map(|(k, v)| (k.clone(), v.clone())));
        for (command, section) in &def.sections {
            profile
                .sections
                .entry(command.clone())
                .or_default()
                .extend(section.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
    }
    profile
}

fn nearest<T, F>(chain: &[ProfileDefinition], field: F) -> Option<T>
where
    T: Clone,
    F: Fn(&ProfileDefinition) -> Option<&T>,
{
    chain.iter().find_map(|def| field(def).cloned())
}

impl Profile {
    /// Serialize the profile-level flags: dedicated fields plus other flags.
    #[must_use]
    pub fn common_flags(&self) -> Flags {
        let mut values = self.other_flags.clone();
        let dedicated = [
            ("quiet", Value::Bool(self.quiet)),
            ("verbose", Value::Bool(self.verbose)),
            ("repo", Value::String(self.repository.clone())),
            ("password-file", Value::String(self.password_file.clone())),
            ("cache-dir", Value::String(self.cache_dir.clone())),
        ];
        for (flag, value) in dedicated {
            if flags::value_to_arguments(&value).is_some() {
                values.insert(flag.to_string(), value);
            }
        }
        flags::serialize(&values)
    }

    /// Serialize one command section, substituting `host` with `current_host`.
    ///
    /// A command without a section yields no flags.
    #[must_use]
    pub fn command_flags(&self, command: &str, current_host: &str) -> Flags {
        sections::command_flags(command, self.section(command), current_host)
    }

    /// Serialize the retention section, defaulting `path` to the backup source.
    #[must_use]
    pub fn retention_flags(&self, current_host: &str) -> Flags {
        sections::retention_flags(
            self.section(RETENTION),
            self.section(BACKUP).and_then(|backup| backup.get(SOURCE_KEY)),
            current_host,
        )
    }

    /// Full argument list for `command`: common flags, command flags and,
    /// for `backup`, the source paths as positional arguments.
    #[must_use]
    pub fn command_arguments(&self, command: &str, current_host: &str) -> Vec<String> {
        let command_flags = if command == RETENTION {
            self.retention_flags(current_host)
        } else {
            self.command_flags(command, current_host)
        };
        let mut args = flags::to_arguments(&self.common_flags());
        args.extend(flags::to_arguments(&command_flags));
        if command == BACKUP {
            args.extend(self.backup_source());
        }
        args
    }

    /// The merged section for `command`, if any profile in the chain has one.
    #[must_use]
    pub fn section(&self, command: &str) -> Option<&Table> {
        self.sections.get(&command.to_lowercase())
    }

    /// Names of the declared sections that are known commands.
    #[must_use]
    pub fn commands(&self) -> Vec<&str> {
        self.sections
            .keys()
            .map(String::as_str)
            .filter(|name| sections::is_known_command(name))
            .collect()
    }

    /// Paths to back up.
    #[must_use]
    pub fn backup_source(&self) -> Vec<String> {
        self.section_list(BACKUP, SOURCE_KEY)
    }

    /// A boolean section option such as `backup.check-before`; `false` when unset.
    #[must_use]
    pub fn section_bool(&self, command: &str, key: &str) -> bool {
        self.section(command)
            .and_then(|section| section.get(key))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// A string-or-list section option such as `backup.run-before`; empty when unset.
    #[must_use]
    pub fn section_list(&self, command: &str, key: &str) -> Vec<String> {
        self.section(command)
            .and_then(|section| section.get(key))
            .and_then(sections::string_list)
            .unwrap_or_default()
    }

    /// Resolve relative paths against `base`.
    ///
    /// Applies to `password-file`, `cache-dir`, `lock` and the backup
    /// `source`, `exclude-file` and `files-from` entries.
    #[must_use]
    pub fn with_root_path(mut self, base: &str) -> Self {
        for field in [&mut self.password_file, &mut self.cache_dir, &mut self.lock] {
            *field = fix_path(field, base);
        }
        if let Some(backup) = self.sections.get_mut(BACKUP) {
            for key in BACKUP_PATH_FLAGS {
                if let Some(value) = backup.get_mut(*key) {
                    fix_value_paths(value, base);
                }
            }
        }
        self
    }
}

fn fix_value_paths(value: &mut Value, base: &str) {
    match value {
        Value::String(path) => *path = fix_path(path, base),
        Value::List(items) => items.iter_mut().for_each(|item| fix_value_paths(item, base)),
        _ => {}
    }
}
