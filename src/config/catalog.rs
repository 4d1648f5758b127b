//! Enumeration of profiles, groups and profile sections.
use std::collections::BTreeMap;

use tracing::warn;

use crate::error::ConfigError;

use super::sections::{is_known_command, string_list};
use super::store::ConfigStore;
use super::value::Value;

/// Reserved section holding [`Global`](super::global::Global) settings.
pub const GLOBAL_SECTION: &str = "global";
/// Reserved section holding profile groups.
pub const GROUPS_SECTION: &str = "groups";
/// Top-level names that are never profiles.
pub const RESERVED_SECTIONS: &[&str] = &[GLOBAL_SECTION, GROUPS_SECTION];

/// Whether a top-level key is reserved.
#[must_use]
pub fn is_reserved(key: &str) -> bool {
    RESERVED_SECTIONS.contains(&key.to_lowercase().as_str())
}

/// Names of all non-reserved top-level tables holding at least one value.
///
/// Tables that are empty, or only contain empty tables, are skipped.
/// Returns `None` when there are none.
#[must_use]
pub fn profile_keys(store: &ConfigStore) -> Option<Vec<String>> {
    let keys: Vec<String> = store
        .root()
        .iter()
        .filter(|(key, value)| !is_reserved(key) && value.as_table().is_some() && value.has_leaf())
        .map(|(key, _)| key.clone())
        .collect();
    if keys.is_empty() { None } else { Some(keys) }
}

/// Groups declared under `[groups]`, in declaration order of their members.
///
/// An empty `[groups]` table yields `Some` of an empty map; no table at all
/// yields `None`. A group may be a single name or a list of names.
///
/// # Errors
///
/// Returns [`ConfigError::MalformedSection`] if `groups` is not a table or a
/// group is not a string or a list of strings.
pub fn profile_groups(
    store: &ConfigStore,
) -> Result<Option<BTreeMap<String, Vec<String>>>, ConfigError> {
    let Some(value) = store.root().get(GROUPS_SECTION) else {
        return Ok(None);
    };
    let table = value.as_table().ok_or_else(|| {
        ConfigError::malformed(GROUPS_SECTION, format!("must be a table, found {}", value.kind()))
    })?;

    let mut groups = BTreeMap::new();
    for (group, members) in table {
        let members = string_list(members).ok_or_else(|| {
            ConfigError::malformed(
                format!("{GROUPS_SECTION}.{group}"),
                "must be a list of profile names",
            )
        })?;
        for member in &members {
            if store.table(member).is_none() || is_reserved(member) {
                warn!("group '{group}' references unknown profile '{member}'");
            }
        }
        groups.insert(group.clone(), members);
    }
    Ok(Some(groups))
}

/// Profiles from [`profile_keys`] that declare at least one command section,
/// mapped to their sorted command section names.
///
/// Returns `None` when there are none.
#[must_use]
pub fn profile_sections(store: &ConfigStore) -> Option<BTreeMap<String, Vec<String>>> {
    let sections: BTreeMap<String, Vec<String>> = profile_keys(store)?
        .into_iter()
        .filter_map(|key| {
            let commands: Vec<String> = store
                .table(&key)?
                .iter()
                .filter(|(name, value)| is_known_command(name) && matches!(value, Value::Map(_)))
                .map(|(name, _)| name.clone())
                .collect();
            if commands.is_empty() { None } else { Some((key, commands)) }
        })
        .collect();
    if sections.is_empty() { None } else { Some(sections) }
}
