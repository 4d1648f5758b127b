//! Construction of the `inherit` ancestor chain.
use tracing::debug;

use crate::error::ConfigError;

use super::catalog::is_reserved;
use super::definition::ProfileDefinition;
use super::store::ConfigStore;
use super::value::Table;

/// Look up a profile table, ignoring reserved sections and non-table keys.
fn profile_table<'a>(store: &'a ConfigStore, key: &str) -> Option<&'a Table> {
    if is_reserved(key) {
        return None;
    }
    store.table(key)
}

/// Build the chain `[self, parent, grandparent, ...]` for `name`.
///
/// Returns `Ok(None)` when `name` is not a profile at all. Every parsed
/// definition is shape-checked on the way.
///
/// # Errors
///
/// - [`ConfigError::UnknownParent`] if an `inherit` names a missing profile
/// - [`ConfigError::CyclicInheritance`] if the chain revisits a profile
/// - [`ConfigError::MalformedSection`] if any definition is malformed
pub fn build_chain(
    store: &ConfigStore,
    name: &str,
) -> Result<Option<Vec<ProfileDefinition>>, ConfigError> {
    let key = name.to_lowercase();
    let Some(table) = profile_table(store, &key) else {
        debug!("profile '{name}' not found");
        return Ok(None);
    };

    let mut chain = vec![ProfileDefinition::parse(&key, table)?];
    let mut visited = vec![key];

    while let Some(parent) = chain.last().and_then(|def| def.inherit.clone()) {
        let parent_key = parent.to_lowercase();
        if visited.contains(&parent_key) {
            visited.push(parent_key);
            return Err(ConfigError::CyclicInheritance(visited));
        }
        let child = visited.last().cloned().unwrap_or_default();
        let table = profile_table(store, &parent_key).ok_or_else(|| ConfigError::UnknownParent {
            profile: child.clone(),
            parent: parent.clone(),
        })?;
        debug!("profile '{child}' inherits from '{parent_key}'");
        chain.push(ProfileDefinition::parse(&parent_key, table)?);
        visited.push(parent_key);
    }

    Ok(Some(chain))
}
