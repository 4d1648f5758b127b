//! Typed configuration values decoded from TOML.
use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::ConfigError;

/// A nested table of configuration values, keyed by lower-cased name.
pub type Table = BTreeMap<String, Value>;

/// A single configuration value.
///
/// Raw TOML is decoded into this closed set exactly once, at the
/// [`ConfigStore`](super::store::ConfigStore) boundary; everything downstream
/// pattern-matches over these variants.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean value.
    Bool(bool),
    /// String value.
    String(String),
    /// Signed integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// Ordered list of values.
    List(Vec<Self>),
    /// Nested table.
    Map(Table),
}

impl Value {
    /// Human-readable name of the variant, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::String(_) => "string",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::List(_) => "list",
            Self::Map(_) => "table",
        }
    }

    /// Whether this value is a scalar (bool, string, integer or float).
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        !matches!(self, Self::List(_) | Self::Map(_))
    }

    /// Return the nested table, if this value is one.
    #[must_use]
    pub const fn as_table(&self) -> Option<&Table> {
        match self {
            Self::Map(t) => Some(t),
            _ => None,
        }
    }

    /// Return the string, if this value is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Return the boolean, if this value is one.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Render a scalar as a single command-line argument.
    ///
    /// Floats use six fractional digits. Returns `None` for lists and tables.
    #[must_use]
    pub fn to_argument(&self) -> Option<String> {
        match self {
            Self::Bool(b) => Some(b.to_string()),
            Self::String(s) => Some(s.clone()),
            Self::Int(i) => Some(i.to_string()),
            Self::Float(f) => Some(format!("{f:.6}")),
            Self::List(_) | Self::Map(_) => None,
        }
    }

    /// Whether the table (recursively) holds at least one non-table value.
    #[must_use]
    pub fn has_leaf(&self) -> bool {
        match self {
            Self::Map(t) => t.values().any(Self::has_leaf),
            _ => true,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Map(t) => write!(f, "{{{} keys}}", t.len()),
            scalar => write!(f, "{}", scalar.to_argument().unwrap_or_default()),
        }
    }
}

/// Decode a TOML value found at `location`, lower-casing every table key.
///
/// # Errors
///
/// Returns [`ConfigError::MalformedSection`] if two keys of one table differ
/// only by case and cannot be folded together.
pub(crate) fn decode(value: toml::Value, location: &str) -> Result<Value, ConfigError> {
    Ok(match value {
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Int(i),
        toml::Value::Float(f) => Value::Float(f),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::List(
            items
                .into_iter()
                .map(|item| decode(item, location))
                .collect::<Result<Vec<_>, ConfigError>>()?,
        ),
        toml::Value::Table(table) => Value::Map(decode_table(table, location)?),
    })
}

/// Decode a TOML table into a [`Table`] with lower-cased keys.
///
/// Keys that only differ by case are folded: tables merge recursively,
/// anything else is a conflict.
///
/// # Errors
///
/// Returns [`ConfigError::MalformedSection`] on a conflicting key.
pub(crate) fn decode_table(table: toml::Table, location: &str) -> Result<Table, ConfigError> {
    let mut decoded = Table::new();
    for (key, value) in table {
        let key = key.to_lowercase();
        let path = if location.is_empty() {
            key.clone()
        } else {
            format!("{location}.{key}")
        };
        let value = decode(value, &path)?;
        let value = match decoded.remove(&key) {
            Some(existing) => fold(existing, value, &path)?,
            None => value,
        };
        decoded.insert(key, value);
    }
    Ok(decoded)
}

fn fold(existing: Value, incoming: Value, location: &str) -> Result<Value, ConfigError> {
    let (Value::Map(mut into), Value::Map(from)) = (existing, incoming) else {
        return Err(ConfigError::malformed(
            location,
            "key is defined more than once with different letter case",
        ));
    };
    for (key, value) in from {
        let path = format!("{location}.{key}");
        let value = match into.remove(&key) {
            Some(existing) => fold(existing, value, &path)?,
            None => value,
        };
        into.insert(key, value);
    }
    Ok(Value::Map(into))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn float_argument_has_six_digits() {
        assert_eq!(Value::Float(4.2).to_argument().unwrap(), "4.200000");
    }

    #[test]
    fn list_has_no_argument() {
        assert!(Value::List(vec![Value::Int(1)]).to_argument().is_none());
    }

    #[test]
    fn decode_lowercases_nested_keys() {
        let raw: toml::Table = toml::from_str("[Profile]\nQuiet = true\n").unwrap();
        let table = decode_table(raw, "").unwrap();
        let profile = table["profile"].as_table().unwrap();
        assert_eq!(profile["quiet"], Value::Bool(true));
    }

    #[test]
    fn differently_cased_tables_fold_together() {
        let raw: toml::Table =
            toml::from_str("[Home]\nrepository = \"/srv\"\n[home.backup]\nsource = \"/\"\n")
                .unwrap();
        let table = decode_table(raw, "").unwrap();
        let home = table["home"].as_table().unwrap();
        assert_eq!(home["repository"], Value::String("/srv".to_string()));
        assert!(home["backup"].as_table().is_some());
    }

    #[test]
    fn differently_cased_scalars_conflict() {
        let raw: toml::Table = toml::from_str("[home]\nQuiet = true\nquiet = false\n").unwrap();
        let err = decode_table(raw, "").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Malformed section [home.quiet]: key is defined more than once with different letter case"
        );
    }

    #[test]
    fn datetime_decodes_to_string() {
        let raw: toml::Table = toml::from_str("at = 1979-05-27T07:32:00Z\n").unwrap();
        let table = decode_table(raw, "").unwrap();
        assert_eq!(table["at"].kind(), "string");
    }

    #[test]
    fn empty_table_has_no_leaf() {
        let mut nested = Table::new();
        nested.insert("backup".to_string(), Value::Map(Table::new()));
        assert!(!Value::Map(nested).has_leaf());
    }

    #[test]
    fn display_list() {
        let v = Value::List(vec![Value::String("a".into()), Value::Int(2)]);
        assert_eq!(v.to_string(), "[a, 2]");
    }
}
