//! Type-directed conversion of merged values into command-line arguments.
use std::collections::BTreeMap;

use super::value::{Table, Value};

/// Flag name to ordered argument list.
///
/// An empty list means the flag is present without a value; a missing key
/// means the flag is not emitted at all.
pub type Flags = BTreeMap<String, Vec<String>>;

/// Convert one value into its argument list, or `None` when it is omitted.
///
/// `false`, `0`, `0.0`, `""` and `[]` are omitted. List elements are all
/// emitted, including zero-like ones.
#[must_use]
pub fn value_to_arguments(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Bool(true) => Some(Vec::new()),
        Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Int(0) => None,
        Value::Float(f) if *f == 0.0 => None,
        Value::List(items) if items.is_empty() => None,
        Value::List(items) => Some(items.iter().filter_map(Value::to_argument).collect()),
        Value::Map(_) => None,
        scalar => scalar.to_argument().map(|arg| vec![arg]),
    }
}

/// Serialize every entry of `values` into [`Flags`].
#[must_use]
pub fn serialize(values: &Table) -> Flags {
    values
        .iter()
        .filter_map(|(name, value)| value_to_arguments(value).map(|args| (name.clone(), args)))
        .collect()
}

/// Render flags as argv fragments in flag-name order.
///
/// `{"tag": ["a", "b"], "quiet": []}` becomes
/// `["--quiet", "--tag", "a", "--tag", "b"]`.
#[must_use]
pub fn to_arguments(flags: &Flags) -> Vec<String> {
    let mut args = Vec::new();
    for (name, values) in flags {
        if values.is_empty() {
            args.push(format!("--{name}"));
            continue;
        }
        for value in values {
            args.push(format!("--{name}"));
            args.push(value.clone());
        }
    }
    args
}
