//! # Value-Validity Predicate
//!
//! Checks whether a literal JSON value conforms to a value-type
//! definition, resolving named kinds through the type table. Used for
//! `sourceConfigs.static.default` and `sourceConfigs.const.value`.
//!
//! The predicate is total: malformed definitions (a composite kind missing
//! its nested obligation, an unresolvable named kind) simply fail the
//! match. The reference checker reports those defects with real errors;
//! here they only mean "this value cannot be shown valid".

use serde_json::Value;

use crate::kinds::is_builtin_kind;
use crate::meta::{TypeTable, ValueType};

/// Named-type chains longer than this are treated as unresolvable.
/// Guards against cyclic type tables (`"A": {"kind": "B"}, "B": {"kind": "A"}`).
const MAX_NAMED_DEPTH: usize = 64;

/// Returns true if `value` is a valid literal for `def` under `types`.
pub fn value_matches(value: &Value, def: &ValueType, types: &TypeTable) -> bool {
    let Some(def) = resolve_named(def, types) else {
        return false;
    };

    if value.is_null() {
        return def.not_null != Some(true);
    }

    match def.kind.as_str() {
        "string" => value.is_string(),
        "bool" => value.is_boolean(),
        "int" => value.is_i64() || value.is_u64(),
        "float" => value.is_number(),
        // Component references, functions, and untyped values cannot be
        // checked statically.
        "component" | "func" | "any" => true,
        "oneOf" => def
            .options
            .as_ref()
            .is_some_and(|options| options.iter().any(|option| option.value == *value)),
        "arrayOf" => match (&def.of_type, value.as_array()) {
            (Some(of_type), Some(items)) => {
                items.iter().all(|item| value_matches(item, of_type, types))
            }
            _ => false,
        },
        "objectOf" => match (&def.of_type, value.as_object()) {
            (Some(of_type), Some(entries)) => entries
                .values()
                .all(|entry| value_matches(entry, of_type, types)),
            _ => false,
        },
        "shape" => match (&def.fields, value.as_object()) {
            (Some(fields), Some(map)) => {
                map.keys().all(|key| fields.contains_key(key))
                    && fields.iter().all(|(name, field)| match map.get(name) {
                        Some(field_value) => value_matches(field_value, field, types),
                        None => field.not_null != Some(true),
                    })
            }
            _ => false,
        },
        _ => false,
    }
}

/// Render a value-type definition for error messages, e.g. `arrayOf(int)`
/// or `shape({x: int, y: int})`. Named kinds render as their name.
pub fn describe_kind(def: &ValueType, types: &TypeTable) -> String {
    match def.kind.as_str() {
        "oneOf" => {
            let options = def.options.as_deref().unwrap_or_default();
            let rendered: Vec<String> = options.iter().map(|o| o.value.to_string()).collect();
            format!("oneOf({})", rendered.join(", "))
        }
        "arrayOf" => match &def.of_type {
            Some(of_type) => format!("arrayOf({})", describe_kind(of_type, types)),
            None => "arrayOf(?)".to_string(),
        },
        "objectOf" => match &def.of_type {
            Some(of_type) => format!("objectOf({})", describe_kind(of_type, types)),
            None => "objectOf(?)".to_string(),
        },
        "shape" => {
            let fields = def.fields.iter().flatten();
            let rendered: Vec<String> = fields
                .map(|(name, field)| format!("{name}: {}", describe_kind(field, types)))
                .collect();
            format!("shape({{{}}})", rendered.join(", "))
        }
        other => other.to_string(),
    }
}

/// Follow named-kind references until a builtin kind is reached.
fn resolve_named<'a>(def: &'a ValueType, types: &'a TypeTable) -> Option<&'a ValueType> {
    let mut current = def;
    let mut depth = 0;
    while !is_builtin_kind(&current.kind) {
        current = types.get(&current.kind)?;
        depth += 1;
        if depth > MAX_NAMED_DEPTH {
            return None;
        }
    }
    Some(current)
}
