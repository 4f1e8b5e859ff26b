//! # Reference Checker
//!
//! Recursive descent over an already-structurally-valid value-type tree,
//! confirming that every embedded string key resolves in the string table
//! and every named kind resolves in the type table.
//!
//! Unlike the structural validator, this checker fails on the FIRST
//! violation: later checks presuppose earlier ones passed (recursing into
//! `ofType` assumes it exists), so there is nothing meaningful to batch.
//!
//! Checks run in a fixed order at every node:
//!   1. `textKey` / `descriptionTextKey` (when the position carries them)
//!   2. non-builtin `kind` against the type table
//!   3. `sourceConfigs` origins against the `source` list
//!   4. `sourceConfigs.static.default` validity
//!   5. `sourceConfigs.const.value` validity
//!   6. `sourceConfigs.designer.props` text keys (dataContext is
//!      intentionally unchecked)
//!   7. `sourceConfigs.static.defaultTextKey`
//!   8. `oneOf` options presence and option text keys
//!   9. `arrayOf`/`objectOf` recursion (text-key checks suppressed: only
//!      the outer value carries them)
//!  10. `shape` field recursion (text-key checks enabled)

use arbor_core::{
    describe_kind, is_builtin_kind, value_matches, CompositeKind, StringTable, TypeTable,
    ValueType,
};

use crate::error::ReferenceError;

/// Check every reference embedded in one value-type tree.
///
/// `path` names the position being checked (`'label'`, `'rows.[]'`,
/// `'[state].expanded'`) and flows into error messages. `with_text`
/// controls whether this position carries `textKey`/`descriptionTextKey`;
/// `ofType` element types do not.
pub fn check_value(
    path: &str,
    def: &ValueType,
    strings: &StringTable,
    types: &TypeTable,
    component: &str,
    with_text: bool,
) -> Result<(), ReferenceError> {
    if with_text {
        require_string(
            def.text_key.as_deref(),
            "textKey",
            &format!("textKey of prop '{path}'"),
            strings,
            component,
        )?;
        require_string(
            def.description_text_key.as_deref(),
            "descriptionTextKey",
            &format!("descriptionKey of prop '{path}'"),
            strings,
            component,
        )?;
    }

    if !is_builtin_kind(&def.kind) && !types.contains_key(&def.kind) {
        return Err(ReferenceError::UnknownKind {
            name: def.kind.clone(),
            at: format!("prop '{path}'"),
            component: component.to_string(),
        });
    }

    if let (Some(source), Some(configs)) = (&def.source, &def.source_configs) {
        for origin in configs.configured_origins() {
            if !source.iter().any(|s| s == origin) {
                return Err(ReferenceError::SourceConfigMismatch {
                    origin: origin.to_string(),
                    path: path.to_string(),
                    component: component.to_string(),
                });
            }
        }

        if let Some(default) = configs.static_.as_ref().and_then(|c| c.default.as_ref()) {
            if !value_matches(default, def, types) {
                return Err(ReferenceError::InvalidValue {
                    component: component.to_string(),
                    what: "default static value",
                    path: path.to_string(),
                    kind: describe_kind(def, types),
                });
            }
        }

        if let Some(value) = configs.const_.as_ref().and_then(|c| c.value.as_ref()) {
            if !value_matches(value, def, types) {
                return Err(ReferenceError::InvalidValue {
                    component: component.to_string(),
                    what: "const value",
                    path: path.to_string(),
                    kind: describe_kind(def, types),
                });
            }
        }

        if let Some(owner_props) = configs.designer.as_ref().and_then(|c| c.props.as_ref()) {
            for owner_prop in owner_props.values() {
                require_string(
                    owner_prop.text_key.as_deref(),
                    "textKey",
                    &format!("owner props list of prop '{path}'"),
                    strings,
                    component,
                )?;
                require_string(
                    owner_prop.description_text_key.as_deref(),
                    "descriptionTextKey",
                    &format!("owner props list of prop '{path}'"),
                    strings,
                    component,
                )?;
            }
        }

        if let Some(default_text_key) = configs
            .static_
            .as_ref()
            .and_then(|c| c.default_text_key.as_deref())
        {
            if !strings.contains_key(default_text_key) {
                return Err(ReferenceError::UnknownString {
                    key: default_text_key.to_string(),
                    at: format!("defaultTextKey of prop '{path}'"),
                    component: component.to_string(),
                });
            }
        }
    }

    match CompositeKind::parse(&def.kind) {
        Some(CompositeKind::OneOf) => {
            let Some(options) = &def.options else {
                return Err(missing_field(component, path, "oneOf", "options"));
            };
            for option in options {
                require_string(
                    option.text_key.as_deref(),
                    "textKey",
                    &format!("options list of prop '{path}'"),
                    strings,
                    component,
                )?;
            }
        }
        Some(CompositeKind::ArrayOf) => {
            let Some(of_type) = &def.of_type else {
                return Err(missing_field(component, path, "arrayOf", "ofType"));
            };
            check_value(&format!("{path}.[]"), of_type, strings, types, component, false)?;
        }
        Some(CompositeKind::ObjectOf) => {
            let Some(of_type) = &def.of_type else {
                return Err(missing_field(component, path, "objectOf", "ofType"));
            };
            check_value(&format!("{path}.{{}}"), of_type, strings, types, component, false)?;
        }
        Some(CompositeKind::Shape) => {
            let Some(fields) = &def.fields else {
                return Err(missing_field(component, path, "shape", "fields"));
            };
            for (field_name, field) in fields {
                check_value(
                    &format!("{path}.{field_name}"),
                    field,
                    strings,
                    types,
                    component,
                    true,
                )?;
            }
        }
        None => {}
    }

    Ok(())
}

/// Check one named-type dictionary entry.
///
/// Standalone entry point for external type dictionaries: the entry's own
/// kind IS the table key, so only its composite obligations and nested
/// references are checked. Nested positions recurse through
/// [`check_value`] with `[types].<name>` paths.
pub fn check_typedef(
    name: &str,
    def: &ValueType,
    strings: &StringTable,
    types: &TypeTable,
    component: &str,
) -> Result<(), ReferenceError> {
    match CompositeKind::parse(&def.kind) {
        Some(CompositeKind::OneOf) => {
            let Some(options) = &def.options else {
                return Err(missing_field(component, &format!("type '{name}'"), "oneOf", "options"));
            };
            for option in options {
                require_string(
                    option.text_key.as_deref(),
                    "textKey",
                    &format!("options list of type '{name}'"),
                    strings,
                    component,
                )?;
            }
            Ok(())
        }
        Some(CompositeKind::ArrayOf) => {
            let Some(of_type) = &def.of_type else {
                return Err(missing_field(component, &format!("type '{name}'"), "arrayOf", "ofType"));
            };
            check_value(&format!("[types].{name}.[]"), of_type, strings, types, component, true)
        }
        Some(CompositeKind::ObjectOf) => {
            let Some(of_type) = &def.of_type else {
                return Err(missing_field(component, &format!("type '{name}'"), "objectOf", "ofType"));
            };
            check_value(&format!("[types].{name}.{{}}"), of_type, strings, types, component, true)
        }
        Some(CompositeKind::Shape) => {
            let Some(fields) = &def.fields else {
                return Err(missing_field(component, &format!("type '{name}'"), "shape", "fields"));
            };
            for (field_name, field) in fields {
                check_value(
                    &format!("[types].{name}.{field_name}"),
                    field,
                    strings,
                    types,
                    component,
                    true,
                )?;
            }
            Ok(())
        }
        None => Ok(()),
    }
}

fn require_string(
    key: Option<&str>,
    field: &'static str,
    at: &str,
    strings: &StringTable,
    component: &str,
) -> Result<(), ReferenceError> {
    let Some(key) = key else {
        return Err(ReferenceError::MissingTextKey {
            field,
            at: at.to_string(),
            component: component.to_string(),
        });
    };
    if !strings.contains_key(key) {
        return Err(ReferenceError::UnknownString {
            key: key.to_string(),
            at: at.to_string(),
            component: component.to_string(),
        });
    }
    Ok(())
}

fn missing_field(
    component: &str,
    at: &str,
    kind: &str,
    field: &'static str,
) -> ReferenceError {
    ReferenceError::MissingKindField {
        component: component.to_string(),
        at: at.to_string(),
        kind: kind.to_string(),
        field,
    }
}
