//! # Component Metadata Assembler
//!
//! Reads one component's metadata marker directory, validates the
//! metadata structurally, resolves the sibling string and type
//! dictionaries (inline fields win over external files, external files
//! win over empty defaults), and reference-checks props, layouts, state
//! slots, and methods. Any failure aborts the component; no partial
//! record is ever returned.

use std::path::Path;

use arbor_core::{is_builtin_kind, ComponentKind, ComponentMeta, StringTable, TypeTable};
use arbor_schema::MetaSchemas;

use crate::error::{ConsistencyError, MetaError, ReferenceError};
use crate::fsio::read_json_file;
use crate::refcheck::{check_typedef, check_value};
use crate::{METADATA_FILE, METADATA_STRINGS_FILE, METADATA_TYPES_FILE};

/// Assemble one component from its metadata marker directory.
///
/// `meta_dir` is the marker directory itself (`<component>/.arbor`); the
/// caller has already confirmed it exists, so a missing metadata file is
/// fatal.
pub fn assemble_component(
    meta_dir: &Path,
    schemas: &MetaSchemas,
) -> Result<ComponentMeta, MetaError> {
    let meta_path = meta_dir.join(METADATA_FILE);
    let raw = read_json_file(&meta_path)?.ok_or(MetaError::MissingMetadata {
        path: meta_path.clone(),
    })?;

    schemas
        .validate_component(&raw)
        .map_err(|violations| MetaError::Structural {
            document: "component metadata",
            path: meta_path.clone(),
            violations,
        })?;

    // Field presence, not emptiness, decides whether the external
    // dictionaries are consulted: an inline empty table suppresses the
    // sibling file.
    let has_inline_strings = raw.get("strings").is_some();
    let has_inline_types = raw.get("types").is_some();

    let mut meta: ComponentMeta =
        serde_json::from_value(raw).map_err(|e| MetaError::Decode {
            document: "component metadata",
            path: meta_path,
            source: e,
        })?;

    if !has_inline_strings {
        if let Some(strings) = read_strings(meta_dir, schemas)? {
            meta.strings = strings;
        }
    }

    if !has_inline_types {
        if let Some(types) = read_typedefs(meta_dir, &meta.strings, &meta.display_name, schemas)? {
            meta.types = types;
        }
    }

    check_prop_groups(&meta)?;
    check_props(&meta)?;
    check_layouts(&meta)?;
    check_state(&meta)?;
    check_methods(&meta)?;

    tracing::debug!(
        component = %meta.display_name,
        props = meta.props.len(),
        "component metadata assembled"
    );

    Ok(meta)
}

/// Load and validate the sibling string dictionary, if present.
fn read_strings(
    meta_dir: &Path,
    schemas: &MetaSchemas,
) -> Result<Option<StringTable>, MetaError> {
    let path = meta_dir.join(METADATA_STRINGS_FILE);
    let Some(raw) = read_json_file(&path)? else {
        return Ok(None);
    };

    schemas
        .validate_strings(&raw)
        .map_err(|violations| MetaError::Structural {
            document: "strings",
            path: path.clone(),
            violations,
        })?;

    let table = serde_json::from_value(raw).map_err(|e| MetaError::Decode {
        document: "strings",
        path,
        source: e,
    })?;
    Ok(Some(table))
}

/// Load, validate, and reference-check the sibling type dictionary, if
/// present. Entries are checked against the dictionary itself so named
/// types may reference each other.
fn read_typedefs(
    meta_dir: &Path,
    strings: &StringTable,
    component: &str,
    schemas: &MetaSchemas,
) -> Result<Option<TypeTable>, MetaError> {
    let path = meta_dir.join(METADATA_TYPES_FILE);
    let Some(raw) = read_json_file(&path)? else {
        return Ok(None);
    };

    schemas
        .validate_types(&raw)
        .map_err(|violations| MetaError::Structural {
            document: "typedefs",
            path: path.clone(),
            violations,
        })?;

    let types: TypeTable = serde_json::from_value(raw).map_err(|e| MetaError::Decode {
        document: "typedefs",
        path,
        source: e,
    })?;

    for (name, def) in &types {
        check_typedef(name, def, strings, &types, component)?;
    }

    Ok(Some(types))
}

/// Every declared prop group's text key must resolve.
fn check_prop_groups(meta: &ComponentMeta) -> Result<(), MetaError> {
    for group in &meta.prop_groups {
        if !meta.strings.contains_key(&group.text_key) {
            return Err(ReferenceError::UnknownString {
                key: group.text_key.clone(),
                at: "prop groups list".to_string(),
                component: meta.display_name.clone(),
            }
            .into());
        }
    }
    Ok(())
}

/// Group membership plus the builtin/named dispatch for every prop.
fn check_props(meta: &ComponentMeta) -> Result<(), MetaError> {
    for (prop_name, prop) in &meta.props {
        if let Some(group) = &prop.group {
            let declared = meta.prop_groups.iter().any(|g| &g.name == group);
            if !declared {
                return Err(ConsistencyError::UnknownPropGroup {
                    group: group.clone(),
                    prop: prop_name.clone(),
                    component: meta.display_name.clone(),
                }
                .into());
            }
        }

        if is_builtin_kind(&prop.value.kind) {
            check_value(
                prop_name,
                &prop.value,
                &meta.strings,
                &meta.types,
                &meta.display_name,
                true,
            )?;
        } else if !meta.types.contains_key(&prop.value.kind) {
            return Err(ReferenceError::UnknownKind {
                name: prop.value.kind.clone(),
                at: format!("prop '{prop_name}'"),
                component: meta.display_name.clone(),
            }
            .into());
        }
    }
    Ok(())
}

/// Composite components must declare layouts; every layout and region
/// text key must resolve.
fn check_layouts(meta: &ComponentMeta) -> Result<(), MetaError> {
    if meta.kind != ComponentKind::Composite {
        return Ok(());
    }

    let Some(layouts) = &meta.layouts else {
        return Err(ConsistencyError::MissingLayouts {
            component: meta.display_name.clone(),
        }
        .into());
    };

    for layout in layouts {
        for key in [&layout.text_key, &layout.description_text_key]
            .into_iter()
            .flatten()
        {
            if !meta.strings.contains_key(key) {
                return Err(ReferenceError::UnknownString {
                    key: key.clone(),
                    at: "layouts".to_string(),
                    component: meta.display_name.clone(),
                }
                .into());
            }
        }

        for region in &layout.regions {
            for key in [&region.text_key, &region.description_text_key] {
                if !meta.strings.contains_key(key) {
                    return Err(ReferenceError::UnknownString {
                        key: key.clone(),
                        at: "layouts".to_string(),
                        component: meta.display_name.clone(),
                    }
                    .into());
                }
            }
        }
    }
    Ok(())
}

/// Text keys, value types, and initial-value prop references of every
/// state slot.
fn check_state(meta: &ComponentMeta) -> Result<(), MetaError> {
    for (slot_name, slot) in &meta.state {
        for (field, label, key) in [
            ("textKey", "text key", &slot.value.text_key),
            (
                "descriptionTextKey",
                "description text key",
                &slot.value.description_text_key,
            ),
        ] {
            let at = format!("{label} of state slot '{slot_name}'");
            let Some(key) = key else {
                return Err(ReferenceError::MissingTextKey {
                    field,
                    at,
                    component: meta.display_name.clone(),
                }
                .into());
            };
            if !meta.strings.contains_key(key) {
                return Err(ReferenceError::UnknownString {
                    key: key.clone(),
                    at,
                    component: meta.display_name.clone(),
                }
                .into());
            }
        }

        if is_builtin_kind(&slot.value.kind) {
            check_value(
                &format!("[state].{slot_name}"),
                &slot.value,
                &meta.strings,
                &meta.types,
                &meta.display_name,
                true,
            )?;
        } else if !meta.types.contains_key(&slot.value.kind) {
            return Err(ReferenceError::UnknownKind {
                name: slot.value.kind.clone(),
                at: format!("state slot '{slot_name}'"),
                component: meta.display_name.clone(),
            }
            .into());
        }

        if slot.initial_value.source == "prop" {
            let prop_name = slot
                .initial_value
                .source_data
                .as_ref()
                .and_then(|data| data.prop_name.as_deref());
            let Some(prop_name) = prop_name else {
                return Err(ConsistencyError::MissingInitialValueProp {
                    slot: slot_name.clone(),
                    component: meta.display_name.clone(),
                }
                .into());
            };
            if !meta.props.contains_key(prop_name) {
                return Err(ConsistencyError::UnknownInitialValueProp {
                    prop: prop_name.to_string(),
                    slot: slot_name.clone(),
                    component: meta.display_name.clone(),
                }
                .into());
            }
        }
    }
    Ok(())
}

/// Text keys and per-argument checks of every method.
fn check_methods(meta: &ComponentMeta) -> Result<(), MetaError> {
    for (method_name, method) in &meta.methods {
        for (key, what) in [
            (&method.text_key, "text key"),
            (&method.description_text_key, "description text key"),
        ] {
            if !meta.strings.contains_key(key) {
                return Err(ReferenceError::UnknownString {
                    key: key.clone(),
                    at: format!("{what} of method '{method_name}'"),
                    component: meta.display_name.clone(),
                }
                .into());
            }
        }

        for (idx, arg) in method.args.iter().enumerate() {
            for (field, label, key) in [
                ("textKey", "text key", &arg.value.text_key),
                (
                    "descriptionTextKey",
                    "description text key",
                    &arg.value.description_text_key,
                ),
            ] {
                let at = format!("{label} of argument {idx} in method '{method_name}'");
                let Some(key) = key else {
                    return Err(ReferenceError::MissingTextKey {
                        field,
                        at,
                        component: meta.display_name.clone(),
                    }
                    .into());
                };
                if !meta.strings.contains_key(key) {
                    return Err(ReferenceError::UnknownString {
                        key: key.clone(),
                        at,
                        component: meta.display_name.clone(),
                    }
                    .into());
                }
            }

            if is_builtin_kind(&arg.value.kind) {
                check_value(
                    &format!("[methods].{method_name}.[arg{idx}]"),
                    &arg.value,
                    &meta.strings,
                    &meta.types,
                    &meta.display_name,
                    true,
                )?;
            } else if !meta.types.contains_key(&arg.value.kind) {
                return Err(ReferenceError::UnknownKind {
                    name: arg.value.kind.clone(),
                    at: format!("argument {idx} in method '{method_name}'"),
                    component: meta.display_name.clone(),
                }
                .into());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_schema::SchemaProfile;
    use serde_json::{json, Value};
    use std::path::PathBuf;

    fn schemas() -> MetaSchemas {
        MetaSchemas::new(SchemaProfile::current())
    }

    /// Write a marker directory with the given documents and return its
    /// path alongside the tempdir guard.
    fn marker_dir(
        meta: &Value,
        types: Option<&Value>,
        strings: Option<&Value>,
    ) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join(".arbor");
        std::fs::create_dir(&marker).unwrap();
        std::fs::write(
            marker.join("meta.json"),
            serde_json::to_vec_pretty(meta).unwrap(),
        )
        .unwrap();
        if let Some(types) = types {
            std::fs::write(
                marker.join("types.json"),
                serde_json::to_vec_pretty(types).unwrap(),
            )
            .unwrap();
        }
        if let Some(strings) = strings {
            std::fs::write(
                marker.join("strings.json"),
                serde_json::to_vec_pretty(strings).unwrap(),
            )
            .unwrap();
        }
        (dir, marker)
    }

    fn base_meta() -> Value {
        json!({
            "displayName": "Button",
            "textKey": "button",
            "descriptionTextKey": "button_desc",
            "kind": "atomic",
            "strings": {
                "button": { "en": "Button" },
                "button_desc": { "en": "A button" }
            }
        })
    }

    #[test]
    fn minimal_component_assembles_with_empty_defaults() {
        let (_guard, marker) = marker_dir(&base_meta(), None, None);
        let meta = assemble_component(&marker, &schemas()).unwrap();
        assert_eq!(meta.display_name, "Button");
        assert!(meta.props.is_empty());
        assert!(meta.types.is_empty());
    }

    #[test]
    fn missing_metadata_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join(".arbor");
        std::fs::create_dir(&marker).unwrap();
        let err = assemble_component(&marker, &schemas()).unwrap_err();
        assert!(matches!(err, MetaError::MissingMetadata { .. }));
    }

    #[test]
    fn malformed_metadata_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join(".arbor");
        std::fs::create_dir(&marker).unwrap();
        std::fs::write(marker.join("meta.json"), b"{ nope").unwrap();
        let err = assemble_component(&marker, &schemas()).unwrap_err();
        assert!(err.to_string().contains("meta.json"));
        assert!(matches!(err, MetaError::MalformedJson { .. }));
    }

    #[test]
    fn structural_failure_reports_all_violations() {
        let (_guard, marker) = marker_dir(&json!({"kind": "bogus"}), None, None);
        let err = assemble_component(&marker, &schemas()).unwrap_err();
        match err {
            MetaError::Structural { violations, .. } => {
                assert!(violations.len() >= 3, "expected batched violations");
            }
            other => panic!("expected Structural, got: {other}"),
        }
    }

    #[test]
    fn external_strings_file_is_loaded_when_inline_absent() {
        let mut meta = base_meta();
        meta.as_object_mut().unwrap().remove("strings");
        meta["props"] = json!({
            "label": { "kind": "string", "textKey": "label", "descriptionTextKey": "label_desc" }
        });
        let strings = json!({
            "label": { "en": "Label" },
            "label_desc": { "en": "The label" }
        });
        let (_guard, marker) = marker_dir(&meta, None, Some(&strings));
        let assembled = assemble_component(&marker, &schemas()).unwrap();
        assert!(assembled.strings.contains_key("label"));
    }

    #[test]
    fn inline_empty_strings_suppress_the_external_file() {
        let mut meta = base_meta();
        meta["strings"] = json!({});
        meta["textKey"] = json!("button");
        // The external file would resolve the keys, but the inline empty
        // table wins, so prop checking must fail.
        meta["props"] = json!({
            "label": { "kind": "string", "textKey": "label", "descriptionTextKey": "label_desc" }
        });
        let strings = json!({
            "label": { "en": "Label" },
            "label_desc": { "en": "The label" }
        });
        let (_guard, marker) = marker_dir(&meta, None, Some(&strings));
        let err = assemble_component(&marker, &schemas()).unwrap_err();
        assert!(matches!(err, MetaError::Reference(ReferenceError::UnknownString { .. })));
    }

    #[test]
    fn external_types_are_validated_and_reference_checked() {
        let mut meta = base_meta();
        meta.as_object_mut().unwrap().remove("strings");
        meta["props"] = json!({
            "size": { "kind": "Size", "textKey": "size", "descriptionTextKey": "size_desc" }
        });
        let types = json!({
            "Size": {
                "kind": "oneOf",
                "options": [
                    { "value": "s", "textKey": "size_s" },
                    { "value": "m", "textKey": "size_m" }
                ]
            }
        });
        let strings = json!({
            "size": { "en": "Size" },
            "size_desc": { "en": "The size" },
            "size_s": { "en": "Small" },
            "size_m": { "en": "Medium" }
        });
        let (_guard, marker) = marker_dir(&meta, Some(&types), Some(&strings));
        let assembled = assemble_component(&marker, &schemas()).unwrap();
        assert!(assembled.types.contains_key("Size"));
    }

    #[test]
    fn external_types_with_unresolved_option_key_fail() {
        let mut meta = base_meta();
        meta.as_object_mut().unwrap().remove("strings");
        let types = json!({
            "Size": {
                "kind": "oneOf",
                "options": [{ "value": "s", "textKey": "size_s" }]
            }
        });
        let strings = json!({});
        let (_guard, marker) = marker_dir(&meta, Some(&types), Some(&strings));
        let err = assemble_component(&marker, &schemas()).unwrap_err();
        assert!(
            matches!(err, MetaError::Reference(ReferenceError::UnknownString { ref key, .. }) if key == "size_s")
        );
    }

    #[test]
    fn prop_with_unknown_group_fails() {
        let mut meta = base_meta();
        meta["props"] = json!({
            "label": {
                "kind": "string",
                "textKey": "button",
                "descriptionTextKey": "button_desc",
                "group": "display"
            }
        });
        let (_guard, marker) = marker_dir(&meta, None, None);
        let err = assemble_component(&marker, &schemas()).unwrap_err();
        assert!(
            matches!(err, MetaError::Consistency(ConsistencyError::UnknownPropGroup { ref group, .. }) if group == "display")
        );
    }

    #[test]
    fn prop_group_with_declared_group_passes() {
        let mut meta = base_meta();
        meta["strings"]["group_display"] = json!({ "en": "Display" });
        meta["propGroups"] = json!([{ "name": "display", "textKey": "group_display" }]);
        meta["props"] = json!({
            "label": {
                "kind": "string",
                "textKey": "button",
                "descriptionTextKey": "button_desc",
                "group": "display"
            }
        });
        let (_guard, marker) = marker_dir(&meta, None, None);
        assemble_component(&marker, &schemas()).unwrap();
    }

    #[test]
    fn prop_group_text_key_must_resolve() {
        let mut meta = base_meta();
        meta["propGroups"] = json!([{ "name": "display", "textKey": "group_display" }]);
        let (_guard, marker) = marker_dir(&meta, None, None);
        let err = assemble_component(&marker, &schemas()).unwrap_err();
        assert!(
            matches!(err, MetaError::Reference(ReferenceError::UnknownString { ref at, .. }) if at == "prop groups list")
        );
    }

    #[test]
    fn prop_with_unknown_named_kind_fails() {
        let mut meta = base_meta();
        meta["props"] = json!({
            "size": { "kind": "Size", "textKey": "button", "descriptionTextKey": "button_desc" }
        });
        let (_guard, marker) = marker_dir(&meta, None, None);
        let err = assemble_component(&marker, &schemas()).unwrap_err();
        assert!(
            matches!(err, MetaError::Reference(ReferenceError::UnknownKind { ref name, .. }) if name == "Size")
        );
    }

    #[test]
    fn composite_without_layouts_fails() {
        let mut meta = base_meta();
        meta["kind"] = json!("composite");
        let (_guard, marker) = marker_dir(&meta, None, None);
        let err = assemble_component(&marker, &schemas()).unwrap_err();
        assert!(
            matches!(err, MetaError::Consistency(ConsistencyError::MissingLayouts { ref component }) if component == "Button")
        );
    }

    #[test]
    fn composite_with_resolvable_layout_assembles() {
        let mut meta = base_meta();
        meta["kind"] = json!("composite");
        for key in ["layout_main", "layout_main_desc", "region_header", "region_header_desc"] {
            meta["strings"][key] = json!({ "en": key });
        }
        meta["layouts"] = json!([{
            "textKey": "layout_main",
            "descriptionTextKey": "layout_main_desc",
            "regions": [{
                "textKey": "region_header",
                "descriptionTextKey": "region_header_desc",
                "component": "Header",
                "defaultEnabled": true
            }]
        }]);
        let (_guard, marker) = marker_dir(&meta, None, None);
        assemble_component(&marker, &schemas()).unwrap();
    }

    #[test]
    fn composite_with_unresolved_region_key_fails() {
        let mut meta = base_meta();
        meta["kind"] = json!("composite");
        meta["strings"]["layout_main"] = json!({ "en": "Main" });
        meta["strings"]["layout_main_desc"] = json!({ "en": "Main layout" });
        meta["layouts"] = json!([{
            "textKey": "layout_main",
            "descriptionTextKey": "layout_main_desc",
            "regions": [{
                "textKey": "region_header",
                "descriptionTextKey": "region_header_desc",
                "component": "Header",
                "defaultEnabled": true
            }]
        }]);
        let (_guard, marker) = marker_dir(&meta, None, None);
        let err = assemble_component(&marker, &schemas()).unwrap_err();
        assert!(
            matches!(err, MetaError::Reference(ReferenceError::UnknownString { ref at, .. }) if at == "layouts")
        );
    }

    fn stateful_meta(prop_name: &str) -> Value {
        let mut meta = base_meta();
        meta["strings"]["open"] = json!({ "en": "Open" });
        meta["strings"]["open_desc"] = json!({ "en": "Open state" });
        meta["props"] = json!({
            "open": { "kind": "bool", "textKey": "open", "descriptionTextKey": "open_desc" }
        });
        meta["state"] = json!({
            "expanded": {
                "kind": "bool",
                "textKey": "open",
                "descriptionTextKey": "open_desc",
                "initialValue": { "source": "prop", "sourceData": { "propName": prop_name } }
            }
        });
        meta
    }

    #[test]
    fn state_slot_mirroring_declared_prop_assembles() {
        let (_guard, marker) = marker_dir(&stateful_meta("open"), None, None);
        assemble_component(&marker, &schemas()).unwrap();
    }

    #[test]
    fn state_slot_mirroring_unknown_prop_fails() {
        let (_guard, marker) = marker_dir(&stateful_meta("missing"), None, None);
        let err = assemble_component(&marker, &schemas()).unwrap_err();
        assert!(
            matches!(err, MetaError::Consistency(ConsistencyError::UnknownInitialValueProp { ref prop, .. }) if prop == "missing")
        );
    }

    #[test]
    fn state_slot_with_unresolved_text_key_fails() {
        let mut meta = base_meta();
        meta["state"] = json!({
            "expanded": {
                "kind": "bool",
                "textKey": "nope",
                "descriptionTextKey": "nope_desc",
                "initialValue": { "source": "const", "sourceData": { "value": false } }
            }
        });
        let (_guard, marker) = marker_dir(&meta, None, None);
        let err = assemble_component(&marker, &schemas()).unwrap_err();
        assert!(
            matches!(err, MetaError::Reference(ReferenceError::UnknownString { ref key, .. }) if key == "nope")
        );
    }

    #[test]
    fn method_argument_keys_are_checked_by_position() {
        let mut meta = base_meta();
        meta["strings"]["toggle"] = json!({ "en": "Toggle" });
        meta["strings"]["toggle_desc"] = json!({ "en": "Toggle it" });
        meta["strings"]["force"] = json!({ "en": "Force" });
        meta["methods"] = json!({
            "toggle": {
                "textKey": "toggle",
                "descriptionTextKey": "toggle_desc",
                "args": [{
                    "kind": "bool",
                    "textKey": "force",
                    "descriptionTextKey": "force_desc",
                    "required": false
                }]
            }
        });
        let (_guard, marker) = marker_dir(&meta, None, None);
        let err = assemble_component(&marker, &schemas()).unwrap_err();
        match err {
            MetaError::Reference(ReferenceError::UnknownString { key, at, .. }) => {
                assert_eq!(key, "force_desc");
                assert!(at.contains("argument 0"), "at was: {at}");
            }
            other => panic!("expected UnknownString, got: {other}"),
        }
    }

    #[test]
    fn method_with_resolvable_keys_assembles() {
        let mut meta = base_meta();
        for key in ["toggle", "toggle_desc", "force", "force_desc"] {
            meta["strings"][key] = json!({ "en": key });
        }
        meta["methods"] = json!({
            "toggle": {
                "textKey": "toggle",
                "descriptionTextKey": "toggle_desc",
                "args": [{
                    "kind": "bool",
                    "textKey": "force",
                    "descriptionTextKey": "force_desc",
                    "required": true
                }]
            }
        });
        let (_guard, marker) = marker_dir(&meta, None, None);
        let assembled = assemble_component(&marker, &schemas()).unwrap();
        assert_eq!(assembled.methods["toggle"].args.len(), 1);
    }
}
