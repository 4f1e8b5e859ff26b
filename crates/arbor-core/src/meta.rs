//! # Metadata Records
//!
//! Typed representations of the arbor metadata documents: recursive value
//! types, prop/state/method definitions, component records, and the
//! library record.
//!
//! These types are only ever deserialized from documents that already
//! passed structural validation, so required-by-schema fields that are
//! optional here (e.g. `textKey` on a nested value type) encode genuine
//! schema optionality at that position, not tolerance for malformed input.
//!
//! All maps use `BTreeMap` so that serialization and iteration order are
//! deterministic for a given document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// String table: string key → locale → translated text.
pub type StringTable = BTreeMap<String, BTreeMap<String, String>>;

/// Type table: named-type name → value-type definition.
pub type TypeTable = BTreeMap<String, ValueType>;

/// A recursive value-type definition.
///
/// Describes the shape of one value: a prop, a state slot, a method
/// argument, a named type, or a nested field/element type. Nests to
/// arbitrary depth through `ofType` and `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueType {
    /// Builtin kind name or named-type reference.
    pub kind: String,

    /// When true, the value may not be null (and a shape field may not be
    /// omitted).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_null: Option<bool>,

    /// Element type; present exactly when `kind` is `arrayOf`/`objectOf`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub of_type: Option<Box<ValueType>>,

    /// Field types; present exactly when `kind` is `shape`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, ValueType>>,

    /// Enumeration options; present (non-empty) exactly when `kind` is
    /// `oneOf`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<KindOption>>,

    /// Key of the display-name string. Required on props, shape fields,
    /// and state slots; absent on `ofType` element types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_key: Option<String>,

    /// Key of the description string. Same presence rules as `textKey`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_text_key: Option<String>,

    /// Allowed value-provenance origins (current schema generation only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Vec<String>>,

    /// Per-origin configuration (current schema generation only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_configs: Option<SourceConfigs>,
}

/// One `oneOf` enumeration option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KindOption {
    /// The literal value of this option.
    pub value: Value,
    /// Key of the option's display-name string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_key: Option<String>,
}

/// Per-origin value-provenance configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceConfigs {
    /// Configuration for statically authored values.
    #[serde(rename = "static", default, skip_serializing_if = "Option::is_none")]
    pub static_: Option<StaticConfig>,

    /// Configuration for data-bound values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<DataConfig>,

    /// Configuration for constant values.
    #[serde(rename = "const", default, skip_serializing_if = "Option::is_none")]
    pub const_: Option<ConstConfig>,

    /// Configuration for designer-authored component values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designer: Option<DesignerConfig>,

    /// Configuration for action values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<ActionsConfig>,

    /// Configuration for state-bound values (no options yet).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<Value>,
}

impl SourceConfigs {
    /// The origins configured here, in fixed declaration order.
    pub fn configured_origins(&self) -> Vec<&'static str> {
        let mut origins = Vec::new();
        if self.static_.is_some() {
            origins.push("static");
        }
        if self.data.is_some() {
            origins.push("data");
        }
        if self.const_.is_some() {
            origins.push("const");
        }
        if self.designer.is_some() {
            origins.push("designer");
        }
        if self.actions.is_some() {
            origins.push("actions");
        }
        if self.state.is_some() {
            origins.push("state");
        }
        origins
    }
}

/// `sourceConfigs.static` — statically authored values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticConfig {
    /// Default value; must type-check against the declaring definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// String key of the default value (string kinds only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_text_key: Option<String>,
    /// Default item count (arrayOf kinds only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_num: Option<i64>,
    /// Minimum item count (arrayOf kinds only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<i64>,
    /// Maximum item count (arrayOf kinds only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<i64>,
}

/// `sourceConfigs.data` — data-bound values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataConfig {
    /// Name of the data context this value pushes for its children.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push_data_context: Option<String>,
}

/// `sourceConfigs.const` — constant values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstConfig {
    /// Constant value; must type-check against the declaring definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Identifier of a built-in constant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub const_id: Option<String>,
}

/// `sourceConfigs.designer` — designer-authored component values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignerConfig {
    /// Wrapper component name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrapper: Option<String>,
    /// Layout index for a composite wrapper component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrapper_layout: Option<i64>,
    /// Props exposed to the owner component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<BTreeMap<String, DesignerPropDef>>,
}

/// One owner-prop description under `sourceConfigs.designer.props`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignerPropDef {
    /// Key of the owner prop's display-name string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_key: Option<String>,
    /// Key of the owner prop's description string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_text_key: Option<String>,
    /// Data context the owner prop reads from. Intentionally unvalidated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_context: Option<String>,
    /// Kind name of the owner prop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// `sourceConfigs.actions` — action values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionsConfig {
    /// Ordered action arguments.
    #[serde(default)]
    pub args: Vec<ValueType>,
    /// State slots updated when the action fires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_state: Option<BTreeMap<String, StateUpdate>>,
}

/// One state update performed by an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateUpdate {
    /// Where the new value comes from: `const` or `arg`.
    pub source: String,
    /// Origin-specific payload.
    pub source_data: StateUpdateData,
}

/// Payload of a [`StateUpdate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateUpdateData {
    /// Constant value (`source = const`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Argument index (`source = arg`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arg: Option<i64>,
    /// Path into the argument value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Value>>,
}

/// A component prop: a value type plus prop-level attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropDef {
    /// The prop's value type, with its text keys and source configuration.
    #[serde(flatten)]
    pub value: ValueType,
    /// Prop group this prop belongs to; must name a declared group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

/// A declared prop group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropGroup {
    /// Group identifier referenced by props.
    pub name: String,
    /// Key of the group's display-name string.
    pub text_key: String,
}

/// A component state slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSlot {
    /// The slot's value type.
    #[serde(flatten)]
    pub value: ValueType,
    /// How the slot is initialized.
    pub initial_value: InitialValue,
}

/// Initial value of a state slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialValue {
    /// Where the initial value comes from: `const` or `prop`.
    pub source: String,
    /// Origin-specific payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_data: Option<InitialValueData>,
}

/// Payload of an [`InitialValue`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialValueData {
    /// Constant initial value (`source = const`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Name of the prop mirrored into the slot (`source = prop`); must
    /// name an existing prop on the same component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prop_name: Option<String>,
}

/// A component method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDef {
    /// Key of the method's display-name string.
    pub text_key: String,
    /// Key of the method's description string.
    pub description_text_key: String,
    /// Ordered method arguments.
    pub args: Vec<MethodArg>,
}

/// One method argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodArg {
    /// The argument's value type.
    #[serde(flatten)]
    pub value: ValueType,
    /// Whether the argument must be supplied.
    pub required: bool,
}

/// A composite-component layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    /// Key of the layout's display-name string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_key: Option<String>,
    /// Key of the layout's description string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_text_key: Option<String>,
    /// Icon file name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Regions of this layout, in display order.
    pub regions: Vec<Region>,
}

/// One region of a composite layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    /// Key of the region's display-name string.
    pub text_key: String,
    /// Key of the region's description string.
    pub description_text_key: String,
    /// Child component filling the region (name without namespace).
    pub component: String,
    /// Whether the region is enabled by default.
    pub default_enabled: bool,
    /// Prop values applied to the region's component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<Value>,
}

/// Placement rules restricting where a component may appear.
///
/// Validated structurally only; the referenced components, groups, and
/// tags are not cross-checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    /// Rules for containers this component may be placed inside.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inside: Option<PlacementRules>,
    /// Rules for siblings this component may follow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<PlacementRules>,
    /// Rules for siblings this component may precede.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<PlacementRules>,
}

/// Include/exclude lists of one placement rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRules {
    /// Positions where placement is allowed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<PlacementRef>>,
    /// Positions where placement is forbidden.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<PlacementRef>>,
}

/// One entry of a placement include/exclude list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRef {
    /// Matches every position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all: Option<bool>,
    /// Matches a component by name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    /// Matches every component of a group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Matches every component carrying a tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Maximum number of instances at the matched position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_num: Option<f64>,
}

/// What a component fundamentally is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    /// A leaf component without children.
    Atomic,
    /// A component accepting arbitrary children.
    Container,
    /// A component built from predefined layouts of named regions.
    Composite,
}

/// One normalized component record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentMeta {
    /// Unique component name; the key in the library's component map.
    pub display_name: String,
    /// Key of the component's display-name string.
    pub text_key: String,
    /// Key of the component's description string.
    pub description_text_key: String,
    /// What the component fundamentally is.
    pub kind: ComponentKind,
    /// Component group id; must name a declared library group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Component tags. Unique; library-level tag sections may append more
    /// during assembly, duplicates collapsing on insert.
    #[serde(default)]
    pub tags: Vec<String>,
    /// When true, the component is hidden from the library palette.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    /// Icon file name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Prop definitions by prop name.
    #[serde(default)]
    pub props: BTreeMap<String, PropDef>,
    /// Declared prop groups, in display order.
    #[serde(default)]
    pub prop_groups: Vec<PropGroup>,
    /// State slots by slot name.
    #[serde(default)]
    pub state: BTreeMap<String, StateSlot>,
    /// Methods by method name.
    #[serde(default)]
    pub methods: BTreeMap<String, MethodDef>,
    /// Component-local named types. Inline here or loaded from the
    /// sibling types file during assembly.
    #[serde(default)]
    pub types: TypeTable,
    /// Component-local string table. Inline here or loaded from the
    /// sibling strings file during assembly.
    #[serde(default)]
    pub strings: StringTable,
    /// Layouts; required exactly when `kind` is `composite`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layouts: Option<Vec<Layout>>,
    /// Placement restrictions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<Placement>,
}

impl ComponentMeta {
    /// Append a tag unless the component already carries it.
    pub fn add_tag(&mut self, tag: &str) {
        if !self.tags.iter().any(|t| t == tag) {
            self.tags.push(tag.to_string());
        }
    }
}

/// One component group declared by the library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentGroup {
    /// Key of the group's display-name string.
    pub text_key: String,
    /// Key of the group's description string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_text_key: Option<String>,
}

/// The merged library record produced by assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryMeta {
    /// Library namespace, prefixed to component names by consumers.
    pub namespace: String,
    /// Whether the library ships a global stylesheet.
    pub global_style: bool,
    /// Styles applied to the preview container; only allowed when
    /// `globalStyle` is true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_style: Option<BTreeMap<String, String>>,
    /// Build-tool loader configuration by file extension.
    #[serde(default)]
    pub loaders: BTreeMap<String, Vec<Value>>,
    /// Module specifiers to import alongside the library.
    #[serde(default)]
    pub import: Vec<String>,
    /// Declared component groups by group id.
    #[serde(default)]
    pub component_groups: BTreeMap<String, ComponentGroup>,
    /// Components by display name. Inline in the main metadata or
    /// discovered by the directory walk.
    #[serde(default)]
    pub components: BTreeMap<String, ComponentMeta>,
    /// Library-level string table.
    #[serde(default)]
    pub strings: StringTable,
    /// Tag sections: tag → component names carrying it.
    #[serde(default)]
    pub tags: BTreeMap<String, Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn value_type_deserializes_recursively() {
        let def: ValueType = serde_json::from_value(json!({
            "kind": "arrayOf",
            "ofType": {
                "kind": "shape",
                "fields": {
                    "x": { "kind": "int", "textKey": "x", "descriptionTextKey": "x_desc" }
                }
            }
        }))
        .unwrap();
        assert_eq!(def.kind, "arrayOf");
        let of_type = def.of_type.unwrap();
        assert_eq!(of_type.kind, "shape");
        let fields = of_type.fields.unwrap();
        assert_eq!(fields["x"].kind, "int");
        assert_eq!(fields["x"].text_key.as_deref(), Some("x"));
    }

    #[test]
    fn prop_def_flattens_value_type() {
        let prop: PropDef = serde_json::from_value(json!({
            "kind": "string",
            "textKey": "label",
            "descriptionTextKey": "label_desc",
            "group": "display",
            "source": ["static"],
            "sourceConfigs": { "static": { "default": "hello" } }
        }))
        .unwrap();
        assert_eq!(prop.value.kind, "string");
        assert_eq!(prop.group.as_deref(), Some("display"));
        let static_ = prop.value.source_configs.unwrap().static_.unwrap();
        assert_eq!(static_.default, Some(json!("hello")));
    }

    #[test]
    fn source_configs_reports_configured_origins_in_order() {
        let configs: SourceConfigs = serde_json::from_value(json!({
            "state": {},
            "const": { "value": 1 },
            "static": { "default": 2 }
        }))
        .unwrap();
        assert_eq!(configs.configured_origins(), vec!["static", "const", "state"]);
    }

    #[test]
    fn component_meta_defaults_containers() {
        let meta: ComponentMeta = serde_json::from_value(json!({
            "displayName": "Button",
            "textKey": "button",
            "descriptionTextKey": "button_desc",
            "kind": "atomic"
        }))
        .unwrap();
        assert!(meta.props.is_empty());
        assert!(meta.prop_groups.is_empty());
        assert!(meta.state.is_empty());
        assert!(meta.methods.is_empty());
        assert!(meta.types.is_empty());
        assert!(meta.strings.is_empty());
        assert!(meta.layouts.is_none());
    }

    #[test]
    fn add_tag_collapses_duplicates() {
        let mut meta: ComponentMeta = serde_json::from_value(json!({
            "displayName": "Button",
            "textKey": "button",
            "descriptionTextKey": "button_desc",
            "kind": "atomic",
            "tags": ["form"]
        }))
        .unwrap();
        meta.add_tag("featured");
        meta.add_tag("form");
        meta.add_tag("featured");
        assert_eq!(meta.tags, vec!["form", "featured"]);
    }

    #[test]
    fn component_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(ComponentKind::Composite).unwrap(),
            json!("composite")
        );
        let kind: ComponentKind = serde_json::from_value(json!("container")).unwrap();
        assert_eq!(kind, ComponentKind::Container);
    }

    #[test]
    fn library_meta_round_trips() {
        let doc = json!({
            "namespace": "acme",
            "globalStyle": true,
            "containerStyle": { "backgroundColor": "#fff" },
            "import": ["acme-styles"],
            "componentGroups": {
                "inputs": { "textKey": "group_inputs" }
            },
            "tags": { "featured": ["Button"] }
        });
        let lib: LibraryMeta = serde_json::from_value(doc).unwrap();
        assert_eq!(lib.namespace, "acme");
        assert!(lib.global_style);
        assert_eq!(lib.tags["featured"], vec!["Button"]);
        let back = serde_json::to_value(&lib).unwrap();
        let again: LibraryMeta = serde_json::from_value(back).unwrap();
        assert_eq!(lib, again);
    }
}
