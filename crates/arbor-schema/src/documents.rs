//! # Document Schemas
//!
//! The concrete shapes of the four arbor metadata documents: component
//! metadata, the named-type dictionary, the string dictionary, and the
//! library main metadata.
//!
//! ## Recursive Tie-Back
//!
//! The value-type grammar embeds itself: `ofType` points back at the full
//! value shape and `fields` at its text-carrying variant. Both are
//! expressed as registry references (`"value"`, `"valueWithText"`), so
//! one construction function covers every nesting depth.
//!
//! ## Schema Generations
//!
//! Two generations of the component document exist: the current layout,
//! where prop definitions carry `source`/`sourceConfigs` and components
//! may declare `state`/`methods`, and the legacy layout without them.
//! Both are produced by the same constructors from a [`SchemaProfile`];
//! the differences are two booleans, not two schemas.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::shape::{JsonType, Shape, ShapeRegistry};
use crate::validate::{validate, ValidateOptions, Violations};

/// Value-provenance origins a prop may declare.
const VALUE_SOURCES: &[&str] = &["static", "data", "const", "designer", "actions", "state"];
/// The component kinds.
const COMPONENT_KINDS: &[&str] = &["atomic", "container", "composite"];
/// Origins of an action state update.
const UPDATE_SOURCES: &[&str] = &["const", "arg"];
/// Origins of a state slot's initial value.
const INITIAL_SOURCES: &[&str] = &["const", "prop"];

/// Which generation of the component-metadata layout to validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaProfile {
    /// Prop definitions carry `source`/`sourceConfigs`.
    pub value_sources: bool,
    /// Components may declare `state` and `methods`.
    pub stateful: bool,
}

impl SchemaProfile {
    /// The current layout: value provenance plus state and methods.
    pub fn current() -> Self {
        Self {
            value_sources: true,
            stateful: true,
        }
    }

    /// The legacy layout: plain value types only.
    pub fn legacy() -> Self {
        Self {
            value_sources: false,
            stateful: false,
        }
    }
}

impl Default for SchemaProfile {
    fn default() -> Self {
        Self::current()
    }
}

/// Compiled document schemas for one [`SchemaProfile`].
///
/// Construction registers every named shape once; validation runs are
/// pure lookups over the shared registry, so one instance can serve any
/// number of documents.
#[derive(Debug)]
pub struct MetaSchemas {
    registry: ShapeRegistry,
    profile: SchemaProfile,
}

impl MetaSchemas {
    /// Build the schemas for one generation profile.
    pub fn new(profile: SchemaProfile) -> Self {
        let mut registry = ShapeRegistry::new();
        registry.register("typedef", typedef_shape(false));
        registry.register("typedefWithText", typedef_shape(true));
        registry.register("value", value_shape(profile, false));
        registry.register("valueWithText", value_shape(profile, true));
        registry.register("component", component_shape(profile));
        registry.register("types", types_document_shape());
        registry.register("strings", strings_document_shape());
        registry.register("main", main_document_shape());
        Self { registry, profile }
    }

    /// The profile these schemas were built for.
    pub fn profile(&self) -> SchemaProfile {
        self.profile
    }

    /// Validate a component-metadata document. The component document is
    /// closed: unknown properties anywhere in it are violations.
    pub fn validate_component(&self, doc: &Value) -> Result<(), Violations> {
        self.run(doc, "component", true)
    }

    /// Validate a named-type dictionary document.
    pub fn validate_types(&self, doc: &Value) -> Result<(), Violations> {
        self.run(doc, "types", false)
    }

    /// Validate a string dictionary document.
    pub fn validate_strings(&self, doc: &Value) -> Result<(), Violations> {
        self.run(doc, "strings", false)
    }

    /// Validate a library main-metadata document.
    pub fn validate_main(&self, doc: &Value) -> Result<(), Violations> {
        self.run(doc, "main", false)
    }

    fn run(&self, doc: &Value, name: &'static str, forbid_additional: bool) -> Result<(), Violations> {
        validate(
            doc,
            &Shape::reference(name),
            &self.registry,
            &ValidateOptions { forbid_additional },
        )
    }
}

/// `textKey` + `descriptionTextKey`, both required and non-empty.
fn text_and_desc() -> BTreeMap<&'static str, Shape> {
    BTreeMap::from([
        ("textKey", Shape::string().non_empty().required()),
        (
            "descriptionTextKey",
            Shape::string().non_empty().required(),
        ),
    ])
}

/// The recursive core shared by every value-type shape: `kind`,
/// `notNull`, `ofType`, `fields`, `options`.
///
/// `of_type_ref`/`field_ref` name the registry shapes the recursion
/// points at; `option_text` adds the required option `textKey` the value
/// variants carry.
fn typedef_properties(
    of_type_ref: &'static str,
    field_ref: &'static str,
    option_text: bool,
) -> BTreeMap<&'static str, Shape> {
    let mut option = Shape::object().prop("value", Shape::any().required());
    if option_text {
        option = option.prop("textKey", Shape::string().non_empty().required());
    }

    BTreeMap::from([
        ("kind", Shape::string().non_empty().required()),
        ("notNull", Shape::boolean()),
        ("ofType", Shape::reference(of_type_ref)),
        (
            "fields",
            Shape::object().entries(Shape::reference(field_ref)),
        ),
        ("options", Shape::array().min_items(1).items(option)),
    ])
}

/// `source` + `sourceConfigs` (current generation only).
fn source_properties() -> BTreeMap<&'static str, Shape> {
    let static_config = Shape::object()
        .prop("default", Shape::any())
        .prop("defaultTextKey", Shape::string())
        .prop("defaultNum", Shape::integer())
        .prop("minItems", Shape::integer())
        .prop("maxItems", Shape::integer());

    let data_config = Shape::object().prop("pushDataContext", Shape::string().non_empty());

    let const_config = Shape::object()
        .prop("value", Shape::any())
        .prop("constId", Shape::string());

    let designer_prop = Shape::object()
        .props(text_and_desc())
        .prop("dataContext", Shape::string().non_empty())
        .prop("kind", Shape::string().non_empty());
    let designer_config = Shape::object()
        .prop("wrapper", Shape::string())
        .prop("wrapperLayout", Shape::integer().minimum(0))
        .prop("props", Shape::object().entries(designer_prop));

    let state_update = Shape::object()
        .prop(
            "source",
            Shape::string().enumeration(UPDATE_SOURCES).required(),
        )
        .prop(
            "sourceData",
            Shape::object()
                .prop("value", Shape::any())
                .prop("arg", Shape::integer())
                .prop(
                    "path",
                    Shape::array()
                        .min_items(1)
                        .items(Shape::one_of_types(&[JsonType::String, JsonType::Integer])),
                )
                .required(),
        );
    let actions_config = Shape::object()
        .prop(
            "args",
            Shape::array()
                .items(Shape::reference("typedefWithText"))
                .required(),
        )
        .prop("updateState", Shape::object().entries(state_update));

    let source_configs = Shape::object()
        .prop("static", static_config)
        .prop("data", data_config)
        .prop("const", const_config)
        .prop("designer", designer_config)
        .prop("actions", actions_config)
        .prop("state", Shape::object().no_props());

    BTreeMap::from([
        (
            "source",
            Shape::array()
                .min_items(1)
                .unique_items()
                .items(Shape::string().enumeration(VALUE_SOURCES)),
        ),
        ("sourceConfigs", source_configs),
    ])
}

/// A value-type shape for the given profile; `with_text` adds the
/// required `textKey`/`descriptionTextKey` pair carried by props, shape
/// fields, and method arguments.
fn value_shape(profile: SchemaProfile, with_text: bool) -> Shape {
    let mut properties = typedef_properties("value", "valueWithText", true);
    if profile.value_sources {
        properties.extend(source_properties());
    }
    if with_text {
        properties.extend(text_and_desc());
    }
    Shape::object().props(properties)
}

/// The plain typedef shape used by state slots and action arguments;
/// its recursion stays inside the typedef grammar.
fn typedef_shape(with_text: bool) -> Shape {
    let mut properties = typedef_properties("typedef", "typedef", false);
    if with_text {
        properties.extend(text_and_desc());
    }
    Shape::object().props(properties)
}

/// One prop definition: a text-carrying value type plus `group`.
fn prop_shape(profile: SchemaProfile) -> Shape {
    let mut properties = typedef_properties("value", "valueWithText", true);
    if profile.value_sources {
        properties.extend(source_properties());
    }
    properties.extend(text_and_desc());
    properties.insert("group", Shape::string().non_empty());
    Shape::object().props(properties)
}

/// One state slot: a typedef plus text keys and `initialValue`.
fn state_slot_shape() -> Shape {
    let initial_value = Shape::object()
        .prop(
            "source",
            Shape::string().enumeration(INITIAL_SOURCES).required(),
        )
        .prop(
            "sourceData",
            Shape::object()
                .prop("value", Shape::any())
                .prop("propName", Shape::string()),
        )
        .required();

    let mut properties = typedef_properties("typedef", "typedef", false);
    properties.extend(text_and_desc());
    properties.insert("initialValue", initial_value);
    Shape::object().props(properties)
}

/// One method: text keys plus ordered arguments, each a text-carrying
/// value type with a `required` flag.
fn method_shape(profile: SchemaProfile) -> Shape {
    let mut arg_properties = typedef_properties("value", "valueWithText", true);
    if profile.value_sources {
        arg_properties.extend(source_properties());
    }
    arg_properties.extend(text_and_desc());
    arg_properties.insert("required", Shape::boolean().required());

    Shape::object()
        .props(text_and_desc())
        .prop(
            "args",
            Shape::array()
                .items(Shape::object().props(arg_properties))
                .required(),
        )
}

/// Composite layouts: every layout carries text keys and at least one
/// region; every region names its component and default state.
fn layouts_shape() -> Shape {
    let region = Shape::object()
        .props(text_and_desc())
        .prop("component", Shape::string().non_empty().required())
        .prop("defaultEnabled", Shape::boolean().required())
        .prop("props", Shape::object());

    let layout = Shape::object()
        .props(text_and_desc())
        .prop("icon", Shape::string().non_empty())
        .prop(
            "regions",
            Shape::array().min_items(1).items(region).required(),
        );

    Shape::array().min_items(1).items(layout)
}

/// Placement rules. Structural only; the referenced names are not
/// cross-checked.
fn placement_shape() -> Shape {
    let inside_include = Shape::object()
        .prop("all", Shape::boolean())
        .prop("component", Shape::string().non_empty())
        .prop("group", Shape::string().non_empty())
        .prop("tag", Shape::string().non_empty())
        .prop("maxNum", Shape::number().minimum(1));
    let inside_exclude = Shape::object()
        .prop("component", Shape::string().non_empty())
        .prop("group", Shape::string().non_empty())
        .prop("tag", Shape::string().non_empty());
    let inside = Shape::object()
        .prop("include", Shape::array().min_items(1).items(inside_include))
        .prop("exclude", Shape::array().min_items(1).items(inside_exclude));

    let sibling_ref = Shape::object()
        .prop("component", Shape::string().non_empty())
        .prop("group", Shape::string().non_empty());
    let sibling = Shape::object()
        .prop("include", Shape::array().min_items(1).items(sibling_ref.clone()))
        .prop("exclude", Shape::array().min_items(1).items(sibling_ref));

    Shape::object()
        .prop("inside", inside)
        .prop("after", sibling.clone())
        .prop("before", sibling)
}

/// The component-metadata document.
fn component_shape(profile: SchemaProfile) -> Shape {
    let prop_group = Shape::object()
        .prop("name", Shape::string().non_empty().required())
        .prop("textKey", Shape::string().non_empty().required());

    let mut shape = Shape::object()
        .props(text_and_desc())
        .prop("displayName", Shape::string().non_empty().required())
        .prop("group", Shape::string().non_empty())
        .prop(
            "tags",
            Shape::array()
                .unique_items()
                .items(Shape::string().non_empty()),
        )
        .prop(
            "kind",
            Shape::string().enumeration(COMPONENT_KINDS).required(),
        )
        .prop("hidden", Shape::boolean())
        .prop("icon", Shape::string().non_empty())
        .prop("props", Shape::object().entries(prop_shape(profile)))
        .prop("propGroups", Shape::array().items(prop_group))
        .prop("types", Shape::reference("types"))
        .prop("strings", Shape::reference("strings"))
        .prop("layouts", layouts_shape())
        .prop("placement", placement_shape());

    if profile.stateful {
        shape = shape
            .prop("state", Shape::object().entries(state_slot_shape()))
            .prop("methods", Shape::object().entries(method_shape(profile)));
    }

    shape
}

/// The named-type dictionary document: name → value-type definition.
fn types_document_shape() -> Shape {
    Shape::object().entries(Shape::reference("value"))
}

/// The string dictionary document: key → locale → text.
fn strings_document_shape() -> Shape {
    Shape::object().entries(Shape::object().entries(Shape::string()))
}

/// The library main-metadata document.
fn main_document_shape() -> Shape {
    let component_group = Shape::object()
        .prop("textKey", Shape::string().non_empty().required())
        .prop("descriptionTextKey", Shape::string().non_empty());

    Shape::object()
        .prop("namespace", Shape::string().non_empty().required())
        .prop("globalStyle", Shape::boolean().required())
        .prop(
            "containerStyle",
            Shape::object().entries(Shape::string().non_empty()),
        )
        .prop(
            "loaders",
            Shape::object().entries(
                Shape::array()
                    .min_items(1)
                    .items(Shape::one_of_types(&[JsonType::String, JsonType::Object]).non_empty()),
            ),
        )
        .prop(
            "import",
            Shape::array()
                .unique_items()
                .items(Shape::string().non_empty()),
        )
        .prop(
            "components",
            Shape::object().entries(Shape::reference("component")),
        )
        .prop(
            "componentGroups",
            Shape::object().entries(component_group),
        )
        .prop("strings", Shape::reference("strings"))
        .prop(
            "tags",
            Shape::object().entries(
                Shape::array()
                    .min_items(1)
                    .unique_items()
                    .items(Shape::string().non_empty()),
            ),
        )
}
