//! # Shape Language
//!
//! A small declarative vocabulary for describing the structure of JSON
//! documents: type constraints, required/optional fields, enumerations,
//! non-empty strings, array cardinality and uniqueness, closed property
//! sets, and open maps whose every value shares one shape.
//!
//! Recursion is first-class: [`Shape::reference`] names another shape in
//! a [`ShapeRegistry`], so a shape can point back at itself (or at a
//! sibling) without the definition ever cycling in memory.

use std::collections::BTreeMap;

use serde_json::Value;

/// JSON type constraint carried by a shape node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonType {
    /// Any value, including null.
    Any,
    /// A JSON string.
    String,
    /// A JSON boolean.
    Boolean,
    /// A JSON number without a fractional part.
    Integer,
    /// Any JSON number.
    Number,
    /// A JSON array.
    Array,
    /// A JSON object.
    Object,
}

impl JsonType {
    /// The name used in violation messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Array => "array",
            Self::Object => "object",
        }
    }

    /// Whether `value` satisfies this type constraint.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::Any => true,
            Self::String => value.is_string(),
            Self::Boolean => value.is_boolean(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
        }
    }
}

/// One shape: either a named reference into the registry or an inline
/// node of constraints.
#[derive(Debug, Clone)]
pub struct Shape {
    pub(crate) required: bool,
    pub(crate) def: ShapeDef,
}

/// The two variants of a shape.
#[derive(Debug, Clone)]
pub(crate) enum ShapeDef {
    /// Resolved against the registry at validation time. This is how a
    /// shape embeds itself: the reference is data, not a cycle.
    Ref(&'static str),
    Node(Box<ShapeNode>),
}

/// Constraint set of an inline shape node.
#[derive(Debug, Clone)]
pub(crate) struct ShapeNode {
    /// Allowed JSON types; a value must match at least one.
    pub(crate) types: Vec<JsonType>,
    /// When false, an empty string is a violation.
    pub(crate) allow_empty: bool,
    /// Closed set of allowed string values.
    pub(crate) enumeration: Option<Vec<&'static str>>,
    /// Minimum array length.
    pub(crate) min_items: Option<usize>,
    /// When true, duplicate array items are a violation.
    pub(crate) unique_items: bool,
    /// Minimum integer value.
    pub(crate) minimum: Option<i64>,
    /// Shape of every array element.
    pub(crate) items: Option<Shape>,
    /// Declared object properties. `Some` makes the property set closed
    /// when the validator is configured to forbid additional properties.
    pub(crate) properties: Option<BTreeMap<&'static str, Shape>>,
    /// Shape of every value of an open map.
    pub(crate) entries: Option<Box<Shape>>,
}

impl ShapeNode {
    fn new(types: Vec<JsonType>) -> Self {
        Self {
            types,
            allow_empty: true,
            enumeration: None,
            min_items: None,
            unique_items: false,
            minimum: None,
            items: None,
            properties: None,
            entries: None,
        }
    }
}

impl Shape {
    fn node(types: Vec<JsonType>) -> Self {
        Self {
            required: false,
            def: ShapeDef::Node(Box::new(ShapeNode::new(types))),
        }
    }

    /// A string value.
    pub fn string() -> Self {
        Self::node(vec![JsonType::String])
    }

    /// A boolean value.
    pub fn boolean() -> Self {
        Self::node(vec![JsonType::Boolean])
    }

    /// An integer value.
    pub fn integer() -> Self {
        Self::node(vec![JsonType::Integer])
    }

    /// Any numeric value.
    pub fn number() -> Self {
        Self::node(vec![JsonType::Number])
    }

    /// An array value.
    pub fn array() -> Self {
        Self::node(vec![JsonType::Array])
    }

    /// An object value.
    pub fn object() -> Self {
        Self::node(vec![JsonType::Object])
    }

    /// Any value at all.
    pub fn any() -> Self {
        Self::node(vec![JsonType::Any])
    }

    /// A value matching at least one of several types.
    pub fn one_of_types(types: &[JsonType]) -> Self {
        Self::node(types.to_vec())
    }

    /// A named reference resolved against the registry at validation
    /// time. This is the recursive tie-back.
    pub fn reference(name: &'static str) -> Self {
        Self {
            required: false,
            def: ShapeDef::Ref(name),
        }
    }

    /// Mark the property as required in its enclosing object.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Forbid the empty string.
    pub fn non_empty(mut self) -> Self {
        if let ShapeDef::Node(node) = &mut self.def {
            node.allow_empty = false;
        }
        self
    }

    /// Restrict a string to a closed set of values.
    pub fn enumeration(mut self, values: &'static [&'static str]) -> Self {
        if let ShapeDef::Node(node) = &mut self.def {
            node.enumeration = Some(values.to_vec());
        }
        self
    }

    /// Require at least `n` array items.
    pub fn min_items(mut self, n: usize) -> Self {
        if let ShapeDef::Node(node) = &mut self.def {
            node.min_items = Some(n);
        }
        self
    }

    /// Forbid duplicate array items.
    pub fn unique_items(mut self) -> Self {
        if let ShapeDef::Node(node) = &mut self.def {
            node.unique_items = true;
        }
        self
    }

    /// Require an integer of at least `n`.
    pub fn minimum(mut self, n: i64) -> Self {
        if let ShapeDef::Node(node) = &mut self.def {
            node.minimum = Some(n);
        }
        self
    }

    /// Shape of every array element.
    pub fn items(mut self, items: Shape) -> Self {
        if let ShapeDef::Node(node) = &mut self.def {
            node.items = Some(items);
        }
        self
    }

    /// Declare an object property. The first call closes the property
    /// set (under a forbid-additional validation run).
    pub fn prop(mut self, name: &'static str, shape: Shape) -> Self {
        if let ShapeDef::Node(node) = &mut self.def {
            node.properties
                .get_or_insert_with(BTreeMap::new)
                .insert(name, shape);
        }
        self
    }

    /// Declare every declared property from an existing map.
    pub fn props(mut self, properties: BTreeMap<&'static str, Shape>) -> Self {
        if let ShapeDef::Node(node) = &mut self.def {
            node.properties
                .get_or_insert_with(BTreeMap::new)
                .extend(properties);
        }
        self
    }

    /// Close the property set without declaring any property, so that
    /// only the empty object validates under forbid-additional runs.
    pub fn no_props(mut self) -> Self {
        if let ShapeDef::Node(node) = &mut self.def {
            node.properties.get_or_insert_with(BTreeMap::new);
        }
        self
    }

    /// Shape of every value of an open map.
    pub fn entries(mut self, entry: Shape) -> Self {
        if let ShapeDef::Node(node) = &mut self.def {
            node.entries = Some(Box::new(entry));
        }
        self
    }

    /// Whether the property is required in its enclosing object.
    pub fn is_required(&self) -> bool {
        self.required
    }
}

/// Named shapes available for [`Shape::reference`] resolution.
#[derive(Debug, Default)]
pub struct ShapeRegistry {
    shapes: BTreeMap<&'static str, Shape>,
}

impl ShapeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shape under a name, replacing any previous entry.
    pub fn register(&mut self, name: &'static str, shape: Shape) {
        self.shapes.insert(name, shape);
    }

    /// Look up a named shape.
    pub fn get(&self, name: &str) -> Option<&Shape> {
        self.shapes.get(name)
    }

    /// Names of all registered shapes, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        self.shapes.keys().copied().collect()
    }
}
