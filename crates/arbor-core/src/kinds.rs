//! # Value-Type Grammar
//!
//! The closed set of builtin value-type kinds. A kind name is either a
//! member of this set or a reference to a named type that must resolve in
//! the enclosing type table.
//!
//! ## Grammar
//!
//! Scalar kinds carry no nested structure: `string`, `bool`, `int`,
//! `float`, `component`, `func`, `any`. Composite kinds carry exactly one
//! nested obligation each: `oneOf` requires `options`, `arrayOf` and
//! `objectOf` require `ofType`, `shape` requires `fields`.

/// Every builtin kind name, scalars first, composites last.
pub const BUILTIN_KINDS: &[&str] = &[
    "string", "bool", "int", "float", "component", "func", "any", "oneOf", "arrayOf", "objectOf",
    "shape",
];

/// Returns true if `name` is a builtin kind.
///
/// Any non-builtin kind appearing in a value-type definition is a named
/// type and must exist as a key in the component's type table.
pub fn is_builtin_kind(name: &str) -> bool {
    BUILTIN_KINDS.contains(&name)
}

/// Returns true if `name` is a builtin scalar kind (builtin, not composite).
pub fn is_scalar_kind(name: &str) -> bool {
    is_builtin_kind(name) && CompositeKind::parse(name).is_none()
}

/// The four composite kinds, each imposing one structural obligation on
/// its definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeKind {
    /// Closed enumeration of values; requires a non-empty `options` list.
    OneOf,
    /// Homogeneous array; requires `ofType`.
    ArrayOf,
    /// Homogeneous string-keyed map; requires `ofType`.
    ObjectOf,
    /// Fixed record; requires `fields`.
    Shape,
}

impl CompositeKind {
    /// Parse a kind name into a composite kind, if it is one.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "oneOf" => Some(Self::OneOf),
            "arrayOf" => Some(Self::ArrayOf),
            "objectOf" => Some(Self::ObjectOf),
            "shape" => Some(Self::Shape),
            _ => None,
        }
    }

    /// The canonical kind name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneOf => "oneOf",
            Self::ArrayOf => "arrayOf",
            Self::ObjectOf => "objectOf",
            Self::Shape => "shape",
        }
    }
}
