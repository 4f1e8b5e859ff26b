//! # Structural Validator
//!
//! Walks a raw JSON value against a [`Shape`], collecting every violation
//! with enough path information to form a human-readable message. Nothing
//! is coerced: a document either validates unchanged or the full ordered
//! violation list comes back.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::shape::{Shape, ShapeDef, ShapeNode, ShapeRegistry};

/// Reference chains longer than this are reported as unresolvable rather
/// than followed further.
const MAX_REF_DEPTH: usize = 32;

/// A single structural violation with its location.
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    /// Dotted path to the violating value (`props.value.textKey`,
    /// `layouts[0].regions`); empty for the document root.
    pub path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.path, self.message)
        }
    }
}

/// Ordered collection of every violation found in one document.
#[derive(Debug, Clone, Default)]
pub struct Violations {
    violations: Vec<Violation>,
}

impl Violations {
    /// Number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// True if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// All violations, in document order.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consumes self and returns the inner list.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

/// Options governing one validation run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidateOptions {
    /// When true, object properties not declared in a closed property
    /// set are violations.
    pub forbid_additional: bool,
}

/// Validate `doc` against `shape`, resolving named references through
/// `registry`.
///
/// Returns `Ok(())` when the document conforms; otherwise every violation
/// found, in deterministic document order.
pub fn validate(
    doc: &Value,
    shape: &Shape,
    registry: &ShapeRegistry,
    options: &ValidateOptions,
) -> Result<(), Violations> {
    let mut out = Vec::new();
    check(doc, shape, registry, options, "", &mut out);
    if out.is_empty() {
        Ok(())
    } else {
        Err(Violations { violations: out })
    }
}

fn check(
    value: &Value,
    shape: &Shape,
    registry: &ShapeRegistry,
    options: &ValidateOptions,
    path: &str,
    out: &mut Vec<Violation>,
) {
    // Resolve named references down to an inline node.
    let mut current = shape;
    let mut depth = 0;
    let node: &ShapeNode = loop {
        match &current.def {
            ShapeDef::Node(node) => break node.as_ref(),
            ShapeDef::Ref(name) => {
                depth += 1;
                if depth > MAX_REF_DEPTH {
                    push(out, path, format!("shape reference chain too deep at '{name}'"));
                    return;
                }
                match registry.get(name) {
                    Some(resolved) => current = resolved,
                    None => {
                        push(out, path, format!("unresolved shape reference '{name}'"));
                        return;
                    }
                }
            }
        }
    };

    if !node.types.is_empty() && !node.types.iter().any(|t| t.matches(value)) {
        let expected: Vec<&str> = node.types.iter().map(|t| t.name()).collect();
        push(
            out,
            path,
            format!("expected {}, got {}", expected.join(" or "), type_name(value)),
        );
        // Sub-constraints are meaningless on a value of the wrong type.
        return;
    }

    if let Some(s) = value.as_str() {
        if !node.allow_empty && s.is_empty() {
            push(out, path, "must not be empty".to_string());
        }
        if let Some(allowed) = &node.enumeration {
            if !allowed.iter().any(|candidate| *candidate == s) {
                push(out, path, format!("must be one of: {}", allowed.join(", ")));
            }
        }
    }

    if let (Some(minimum), Some(n)) = (node.minimum, value.as_f64()) {
        if n < minimum as f64 {
            push(out, path, format!("must be at least {minimum}"));
        }
    }

    if let Some(items) = value.as_array() {
        if let Some(min_items) = node.min_items {
            if items.len() < min_items {
                push(
                    out,
                    path,
                    format!("must contain at least {min_items} item(s)"),
                );
            }
        }
        if node.unique_items && has_duplicates(items) {
            push(out, path, "must not contain duplicate items".to_string());
        }
        if let Some(item_shape) = &node.items {
            for (i, item) in items.iter().enumerate() {
                let item_path = format!("{path}[{i}]");
                check(item, item_shape, registry, options, &item_path, out);
            }
        }
    }

    if let Some(map) = value.as_object() {
        if let Some(properties) = &node.properties {
            for (name, property_shape) in properties {
                let child_path = join(path, name);
                match map.get(*name) {
                    Some(child) => {
                        check(child, property_shape, registry, options, &child_path, out)
                    }
                    None => {
                        if property_shape.is_required() {
                            push(out, &child_path, "is required".to_string());
                        }
                    }
                }
            }
            if options.forbid_additional && node.entries.is_none() {
                for key in map.keys() {
                    if !properties.contains_key(key.as_str()) {
                        push(out, &join(path, key), "unknown property".to_string());
                    }
                }
            }
        }
        if let Some(entry_shape) = &node.entries {
            for (key, entry) in map {
                let entry_path = join(path, key);
                check(entry, entry_shape, registry, options, &entry_path, out);
            }
        }
    }
}

fn push(out: &mut Vec<Violation>, path: &str, message: String) {
    out.push(Violation {
        path: path.to_string(),
        message,
    });
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn has_duplicates(items: &[Value]) -> bool {
    for (i, a) in items.iter().enumerate() {
        if items[i + 1..].contains(a) {
            return true;
        }
    }
    false
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::JsonType;
    use serde_json::json;

    fn empty_registry() -> ShapeRegistry {
        ShapeRegistry::new()
    }

    fn run(doc: &Value, shape: &Shape, registry: &ShapeRegistry) -> Vec<Violation> {
        validate(doc, shape, registry, &ValidateOptions::default())
            .err()
            .map(Violations::into_inner)
            .unwrap_or_default()
    }

    #[test]
    fn accepts_matching_document() {
        let shape = Shape::object()
            .prop("name", Shape::string().non_empty().required())
            .prop("count", Shape::integer());
        let registry = empty_registry();
        assert!(run(&json!({"name": "x", "count": 3}), &shape, &registry).is_empty());
        assert!(run(&json!({"name": "x"}), &shape, &registry).is_empty());
    }

    #[test]
    fn collects_every_violation() {
        let shape = Shape::object()
            .prop("name", Shape::string().non_empty().required())
            .prop("count", Shape::integer().required());
        let registry = empty_registry();
        let violations = run(&json!({"name": ""}), &shape, &registry);
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].path, "count");
        assert_eq!(violations[0].message, "is required");
        assert_eq!(violations[1].path, "name");
        assert_eq!(violations[1].message, "must not be empty");
    }

    #[test]
    fn type_mismatch_names_both_types() {
        let shape = Shape::object().prop("flag", Shape::boolean());
        let registry = empty_registry();
        let violations = run(&json!({"flag": "yes"}), &shape, &registry);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].message, "expected boolean, got string");
    }

    #[test]
    fn multi_type_accepts_either() {
        let shape = Shape::one_of_types(&[JsonType::String, JsonType::Integer]);
        let registry = empty_registry();
        assert!(run(&json!("x"), &shape, &registry).is_empty());
        assert!(run(&json!(4), &shape, &registry).is_empty());
        let violations = run(&json!(true), &shape, &registry);
        assert_eq!(violations[0].message, "expected string or integer, got boolean");
    }

    #[test]
    fn enumeration_restricts_strings() {
        let shape = Shape::string().enumeration(&["atomic", "container", "composite"]);
        let registry = empty_registry();
        assert!(run(&json!("atomic"), &shape, &registry).is_empty());
        let violations = run(&json!("other"), &shape, &registry);
        assert_eq!(
            violations[0].message,
            "must be one of: atomic, container, composite"
        );
    }

    #[test]
    fn array_cardinality_and_uniqueness() {
        let shape = Shape::array()
            .min_items(1)
            .unique_items()
            .items(Shape::string());
        let registry = empty_registry();
        assert!(run(&json!(["a", "b"]), &shape, &registry).is_empty());
        assert_eq!(run(&json!([]), &shape, &registry)[0].message, "must contain at least 1 item(s)");
        assert_eq!(
            run(&json!(["a", "a"]), &shape, &registry)[0].message,
            "must not contain duplicate items"
        );
        let violations = run(&json!(["a", 1]), &shape, &registry);
        assert_eq!(violations[0].path, "[1]");
    }

    #[test]
    fn minimum_applies_to_integers() {
        let shape = Shape::integer().minimum(0);
        let registry = empty_registry();
        assert!(run(&json!(0), &shape, &registry).is_empty());
        assert_eq!(run(&json!(-1), &shape, &registry)[0].message, "must be at least 0");
    }

    #[test]
    fn unknown_properties_rejected_only_when_configured() {
        let shape = Shape::object().prop("known", Shape::string());
        let registry = empty_registry();
        let doc = json!({"known": "x", "extra": 1});

        assert!(validate(&doc, &shape, &registry, &ValidateOptions::default()).is_ok());

        let err = validate(
            &doc,
            &shape,
            &registry,
            &ValidateOptions { forbid_additional: true },
        )
        .unwrap_err();
        assert_eq!(err.violations()[0].path, "extra");
        assert_eq!(err.violations()[0].message, "unknown property");
    }

    #[test]
    fn entries_shape_applies_to_every_value() {
        let shape = Shape::object().entries(Shape::integer());
        let registry = empty_registry();
        let violations = run(&json!({"a": 1, "b": "x"}), &shape, &registry);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "b");
    }

    #[test]
    fn self_referential_shape_validates_arbitrary_depth() {
        let mut registry = ShapeRegistry::new();
        registry.register(
            "tree",
            Shape::object()
                .prop("label", Shape::string().required())
                .prop("child", Shape::reference("tree")),
        );
        let shape = Shape::reference("tree");

        let ok = json!({"label": "a", "child": {"label": "b", "child": {"label": "c"}}});
        assert!(run(&ok, &shape, &registry).is_empty());

        let bad = json!({"label": "a", "child": {"child": {"label": "c"}}});
        let violations = run(&bad, &shape, &registry);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "child.label");
        assert_eq!(violations[0].message, "is required");
    }

    #[test]
    fn unresolved_reference_is_reported_not_panicked() {
        let registry = empty_registry();
        let violations = run(&json!({}), &Shape::reference("missing"), &registry);
        assert_eq!(violations[0].message, "unresolved shape reference 'missing'");
    }

    #[test]
    fn violation_display_includes_path() {
        let v = Violation {
            path: "props.value".to_string(),
            message: "is required".to_string(),
        };
        assert_eq!(v.to_string(), "  props.value: is required");
        let root = Violation {
            path: String::new(),
            message: "expected object, got array".to_string(),
        };
        assert!(root.to_string().contains("(root)"));
    }

    #[test]
    fn violation_serializes_to_json() {
        let v = Violation {
            path: "kind".to_string(),
            message: "is required".to_string(),
        };
        let line = serde_json::to_string(&v).unwrap();
        assert_eq!(line, r#"{"path":"kind","message":"is required"}"#);
    }
}
