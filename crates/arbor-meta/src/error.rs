//! # Error Types — Assembly Error Hierarchy
//!
//! Every failure mode of metadata assembly, using `thiserror` for
//! derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Not-found is an internal signal (`Ok(None)` from the filesystem
//!   layer) and never surfaces as an error.
//! - Structural failures carry the full ordered violation list of the
//!   offending document; everything else fails on the first defect.
//! - Context wraps outward: a component error discovered during the
//!   library walk is wrapped with the library namespace so the final
//!   message reads outer-to-inner.

use std::path::PathBuf;

use arbor_schema::Violations;
use thiserror::Error;

/// Top-level error type for metadata assembly.
#[derive(Error, Debug)]
pub enum MetaError {
    /// I/O failure other than not-found.
    #[error("fs error while reading {}: {source}", .path.display())]
    Filesystem {
        /// The path that failed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// JSON parse failure.
    #[error("malformed JSON in {}", .path.display())]
    MalformedJson {
        /// The file that failed to parse.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The metadata marker exists but the component metadata file is gone.
    #[error("component metadata file not found at {}", .path.display())]
    MissingMetadata {
        /// Expected location of the metadata file.
        path: PathBuf,
    },

    /// A document failed structural validation; every violation is
    /// reported together.
    #[error("invalid {document} in {}:\n{violations}", .path.display())]
    Structural {
        /// Which document failed (component metadata, strings, ...).
        document: &'static str,
        /// The file that failed.
        path: PathBuf,
        /// The full ordered violation list.
        violations: Violations,
    },

    /// A structurally valid document could not be decoded into its
    /// typed record.
    #[error("cannot decode {document} in {}: {source}", .path.display())]
    Decode {
        /// Which document failed to decode.
        document: &'static str,
        /// The file that failed.
        path: PathBuf,
        /// The underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// An unresolved string/type reference or invalid literal value.
    #[error(transparent)]
    Reference(#[from] ReferenceError),

    /// A cross-reference defect between records.
    #[error(transparent)]
    Consistency(#[from] ConsistencyError),

    /// A component error wrapped with the library it was discovered in.
    #[error("error while reading component metadata of '{namespace}': {source}")]
    Library {
        /// Namespace of the library being assembled.
        namespace: String,
        /// The underlying component error.
        #[source]
        source: Box<MetaError>,
    },
}

/// Unresolved reference inside a value-type tree. Always reports the
/// first violation found; later checks presuppose earlier ones passed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    /// A string key does not exist in the string table.
    #[error("unknown string '{key}' in {at} of component '{component}'")]
    UnknownString {
        /// The unresolved string key.
        key: String,
        /// Where the key was referenced, e.g. `textKey of prop 'label'`.
        at: String,
        /// The component being checked.
        component: String,
    },

    /// A non-builtin kind does not exist in the type table.
    #[error("unknown kind '{name}' in {at} of component '{component}'")]
    UnknownKind {
        /// The unresolved kind name.
        name: String,
        /// Where the kind was referenced.
        at: String,
        /// The component being checked.
        component: String,
    },

    /// A composite kind is missing its structural obligation.
    #[error("'{component}': {at} of kind '{kind}' must have '{field}' field")]
    MissingKindField {
        /// The component being checked.
        component: String,
        /// The definition missing the field, e.g. `prop 'rows'`.
        at: String,
        /// The composite kind.
        kind: String,
        /// The missing field: `options`, `ofType`, or `fields`.
        field: &'static str,
    },

    /// A configured literal does not type-check against its definition.
    #[error("'{component}': {what} of prop '{path}' is not valid for kind '{kind}'")]
    InvalidValue {
        /// The component being checked.
        component: String,
        /// Which literal failed: `default static value` or `const value`.
        what: &'static str,
        /// Path of the prop carrying the literal.
        path: String,
        /// Rendered kind the literal was checked against.
        kind: String,
    },

    /// A source config exists for an origin absent from the source list.
    #[error("got '{origin}' source config but '{origin}' is not in sources list for prop '{path}' of component '{component}'")]
    SourceConfigMismatch {
        /// The origin with a config but no source entry.
        origin: String,
        /// Path of the offending prop.
        path: String,
        /// The component being checked.
        component: String,
    },

    /// A required text key is absent where checking expected one.
    #[error("missing {field} in {at} of component '{component}'")]
    MissingTextKey {
        /// Which key is missing: `textKey` or `descriptionTextKey`.
        field: &'static str,
        /// Where the key was expected.
        at: String,
        /// The component being checked.
        component: String,
    },
}

/// Cross-reference defect between records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyError {
    /// A prop names a group the component never declared.
    #[error("unknown props group '{group}' in prop '{prop}' of component '{component}'")]
    UnknownPropGroup {
        /// The undeclared group name.
        group: String,
        /// The prop referencing it.
        prop: String,
        /// The component being checked.
        component: String,
    },

    /// A composite component is missing its layouts.
    #[error("'layouts' field not found in metadata for composite component '{component}'")]
    MissingLayouts {
        /// The composite component.
        component: String,
    },

    /// A state slot mirrors a prop the component does not declare.
    #[error("unknown prop reference '{prop}' in initial value configuration of state slot '{slot}' of component '{component}'")]
    UnknownInitialValueProp {
        /// The undeclared prop name.
        prop: String,
        /// The state slot referencing it.
        slot: String,
        /// The component being checked.
        component: String,
    },

    /// A prop-sourced initial value without a prop name.
    #[error("missing prop name in initial value configuration of state slot '{slot}' of component '{component}'")]
    MissingInitialValueProp {
        /// The state slot missing the prop name.
        slot: String,
        /// The component being checked.
        component: String,
    },

    /// A discovered component belongs to an undeclared group.
    #[error("'{component}' component: group '{group}' is not defined")]
    UnknownComponentGroup {
        /// The discovered component.
        component: String,
        /// The undeclared group id.
        group: String,
    },

    /// A tag section lists a component that was never discovered.
    #[error("unknown component '{component}' in tags section (tag '{tag}') of {file}")]
    UnknownTaggedComponent {
        /// The unknown component name.
        component: String,
        /// The tag listing it.
        tag: String,
        /// The file carrying the tag section.
        file: String,
    },

    /// `containerStyle` without `globalStyle`.
    #[error("containerStyle is only allowed when globalStyle is true")]
    ContainerStyleWithoutGlobalStyle,

    /// Neither the main metadata file nor the package-descriptor field
    /// exists.
    #[error("{} is not an arbor component library", .path.display())]
    NotALibrary {
        /// The directory that was probed.
        path: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn reference_error_messages_name_the_reference() {
        let err = ReferenceError::UnknownString {
            key: "missing".to_string(),
            at: "textKey of prop 'label'".to_string(),
            component: "Button".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unknown string 'missing' in textKey of prop 'label' of component 'Button'"
        );
    }

    #[test]
    fn library_context_wraps_outer_to_inner() {
        let inner = MetaError::Consistency(ConsistencyError::UnknownComponentGroup {
            component: "Button".to_string(),
            group: "inputs".to_string(),
        });
        let wrapped = MetaError::Library {
            namespace: "acme".to_string(),
            source: Box::new(inner),
        };
        let message = wrapped.to_string();
        assert!(message.starts_with("error while reading component metadata of 'acme':"));
        assert!(message.contains("group 'inputs' is not defined"));
    }

    #[test]
    fn not_a_library_names_the_path() {
        let err = ConsistencyError::NotALibrary {
            path: Path::new("/tmp/whatever").to_path_buf(),
        };
        assert!(err.to_string().contains("/tmp/whatever"));
    }
}
