//! # arbor-meta — Component Library Metadata Assembly
//!
//! Assembles and validates an arbor component library from its directory
//! tree: structural validation first (batched violations, via
//! `arbor-schema`), then fail-fast reference checking of every value-type
//! tree, then cross-component consistency checks.
//!
//! ## File Layout
//!
//! Each component directory carries a `.arbor/` marker directory holding
//! `meta.json` (required) plus optional `types.json` and `strings.json`.
//! The library root carries `arbor.json`, or an `"arbor"` field in its
//! `package.json`.
//!
//! ## Entry Points
//!
//! - [`assemble_library`] — walk a library root and produce the merged
//!   [`arbor_core::LibraryMeta`], or the first fatal error.
//! - [`assemble_component`] — assemble a single component from its
//!   marker directory.
//! - [`check_value`] / [`check_typedef`] — the recursive reference
//!   checker, re-entrant across callers.

pub mod component;
pub mod error;
pub mod fsio;
pub mod library;
pub mod refcheck;

/// Metadata marker directory inside each component directory.
pub const METADATA_DIR: &str = ".arbor";

/// Component metadata file inside the marker directory.
pub const METADATA_FILE: &str = "meta.json";

/// Optional named-type dictionary inside the marker directory.
pub const METADATA_TYPES_FILE: &str = "types.json";

/// Optional string dictionary inside the marker directory.
pub const METADATA_STRINGS_FILE: &str = "strings.json";

/// Library main metadata file at the library root.
pub const METADATA_MAIN_FILE: &str = "arbor.json";

/// Package descriptor probed when the main metadata file is absent.
pub const PACKAGE_FILE: &str = "package.json";

/// Field of the package descriptor holding embedded library metadata.
pub const PACKAGE_META_KEY: &str = "arbor";

// Re-export primary entry points.
pub use component::assemble_component;
pub use error::{ConsistencyError, MetaError, ReferenceError};
pub use fsio::{list_subdirectories, read_json_file};
pub use library::assemble_library;
pub use refcheck::{check_typedef, check_value};
