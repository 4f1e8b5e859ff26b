#![deny(missing_docs)]

//! # arbor-core — Foundational Types for the Arbor Metadata Toolchain
//!
//! This crate defines the types every other crate in the workspace depends
//! on. It has no internal crate dependencies — only `serde` and `serde_json`
//! from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **The value-type grammar is closed.** [`is_builtin_kind`] is the single
//!    authority on which kind names are builtin; everything else is a named
//!    type resolved through a [`TypeTable`].
//!
//! 2. **Typed records after validation, `serde_json::Value` before.** Raw
//!    documents stay untyped until structural validation has passed; the
//!    records in [`meta`] are only ever produced from documents that already
//!    validated, so their optional fields encode genuine optionality, not
//!    "might be malformed".
//!
//! 3. **Immutable value trees.** Records are produced once by the assembly
//!    pipeline and never mutated after being returned.

pub mod kinds;
pub mod meta;
pub mod value;

// Re-export primary types at crate root for ergonomic imports.
pub use kinds::{is_builtin_kind, is_scalar_kind, CompositeKind, BUILTIN_KINDS};
pub use meta::{
    ActionsConfig, ComponentGroup, ComponentKind, ComponentMeta, ConstConfig, DataConfig,
    DesignerConfig, DesignerPropDef, InitialValue, InitialValueData, KindOption, Layout,
    LibraryMeta, MethodArg, MethodDef, Placement, PlacementRef, PlacementRules, PropDef,
    PropGroup, Region, SourceConfigs, StateSlot, StateUpdate, StateUpdateData, StaticConfig,
    StringTable, TypeTable, ValueType,
};
pub use value::{describe_kind, value_matches};
