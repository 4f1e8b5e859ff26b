//! # arbor-schema — Structural Schema Validation
//!
//! Validates raw `serde_json::Value` documents against declarative shape
//! descriptions before anything downstream touches them.
//!
//! ## Design
//!
//! Shapes form a tagged-variant recursive data type ([`Shape`]). A shape
//! that embeds itself — the value-type grammar's `ofType`/`fields`
//! tie-back — is expressed as a named reference resolved against a
//! [`ShapeRegistry`] at validation time, never by unrolling.
//!
//! Validation is batched: every violation of one document is collected
//! with its path and reported together ([`Violations`]). This is the
//! opposite of the reference checker's fail-fast policy, and the
//! asymmetry is deliberate — structural defects are independent of one
//! another, reference defects are not.
//!
//! The two component-metadata schema generations are two
//! [`SchemaProfile`] values consumed by one parameterized constructor
//! ([`MetaSchemas::new`]); there is no forked schema code.

pub mod documents;
pub mod shape;
pub mod validate;

// Re-export primary types.
pub use documents::{MetaSchemas, SchemaProfile};
pub use shape::{JsonType, Shape, ShapeRegistry};
pub use validate::{validate, ValidateOptions, Violation, Violations};
