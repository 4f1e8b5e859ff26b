//! # arbor-cli — Component Library Metadata Validator
//!
//! Provides the `arbor` command-line interface: point it at a component
//! library root and it either confirms the metadata is consistent or
//! reports the first fatal defect, with structural violations serialized
//! one JSON object per line.
//!
//! ```bash
//! arbor path/to/library
//! arbor --profile legacy path/to/old-library
//! ```

pub mod check;

pub use check::{run_check, CheckArgs};
