//! # Check Command
//!
//! Validates a whole component library and maps the outcome to an exit
//! code: 0 with a confirmation line on success, 1 with the error message
//! (plus one JSON-serialized line per structural violation) on failure.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use arbor_meta::{assemble_library, MetaError};
use arbor_schema::{SchemaProfile, Violations};

/// Arguments for the `arbor` command.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Component library root directory.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Component-metadata schema generation to validate against.
    #[arg(long, value_enum, default_value_t = ProfileArg::Current)]
    pub profile: ProfileArg,
}

/// Selectable schema generations.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProfileArg {
    /// Current layout: value provenance plus state and methods.
    #[default]
    Current,
    /// Legacy layout: plain value types only.
    Legacy,
}

impl From<ProfileArg> for SchemaProfile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Current => SchemaProfile::current(),
            ProfileArg::Legacy => SchemaProfile::legacy(),
        }
    }
}

/// Execute the check.
///
/// Returns exit code: 0 on success, 1 on validation failure. Operational
/// errors (unusable path) bail instead.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let root = &args.path;

    if !root.exists() {
        bail!("{} does not exist", root.display());
    }
    if !root.is_dir() {
        bail!("{} is not a directory", root.display());
    }

    tracing::debug!(root = %root.display(), profile = ?args.profile, "validating library");

    match assemble_library(root, args.profile.into()) {
        Ok(library) => {
            tracing::info!(
                namespace = %library.namespace,
                components = library.components.len(),
                "validation passed"
            );
            println!("Metadata is OK in {}", root.display());
            Ok(0)
        }
        Err(e) => {
            eprintln!("{e}");
            if let Some(violations) = structural_violations(&e) {
                eprintln!("Validation errors:");
                for violation in violations.violations() {
                    eprintln!("{}", serde_json::to_string(violation)?);
                }
            }
            Ok(1)
        }
    }
}

/// Dig the structural violation list out of an assembly error, looking
/// through library-context wrappers.
fn structural_violations(error: &MetaError) -> Option<&Violations> {
    match error {
        MetaError::Structural { violations, .. } => Some(violations),
        MetaError::Library { source, .. } => structural_violations(source),
        _ => None,
    }
}
