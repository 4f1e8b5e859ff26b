//! # arbor CLI entry point
//!
//! Parses command-line arguments, initializes tracing from the verbosity
//! flags, and dispatches to the check handler.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use arbor_cli::CheckArgs;

/// Validate the metadata of an arbor component library.
///
/// Walks the library's directory tree, validates every component's
/// metadata structurally, and cross-checks all string, type, group, and
/// tag references.
#[derive(Parser, Debug)]
#[command(name = "arbor", version, about)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    check: CheckArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match arbor_cli::run_check(&cli.check) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_cli::check::ProfileArg;
    use std::path::PathBuf;

    #[test]
    fn cli_parse_path_only() {
        let cli = Cli::try_parse_from(["arbor", "lib/"]).unwrap();
        assert_eq!(cli.check.path, PathBuf::from("lib/"));
        assert_eq!(cli.check.profile, ProfileArg::Current);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn cli_parse_legacy_profile() {
        let cli = Cli::try_parse_from(["arbor", "--profile", "legacy", "lib/"]).unwrap();
        assert_eq!(cli.check.profile, ProfileArg::Legacy);
    }

    #[test]
    fn cli_parse_verbose_levels() {
        let cli1 = Cli::try_parse_from(["arbor", "-v", "lib/"]).unwrap();
        assert_eq!(cli1.verbose, 1);
        let cli3 = Cli::try_parse_from(["arbor", "-vvv", "lib/"]).unwrap();
        assert_eq!(cli3.verbose, 3);
    }

    #[test]
    fn cli_parse_missing_path_errors() {
        assert!(Cli::try_parse_from(["arbor"]).is_err());
    }

    #[test]
    fn cli_parse_unknown_profile_errors() {
        assert!(Cli::try_parse_from(["arbor", "--profile", "future", "lib/"]).is_err());
    }
}
