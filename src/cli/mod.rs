//! CLI module for mkgen
//!
//! ## Commands
//!
//! - `generate <manifest>` - Write a makefile for every project
//! - `print <manifest>` - Print one project's makefile to stdout
//! - `check <manifest>` - Validate a manifest and list the makefiles it would produce
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// GNU Makefile generator for C/C++ projects
#[derive(Parser, Debug)]
#[command(name = "mkgen")]
#[command(version = VERSION)]
#[command(about = "Generate GNU makefiles from a JSON project manifest", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a makefile for every project in the manifest
    Generate {
        /// Project manifest (JSON)
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,
        /// Write every makefile into this directory instead of each project's location
        #[arg(short, long = "output-dir", value_name = "DIR", env = "MKGEN_OUTPUT_DIR")]
        output_dir: Option<PathBuf>,
        /// Write to a temporary file and rename it into place only on success
        #[arg(long)]
        atomic: bool,
    },

    /// Print one project's makefile to stdout
    Print {
        /// Project manifest (JSON)
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,
        /// Project to print (default: the first project)
        #[arg(short, long, value_name = "NAME")]
        project: Option<String>,
    },

    /// Validate a manifest and list the makefiles it would produce
    Check {
        /// Project manifest (JSON)
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Generate {
            manifest,
            output_dir,
            atomic,
        } => commands::generate(&manifest, output_dir.as_deref(), atomic),
        Command::Print { manifest, project } => commands::print(&manifest, project.as_deref()),
        Command::Check { manifest } => commands::check(&manifest),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_generate() {
        let cli = Cli::try_parse_from(["mkgen", "generate", "mkgen.json", "-o", "build", "--atomic"]).unwrap();
        if let Command::Generate {
            manifest,
            output_dir,
            atomic,
        } = cli.command
        {
            assert_eq!(manifest, PathBuf::from("mkgen.json"));
            assert_eq!(output_dir, Some(PathBuf::from("build")));
            assert!(atomic);
        } else {
            panic!("Expected Generate command");
        }
    }

    #[test]
    fn test_cli_parse_print() {
        let cli = Cli::try_parse_from(["mkgen", "print", "mkgen.json", "-p", "app"]).unwrap();
        if let Command::Print { project, .. } = cli.command {
            assert_eq!(project.as_deref(), Some("app"));
        } else {
            panic!("Expected Print command");
        }
    }

    #[test]
    fn test_cli_parse_check() {
        let cli = Cli::try_parse_from(["mkgen", "check", "mkgen.json"]).unwrap();
        assert!(matches!(cli.command, Command::Check { .. }));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["mkgen"]).is_err());
    }

    #[test]
    fn test_cli_error_display() {
        let err = CliError::failure("boom");
        assert_eq!(err.to_string(), "boom");
        assert_eq!(err.exit_code, ExitCode::FAILURE);
    }
}
