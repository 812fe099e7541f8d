//! Define error types for makefile emission.
//!
//! ## Notes
//!
//! - A failed write inside a step ends that step. The remaining steps still run, and every failure is collected
//!   into [`EmitError::Incomplete`]; a partially written makefile is never reported as success.
//! - Stream creation failure is fatal for the project: no step runs without a stream.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// One step that failed to write its output.
#[derive(Debug)]
pub struct StepFailure {
    /// Name of the failing step
    pub step: &'static str,
    /// Configuration being emitted, for per-configuration steps
    pub configuration: Option<String>,
    pub source: io::Error,
}

impl fmt::Display for StepFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.configuration {
            Some(configuration) => write!(f, "{} [{}]: {}", self.step, configuration, self.source),
            None => write!(f, "{}: {}", self.step, self.source),
        }
    }
}

/// Error during makefile emission.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("cannot create makefile '{}': {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot move '{}' into place as '{}': {source}", .from.display(), .to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("object '{object}' in project '{project}' is produced by both '{first}' and '{second}'")]
    ObjectCollision {
        project: String,
        object: String,
        first: String,
        second: String,
    },

    #[error("makefile is incomplete: {}", summarize(.failures))]
    Incomplete { failures: Vec<StepFailure> },
}

fn summarize(failures: &[StepFailure]) -> String {
    failures.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

impl EmitError {
    /// Names of the steps that failed, for `Incomplete`.
    pub fn failed_steps(&self) -> Vec<&'static str> {
        match self {
            EmitError::Incomplete { failures } => failures.iter().map(|f| f.step).collect(),
            _ => Vec::new(),
        }
    }
}
