#![forbid(unsafe_code)]
//! mkgen: GNU Makefile generator
//!
//! Renders one make-compatible build script per project from a JSON project manifest. The emitted scripts define
//! per-configuration variables inside `ifeq ($(CONFIG),...)` blocks, compile every C/C++ source into
//! `obj/<config>/`, and link the result, with clean and mkdir rules that work under both POSIX shells and Windows
//! `cmd`.
//!
//! ## Layout
//!
//! - [`model`] - project model and manifest loading
//! - [`classify`] - source classification and object naming
//! - [`emit`] - the makefile emission steps and the pipeline that orders them
//! - [`session`] - drives the pipeline for each project and owns the output streams
//! - [`cli`] - the `mkgen` command-line interface
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod classify;
pub mod cli;
pub mod config;
pub mod emit;
pub mod model;
pub mod session;

pub use classify::{CppClassifier, PathClassifier};
pub use config::GeneratorConfig;
pub use emit::{EmitError, Pipeline};
pub use model::{Configuration, Manifest, ManifestError, Project};
pub use session::{EmitReport, ProjectOutcome, Session};
