//! Provide the shared, pure vocabulary for the mkgen makefile generator.
//!
//! This crate is intentionally small and dependency-free. It holds the pieces that every part of the generator (and
//! any tooling around it) must agree on:
//! - the make variable names the emitted scripts define or reference,
//! - directory and file naming conventions (`obj/<config>`, `.o`/`.d` suffixes, shell discriminators),
//! - the C/C++ source-extension table and the object-file naming rule.
//!
//! ## Notes
//!
//! - This is a "vocabulary" crate: **no IO**, no global state, no project-model types.

pub mod lang;
pub mod paths;
