//! Make vocabulary registries.
//!
//! This module is the "front door" for names that appear verbatim in generated makefiles: variables the generator
//! assigns, variables it only references, and the fixed conventions used to build paths and rules.
//!
//! ## Notes
//! - Registries are **pure**: no IO, no side effects.
//!
//! ## Examples
//! ```rust
//! use mkgen_core::lang::variables::{self, VariableId};
//!
//! assert_eq!(variables::from_str("OBJDIR"), Some(VariableId::ObjDir));
//! assert_eq!(variables::as_str(VariableId::ObjDir), "OBJDIR");
//! ```

pub mod conventions;
pub mod variables;
