//! Define the make variable vocabulary used by generated makefiles.
//!
//! Every variable a generated makefile mentions is listed here: a stable identifier ([`VariableId`]) plus a const
//! metadata table ([`VARIABLES`]) recording the spelling, who defines the variable, and (for generator-defined
//! variables) the assignment operator.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**; make variable names are.
//! - [`CONFIGURATION_VARIABLES`] fixes the order in which per-configuration variables are written.
//!
//! ## Examples
//! ```rust
//! use mkgen_core::lang::variables::{self, AssignOp, VariableId};
//!
//! assert_eq!(variables::info(VariableId::CppFlags).op, Some(AssignOp::Append));
//! assert_eq!(variables::reference(VariableId::OutDir), "$(OUTDIR)");
//! ```

/// Stable identifier for every make variable the generator writes or references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableId {
    // Per-configuration, defined by the generator
    CppFlags,
    CFlags,
    CxxFlags,
    LdFlags,
    LdDeps,
    ResFlags,
    ObjDir,
    OutDir,
    OutFile,

    // Per-project, defined by the generator
    Objects,
    Resources,

    // Supplied by the companion top-level makefile or the environment
    Config,
    ShellType,
    SysOutFile,
    SysObjDir,
    SysOutDir,
    Mkdir,
    Cxx,
    ArchFlags,
}

/// How the generator assigns a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    /// `:=` (simply expanded, fixed at parse time)
    Immediate,
    /// `+=` (append to whatever an earlier block contributed)
    Append,
}

impl AssignOp {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignOp::Immediate => ":=",
            AssignOp::Append => "+=",
        }
    }
}

/// Where a variable's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableScope {
    /// Written once per configuration, inside an `ifeq ($(CONFIG),...)` block.
    Configuration,
    /// Written once per project, outside any conditional.
    Project,
    /// Referenced only; defined by an external collaborator.
    External,
}

/// Metadata for a make variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableInfo {
    pub id: VariableId,
    pub name: &'static str,
    pub scope: VariableScope,
    /// Operator used when the generator assigns it; `None` for external variables.
    pub op: Option<AssignOp>,
}

const fn var(id: VariableId, name: &'static str, scope: VariableScope, op: Option<AssignOp>) -> VariableInfo {
    VariableInfo { id, name, scope, op }
}

use AssignOp::{Append, Immediate};
use VariableScope::{Configuration, External, Project};

/// Registry of every known make variable.
pub const VARIABLES: &[VariableInfo] = &[
    var(VariableId::CppFlags, "CPPFLAGS", Configuration, Some(Append)),
    var(VariableId::CFlags, "CFLAGS", Configuration, Some(Append)),
    var(VariableId::CxxFlags, "CXXFLAGS", Configuration, Some(Append)),
    var(VariableId::LdFlags, "LDFLAGS", Configuration, Some(Append)),
    var(VariableId::LdDeps, "LDDEPS", Configuration, Some(Immediate)),
    var(VariableId::ResFlags, "RESFLAGS", Configuration, Some(Append)),
    var(VariableId::ObjDir, "OBJDIR", Configuration, Some(Immediate)),
    var(VariableId::OutDir, "OUTDIR", Configuration, Some(Immediate)),
    var(VariableId::OutFile, "OUTFILE", Configuration, Some(Immediate)),
    var(VariableId::Objects, "OBJECTS", Project, Some(Immediate)),
    var(VariableId::Resources, "RESOURCES", Project, Some(Immediate)),
    var(VariableId::Config, "CONFIG", External, None),
    var(VariableId::ShellType, "SHELLTYPE", External, None),
    var(VariableId::SysOutFile, "SYS_OUTFILE", External, None),
    var(VariableId::SysObjDir, "SYS_OBJDIR", External, None),
    var(VariableId::SysOutDir, "SYS_OUTDIR", External, None),
    var(VariableId::Mkdir, "MKDIR", External, None),
    var(VariableId::Cxx, "CXX", External, None),
    var(VariableId::ArchFlags, "ARCHFLAGS", External, None),
];

/// Per-configuration variables in the order they are written inside a configuration block.
pub const CONFIGURATION_VARIABLES: &[VariableId] = &[
    VariableId::CppFlags,
    VariableId::CFlags,
    VariableId::CxxFlags,
    VariableId::LdFlags,
    VariableId::LdDeps,
    VariableId::ResFlags,
    VariableId::ObjDir,
    VariableId::OutDir,
    VariableId::OutFile,
];

/// Look up a variable by its exact spelling.
pub fn from_str(name: &str) -> Option<VariableId> {
    VARIABLES.iter().find(|v| v.name == name).map(|v| v.id)
}

/// Metadata for a variable.
pub fn info(id: VariableId) -> &'static VariableInfo {
    // Every VariableId has exactly one table row (checked by the registry tests).
    match VARIABLES.iter().find(|v| v.id == id) {
        Some(info) => info,
        None => unreachable!("variable {:?} missing from VARIABLES", id),
    }
}

/// Spelling of a variable.
pub fn as_str(id: VariableId) -> &'static str {
    info(id).name
}

/// Reference syntax for a variable (`$(NAME)`).
pub fn reference(id: VariableId) -> String {
    format!("$({})", as_str(id))
}
