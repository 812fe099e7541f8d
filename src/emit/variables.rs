//! Per-configuration variable definitions.
//!
//! Each step writes exactly one aligned line. The operator comes from the variable registry: `:=` for directory
//! and file variables so their value is fixed when the block is parsed, `+=` for flags so a base-flags block can
//! contribute defaults ahead of these.

use std::io;

use mkgen_core::lang::conventions;
use mkgen_core::lang::variables::{self, AssignOp, VariableId, reference};

use super::lines;
use super::{ConfigContext, ConfigStep, MakeWriter};

fn write_variable(cx: &ConfigContext<'_>, out: &mut MakeWriter<'_>, id: VariableId, value: &str) -> io::Result<()> {
    let op = variables::info(id).op.unwrap_or(AssignOp::Immediate);
    out.line(&lines::assignment(cx.layout, id, op, value))
}

/// Step writing `id` inside a configuration block; `None` for variables that are not per-configuration.
pub fn step_for(id: VariableId) -> Option<Box<dyn ConfigStep>> {
    let step: Box<dyn ConfigStep> = match id {
        VariableId::CppFlags => Box::new(CppFlags),
        VariableId::CFlags => Box::new(CFlags),
        VariableId::CxxFlags => Box::new(CxxFlags),
        VariableId::LdFlags => Box::new(LdFlags),
        VariableId::LdDeps => Box::new(LdDeps),
        VariableId::ResFlags => Box::new(ResFlags),
        VariableId::ObjDir => Box::new(ObjDir),
        VariableId::OutDir => Box::new(OutDir),
        VariableId::OutFile => Box::new(OutFile),
        _ => return None,
    };
    Some(step)
}

/// `CPPFLAGS += -MMD -D "<define>" ...`
pub struct CppFlags;

impl ConfigStep for CppFlags {
    fn name(&self) -> &'static str {
        "cppflags"
    }

    fn emit(&self, cx: &ConfigContext<'_>, out: &mut MakeWriter<'_>) -> io::Result<()> {
        let mut value = String::from(conventions::DEPFILE_FLAG);
        for define in cx.project.effective_defines(cx.configuration) {
            value.push_str(&lines::define_flag(define));
        }
        write_variable(cx, out, VariableId::CppFlags, &value)
    }
}

/// `CFLAGS += $(CPPFLAGS) $(ARCHFLAGS)`
pub struct CFlags;

impl ConfigStep for CFlags {
    fn name(&self) -> &'static str {
        "cflags"
    }

    fn emit(&self, cx: &ConfigContext<'_>, out: &mut MakeWriter<'_>) -> io::Result<()> {
        let value = format!(
            "{} {}",
            reference(VariableId::CppFlags),
            reference(VariableId::ArchFlags)
        );
        write_variable(cx, out, VariableId::CFlags, &value)
    }
}

/// `CXXFLAGS += $(CFLAGS)`
pub struct CxxFlags;

impl ConfigStep for CxxFlags {
    fn name(&self) -> &'static str {
        "cxxflags"
    }

    fn emit(&self, cx: &ConfigContext<'_>, out: &mut MakeWriter<'_>) -> io::Result<()> {
        write_variable(cx, out, VariableId::CxxFlags, &reference(VariableId::CFlags))
    }
}

pub struct LdFlags;

impl ConfigStep for LdFlags {
    fn name(&self) -> &'static str {
        "ldflags"
    }

    fn emit(&self, cx: &ConfigContext<'_>, out: &mut MakeWriter<'_>) -> io::Result<()> {
        write_variable(cx, out, VariableId::LdFlags, "")
    }
}

pub struct LdDeps;

impl ConfigStep for LdDeps {
    fn name(&self) -> &'static str {
        "lddeps"
    }

    fn emit(&self, cx: &ConfigContext<'_>, out: &mut MakeWriter<'_>) -> io::Result<()> {
        write_variable(cx, out, VariableId::LdDeps, "")
    }
}

pub struct ResFlags;

impl ConfigStep for ResFlags {
    fn name(&self) -> &'static str {
        "resflags"
    }

    fn emit(&self, cx: &ConfigContext<'_>, out: &mut MakeWriter<'_>) -> io::Result<()> {
        write_variable(cx, out, VariableId::ResFlags, "")
    }
}

/// `OBJDIR := obj/<configuration>`; unique per configuration so objects never collide across configurations.
pub struct ObjDir;

impl ConfigStep for ObjDir {
    fn name(&self) -> &'static str {
        "objdir"
    }

    fn emit(&self, cx: &ConfigContext<'_>, out: &mut MakeWriter<'_>) -> io::Result<()> {
        write_variable(
            cx,
            out,
            VariableId::ObjDir,
            &conventions::objdir_for(&cx.configuration.name),
        )
    }
}

pub struct OutDir;

impl ConfigStep for OutDir {
    fn name(&self) -> &'static str {
        "outdir"
    }

    fn emit(&self, cx: &ConfigContext<'_>, out: &mut MakeWriter<'_>) -> io::Result<()> {
        write_variable(cx, out, VariableId::OutDir, conventions::OUTDIR_VALUE)
    }
}

/// `OUTFILE := $(OUTDIR)/<outfile>`
pub struct OutFile;

impl ConfigStep for OutFile {
    fn name(&self) -> &'static str {
        "outfile"
    }

    fn emit(&self, cx: &ConfigContext<'_>, out: &mut MakeWriter<'_>) -> io::Result<()> {
        let value = format!("{}/{}", reference(VariableId::OutDir), cx.project.outfile());
        write_variable(cx, out, VariableId::OutFile, &value)
    }
}
