//! Link target and dependency include.

use std::io;

use mkgen_core::lang::variables::{VariableId, reference};

use super::lines;
use super::{MakeWriter, ProjectContext, ProjectStep};

/// `$(OUTFILE)` rule linking every object. Written once per project; the variables it names take their values from
/// whichever configuration block `$(CONFIG)` selects.
pub struct LinkTarget;

impl ProjectStep for LinkTarget {
    fn name(&self) -> &'static str {
        "target"
    }

    fn emit(&self, cx: &ProjectContext<'_>, out: &mut MakeWriter<'_>) -> io::Result<()> {
        let outfile = reference(VariableId::OutFile);
        let prerequisites = [
            reference(VariableId::OutDir),
            reference(VariableId::ObjDir),
            reference(VariableId::Objects),
            reference(VariableId::LdDeps),
            reference(VariableId::Resources),
        ];
        let prerequisites: Vec<&str> = prerequisites.iter().map(String::as_str).collect();
        let link = format!(
            "{} -o $@ {} {} {} {}",
            reference(VariableId::Cxx),
            reference(VariableId::LdFlags),
            reference(VariableId::ArchFlags),
            reference(VariableId::Objects),
            reference(VariableId::Resources),
        );

        out.line(&lines::rule(&outfile, &prerequisites))?;
        out.tabbed(&lines::echo(&format!("Linking {}", cx.project.name)))?;
        out.tabbed(&lines::silent(&link))?;
        out.blank()
    }
}

/// `-include` of the `.d` files written by `-MMD`; missing files are ignored by make.
pub struct IncludeDependencies;

impl ProjectStep for IncludeDependencies {
    fn name(&self) -> &'static str {
        "include_dependencies"
    }

    fn emit(&self, _cx: &ProjectContext<'_>, out: &mut MakeWriter<'_>) -> io::Result<()> {
        out.line(&lines::include_dependencies())
    }
}
