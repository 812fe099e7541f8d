//! OBJECTS / RESOURCES lists and per-source compile rules.
//!
//! `Objects` and `SourceRules` both walk [`compile_units`], so the n-th object in the list is the target of the
//! n-th compile rule.

use std::io;

use mkgen_core::lang::variables::{VariableId, reference};
use mkgen_core::paths;

use super::lines;
use super::{MakeWriter, ProjectContext, ProjectStep};
use crate::classify::compile_units;

/// `OBJECTS := \` followed by one continued line per compilable file.
pub struct Objects;

impl ProjectStep for Objects {
    fn name(&self) -> &'static str {
        "objects"
    }

    fn emit(&self, cx: &ProjectContext<'_>, out: &mut MakeWriter<'_>) -> io::Result<()> {
        out.line(&lines::list_open(VariableId::Objects))?;
        for unit in compile_units(cx.classifier, &cx.project.files) {
            out.tabbed(&lines::list_item(&unit.object))?;
        }
        out.blank()
    }
}

/// Empty `RESOURCES := \` list; resource compilation is not generated yet.
pub struct Resources;

impl ProjectStep for Resources {
    fn name(&self) -> &'static str {
        "resources"
    }

    fn emit(&self, _cx: &ProjectContext<'_>, out: &mut MakeWriter<'_>) -> io::Result<()> {
        out.line(&lines::list_open(VariableId::Resources))?;
        out.blank()
    }
}

/// One four-line compile rule per compilable file.
pub struct SourceRules;

impl ProjectStep for SourceRules {
    fn name(&self) -> &'static str {
        "source_rules"
    }

    fn emit(&self, cx: &ProjectContext<'_>, out: &mut MakeWriter<'_>) -> io::Result<()> {
        let compile = format!("{} {} -o $@ -c $<", reference(VariableId::Cxx), reference(VariableId::CxxFlags));
        for unit in compile_units(cx.classifier, &cx.project.files) {
            let source = paths::to_make_path(unit.source);
            out.line(&lines::rule(&unit.object, &[&source]))?;
            out.tabbed(&lines::echo("$(notdir $<)"))?;
            out.tabbed(&lines::silent(&compile))?;
            out.blank()?;
        }
        Ok(())
    }
}
