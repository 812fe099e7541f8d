//! Fixed-text structural steps: signature, configuration conditionals, phony, clean and mkdir rules.
//!
//! Clean and mkdir recipes branch on `$(SHELLTYPE)`: POSIX shells get `rm`/`$(MKDIR)`, anything else gets the
//! Windows `cmd` spellings. The `SYS_*` variables carry host-syntax paths and are defined by the caller's
//! top-level makefile.

use std::io;

use mkgen_core::lang::conventions;
use mkgen_core::lang::variables::{VariableId, reference};

use super::lines;
use super::{ConfigContext, ConfigStep, MakeWriter, ProjectContext, ProjectStep};

/// Generation banner.
pub struct Signature;

impl ProjectStep for Signature {
    fn name(&self) -> &'static str {
        "signature"
    }

    fn emit(&self, _cx: &ProjectContext<'_>, out: &mut MakeWriter<'_>) -> io::Result<()> {
        out.line(conventions::SIGNATURE)?;
        out.blank()
    }
}

/// Opens a configuration block: `ifeq ($(CONFIG),<name>)`.
pub struct ConfigConditional;

impl ConfigStep for ConfigConditional {
    fn name(&self) -> &'static str {
        "config_conditional"
    }

    fn emit(&self, cx: &ConfigContext<'_>, out: &mut MakeWriter<'_>) -> io::Result<()> {
        out.line(&lines::config_conditional(&cx.configuration.name))
    }
}

/// Closes a configuration block.
pub struct ConfigEnd;

impl ConfigStep for ConfigEnd {
    fn name(&self) -> &'static str {
        "config_end"
    }

    fn emit(&self, _cx: &ConfigContext<'_>, out: &mut MakeWriter<'_>) -> io::Result<()> {
        out.line(lines::ENDIF)?;
        out.blank()
    }
}

/// `.PHONY: clean`
pub struct PhonyRule;

impl ProjectStep for PhonyRule {
    fn name(&self) -> &'static str {
        "phony_rule"
    }

    fn emit(&self, _cx: &ProjectContext<'_>, out: &mut MakeWriter<'_>) -> io::Result<()> {
        out.line(&lines::phony(&[conventions::CLEAN_TARGET]))?;
        out.blank()
    }
}

/// `clean:` removing the output file and the object directory.
pub struct CleanRules;

impl ProjectStep for CleanRules {
    fn name(&self) -> &'static str {
        "clean_rules"
    }

    fn emit(&self, cx: &ProjectContext<'_>, out: &mut MakeWriter<'_>) -> io::Result<()> {
        let outfile = reference(VariableId::SysOutFile);
        let objdir = reference(VariableId::SysObjDir);

        out.line(&lines::rule(conventions::CLEAN_TARGET, &[]))?;
        out.tabbed(&lines::echo(&format!("Cleaning {}", cx.project.name)))?;
        out.line(&lines::posix_shell_conditional())?;
        out.tabbed(&lines::silent(&format!("rm -f  {}", outfile)))?;
        out.tabbed(&lines::silent(&format!("rm -rf {}", objdir)))?;
        out.line(lines::ELSE)?;
        out.tabbed(&lines::silent(&format!("if exist {0} del {0}", outfile)))?;
        out.tabbed(&lines::silent(&format!("if exist {0} rmdir /s /q {0}", objdir)))?;
        out.line(lines::ENDIF)?;
        out.blank()
    }
}

/// Rules creating `$(OUTDIR)` and `$(OBJDIR)` on demand.
pub struct MkdirRules;

impl ProjectStep for MkdirRules {
    fn name(&self) -> &'static str {
        "mkdir_rules"
    }

    fn emit(&self, _cx: &ProjectContext<'_>, out: &mut MakeWriter<'_>) -> io::Result<()> {
        for (dir, sys_dir) in [
            (VariableId::OutDir, VariableId::SysOutDir),
            (VariableId::ObjDir, VariableId::SysObjDir),
        ] {
            let dir = reference(dir);
            out.line(&lines::rule(&dir, &[]))?;
            out.tabbed(&lines::echo(&format!("Creating {}", dir)))?;
            out.tabbed(&lines::silent(&format!(
                "{} {}",
                reference(VariableId::Mkdir),
                reference(sys_dir)
            )))?;
            out.blank()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::CppClassifier;
    use crate::config::GeneratorConfig;
    use crate::model::{Configuration, Project};

    fn project() -> Project {
        Project::new("hello").with_configuration(Configuration::new("Debug"))
    }

    fn render_project(step: &dyn ProjectStep) -> String {
        let project = project();
        let layout = GeneratorConfig::default();
        let cx = ProjectContext {
            project: &project,
            classifier: &CppClassifier,
            layout: &layout,
        };
        let mut buf = Vec::new();
        step.emit(&cx, &mut MakeWriter::new(&mut buf)).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn render_config(step: &dyn ConfigStep) -> String {
        let project = project();
        let layout = GeneratorConfig::default();
        let cx = ConfigContext {
            project: &project,
            configuration: &project.configurations[0],
            layout: &layout,
        };
        let mut buf = Vec::new();
        step.emit(&cx, &mut MakeWriter::new(&mut buf)).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_signature() {
        assert_eq!(render_project(&Signature), "# GNU Makefile autogenerated by mkgen\n\n");
    }

    #[test]
    fn test_config_block_delimiters() {
        assert_eq!(render_config(&ConfigConditional), "ifeq ($(CONFIG),Debug)\n");
        assert_eq!(render_config(&ConfigEnd), "endif\n\n");
    }

    #[test]
    fn test_phony_rule() {
        assert_eq!(render_project(&PhonyRule), ".PHONY: clean\n\n");
    }

    #[test]
    fn test_clean_rules() {
        let expected = "\
clean:
\t@echo Cleaning hello
ifeq (posix, $(SHELLTYPE))
\t@rm -f  $(SYS_OUTFILE)
\t@rm -rf $(SYS_OBJDIR)
else
\t@if exist $(SYS_OUTFILE) del $(SYS_OUTFILE)
\t@if exist $(SYS_OBJDIR) rmdir /s /q $(SYS_OBJDIR)
endif

";
        assert_eq!(render_project(&CleanRules), expected);
    }

    #[test]
    fn test_mkdir_rules() {
        let expected = "\
$(OUTDIR):
\t@echo Creating $(OUTDIR)
\t@$(MKDIR) $(SYS_OUTDIR)

$(OBJDIR):
\t@echo Creating $(OBJDIR)
\t@$(MKDIR) $(SYS_OBJDIR)

";
        assert_eq!(render_project(&MkdirRules), expected);
    }
}
