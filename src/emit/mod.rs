//! Makefile emission steps
//!
//! A makefile is produced by running an ordered [`Pipeline`] of small steps against one project. Each step writes
//! zero or more lines and knows nothing about the others; the only shared inputs are the project model and the
//! fixed make vocabulary in `mkgen_core`.
//!
//! ## Module Organization
//!
//! - `writer` - line-oriented writer over any `io::Write`
//! - `lines` - the makefile line grammar (pure string templates)
//! - `structure` - signature, conditionals, phony/clean/mkdir rules
//! - `variables` - the nine per-configuration variable definitions
//! - `lists` - OBJECTS, RESOURCES and per-source compile rules
//! - `target` - link rule and dependency include
//! - `errors` - emission error types
//!
//! ## Standard order
//!
//! ```text
//! signature
//! for each configuration: ifeq, CPPFLAGS CFLAGS CXXFLAGS LDFLAGS LDDEPS RESFLAGS OBJDIR OUTDIR OUTFILE, endif
//! .PHONY, clean, mkdir
//! OBJECTS, RESOURCES
//! compile rules
//! link target
//! -include dependencies
//! ```

pub mod errors;
pub mod lines;
pub mod lists;
pub mod structure;
pub mod target;
pub mod variables;
pub mod writer;

pub use errors::{EmitError, StepFailure};
pub use writer::MakeWriter;

use std::io;

use mkgen_core::lang::variables::CONFIGURATION_VARIABLES;

use crate::classify::PathClassifier;
use crate::config::GeneratorConfig;
use crate::model::{Configuration, Project};

/// Inputs shared by every project-level step.
pub struct ProjectContext<'a> {
    pub project: &'a Project,
    pub classifier: &'a dyn PathClassifier,
    pub layout: &'a GeneratorConfig,
}

/// Inputs for a step that runs once per configuration.
pub struct ConfigContext<'a> {
    pub project: &'a Project,
    pub configuration: &'a Configuration,
    pub layout: &'a GeneratorConfig,
}

/// A step that runs once per project.
pub trait ProjectStep {
    /// Stable name used in logs and error reports
    fn name(&self) -> &'static str;

    fn emit(&self, cx: &ProjectContext<'_>, out: &mut MakeWriter<'_>) -> io::Result<()>;
}

/// A step that runs once per configuration, inside that configuration's block.
pub trait ConfigStep {
    /// Stable name used in logs and error reports
    fn name(&self) -> &'static str;

    fn emit(&self, cx: &ConfigContext<'_>, out: &mut MakeWriter<'_>) -> io::Result<()>;
}

/// One position in the project-level sequence.
pub enum Stage {
    Project(Box<dyn ProjectStep>),
    /// Run the configuration steps once per configuration, in project order
    Configurations,
}

/// Ordered steps that produce a makefile.
pub struct Pipeline {
    stages: Vec<Stage>,
    config_steps: Vec<Box<dyn ConfigStep>>,
}

impl Pipeline {
    pub fn new(stages: Vec<Stage>, config_steps: Vec<Box<dyn ConfigStep>>) -> Self {
        Self { stages, config_steps }
    }

    /// The standard GNU make pipeline.
    pub fn standard() -> Self {
        let stages = vec![
            Stage::Project(Box::new(structure::Signature)),
            Stage::Configurations,
            Stage::Project(Box::new(structure::PhonyRule)),
            Stage::Project(Box::new(structure::CleanRules)),
            Stage::Project(Box::new(structure::MkdirRules)),
            Stage::Project(Box::new(lists::Objects)),
            Stage::Project(Box::new(lists::Resources)),
            Stage::Project(Box::new(lists::SourceRules)),
            Stage::Project(Box::new(target::LinkTarget)),
            Stage::Project(Box::new(target::IncludeDependencies)),
        ];
        let mut config_steps: Vec<Box<dyn ConfigStep>> = vec![Box::new(structure::ConfigConditional)];
        config_steps.extend(
            CONFIGURATION_VARIABLES
                .iter()
                .filter_map(|&id| variables::step_for(id)),
        );
        config_steps.push(Box::new(structure::ConfigEnd));
        Self::new(stages, config_steps)
    }

    /// Names of the project-level steps in order (`configurations` marks the block position).
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages
            .iter()
            .map(|stage| match stage {
                Stage::Project(step) => step.name(),
                Stage::Configurations => "configurations",
            })
            .collect()
    }

    /// Names of the per-configuration steps in order.
    pub fn config_step_names(&self) -> Vec<&'static str> {
        self.config_steps.iter().map(|step| step.name()).collect()
    }

    /// Run every step against `project`.
    ///
    /// A step that fails is recorded and the remaining steps still run. Returns the failures, empty on success.
    pub fn run(&self, cx: &ProjectContext<'_>, out: &mut MakeWriter<'_>) -> Vec<StepFailure> {
        let mut failures = Vec::new();

        for stage in &self.stages {
            match stage {
                Stage::Project(step) => {
                    tracing::debug!(project = %cx.project.name, step = step.name(), "emitting");
                    if let Err(source) = step.emit(cx, out) {
                        tracing::warn!(project = %cx.project.name, step = step.name(), error = %source, "step failed");
                        failures.push(StepFailure {
                            step: step.name(),
                            configuration: None,
                            source,
                        });
                    }
                }
                Stage::Configurations => {
                    for configuration in &cx.project.configurations {
                        let ccx = ConfigContext {
                            project: cx.project,
                            configuration,
                            layout: cx.layout,
                        };
                        self.run_configuration(&ccx, out, &mut failures);
                    }
                }
            }
        }

        failures
    }

    fn run_configuration(&self, cx: &ConfigContext<'_>, out: &mut MakeWriter<'_>, failures: &mut Vec<StepFailure>) {
        for step in &self.config_steps {
            tracing::debug!(
                project = %cx.project.name,
                configuration = %cx.configuration.name,
                step = step.name(),
                "emitting"
            );
            if let Err(source) = step.emit(cx, out) {
                tracing::warn!(
                    project = %cx.project.name,
                    configuration = %cx.configuration.name,
                    step = step.name(),
                    error = %source,
                    "step failed"
                );
                failures.push(StepFailure {
                    step: step.name(),
                    configuration: Some(cx.configuration.name.clone()),
                    source,
                });
            }
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::standard()
    }
}
