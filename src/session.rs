//! Session: drives the emission pipeline for each project.
//!
//! The session owns every output stream. It creates one stream per project, hands it to the pipeline, and
//! decides what a failure means:
//! - stream creation failure: the project is skipped, nothing else runs;
//! - a step failure: recorded, the remaining steps still run, and the project result is
//!   [`EmitError::Incomplete`];
//! - in atomic mode the makefile is written to a uniquely named temp file in the same directory, synced, and only
//!   renamed over the real file on success.
//!
//! ## Makefile naming
//!
//! A project writes `<dir>/Makefile`, unless another project in the same manifest resolves to the same directory;
//! then each of them writes `<dir>/<project>.make`.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use mkgen_core::lang::conventions;
use tempfile::NamedTempFile;

use crate::classify::{CppClassifier, PathClassifier, compile_units, find_object_collision};
use crate::config::GeneratorConfig;
use crate::emit::{EmitError, MakeWriter, Pipeline, ProjectContext, StepFailure};
use crate::model::{Manifest, Project};

/// Summary of one successfully emitted makefile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitReport {
    /// Where the makefile was written; `None` when rendered in memory
    pub path: Option<PathBuf>,
    pub lines: usize,
}

/// Result of generating one project's makefile.
#[derive(Debug)]
pub struct ProjectOutcome {
    pub project: String,
    pub path: PathBuf,
    pub result: Result<EmitReport, EmitError>,
}

/// Drives makefile emission
pub struct Session {
    config: GeneratorConfig,
    pipeline: Pipeline,
    classifier: Box<dyn PathClassifier>,
}

impl Session {
    /// Create a session with the standard pipeline and the C/C++ classifier
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            pipeline: Pipeline::standard(),
            classifier: Box::new(CppClassifier),
        }
    }

    /// Replace the step pipeline
    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// Replace the source classifier
    pub fn with_classifier(mut self, classifier: impl PathClassifier + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Reject projects where two sources would compile to the same object file.
    pub fn check_project(&self, project: &Project) -> Result<(), EmitError> {
        let units = compile_units(self.classifier.as_ref(), &project.files);
        match find_object_collision(&units) {
            Some(collision) => Err(EmitError::ObjectCollision {
                project: project.name.clone(),
                object: collision.object,
                first: collision.first,
                second: collision.second,
            }),
            None => Ok(()),
        }
    }

    /// Run the pipeline for `project` into `sink`.
    pub fn emit_project(&self, project: &Project, sink: &mut dyn Write) -> Result<EmitReport, EmitError> {
        self.check_project(project)?;
        self.run_pipeline(project, sink)
    }

    /// Run the pipeline for an already checked project.
    fn run_pipeline(&self, project: &Project, sink: &mut dyn Write) -> Result<EmitReport, EmitError> {
        let cx = ProjectContext {
            project,
            classifier: self.classifier.as_ref(),
            layout: &self.config,
        };
        let mut out = MakeWriter::new(sink);
        let mut failures = self.pipeline.run(&cx, &mut out);
        if let Err(source) = out.flush() {
            failures.push(StepFailure {
                step: "flush",
                configuration: None,
                source,
            });
        }

        if failures.is_empty() {
            Ok(EmitReport {
                path: None,
                lines: out.lines_written(),
            })
        } else {
            Err(EmitError::Incomplete { failures })
        }
    }

    /// Render `project`'s makefile into a string.
    pub fn render_project(&self, project: &Project) -> Result<String, EmitError> {
        let mut buf = Vec::new();
        self.emit_project(project, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Create the output stream for a makefile at `path`.
    pub fn create_stream(path: &Path) -> Result<BufWriter<File>, EmitError> {
        File::create(path)
            .map(BufWriter::new)
            .map_err(|source| EmitError::Create {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Write `project`'s makefile to `path`.
    pub fn write_project(&self, project: &Project, path: &Path) -> Result<EmitReport, EmitError> {
        // Nothing is created for a project that cannot produce a valid makefile.
        self.check_project(project)?;

        let report = if self.config.atomic_writes {
            self.write_atomic(project, path)?
        } else {
            let mut stream = Self::create_stream(path)?;
            self.run_pipeline(project, &mut stream)?
        };

        tracing::info!(project = %project.name, path = %path.display(), lines = report.lines, "wrote makefile");
        Ok(EmitReport {
            path: Some(path.to_path_buf()),
            lines: report.lines,
        })
    }

    /// Emit into a uniquely named temp file next to `path`, fsync it, then rename it over `path`.
    ///
    /// On any failure the temp file is dropped and removed; an existing makefile at `path` is left untouched.
    fn write_atomic(&self, project: &Project, path: &Path) -> Result<EmitReport, EmitError> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir).map_err(|source| EmitError::Create {
            path: dir.to_path_buf(),
            source,
        })?;

        let report = {
            let mut stream = BufWriter::new(tmp.as_file_mut());
            self.run_pipeline(project, &mut stream)?
        };

        tmp.as_file().sync_all().map_err(|source| EmitError::Incomplete {
            failures: vec![StepFailure {
                step: "sync",
                configuration: None,
                source,
            }],
        })?;

        tmp.persist(path).map_err(|err| {
            let from = err.file.path().to_path_buf();
            EmitError::Rename {
                from,
                to: path.to_path_buf(),
                source: err.error,
            }
        })?;
        Ok(report)
    }

    /// Directory a project's makefile is written into.
    pub fn project_dir(&self, project: &Project) -> PathBuf {
        match &self.config.output_dir {
            Some(dir) => dir.clone(),
            None => self.config.base_dir.join(project.location()),
        }
    }

    /// Makefile path for every project in `manifest`, in manifest order.
    pub fn makefile_paths(&self, manifest: &Manifest) -> Vec<PathBuf> {
        let dirs: Vec<PathBuf> = manifest.projects.iter().map(|p| self.project_dir(p)).collect();
        let mut sharing: HashMap<&Path, usize> = HashMap::new();
        for dir in &dirs {
            *sharing.entry(dir.as_path()).or_default() += 1;
        }

        manifest
            .projects
            .iter()
            .zip(&dirs)
            .map(|(project, dir)| {
                if sharing.get(dir.as_path()).copied().unwrap_or(0) > 1 {
                    dir.join(format!("{}.{}", project.name, conventions::PROJECT_MAKEFILE_EXT))
                } else {
                    dir.join(conventions::DEFAULT_MAKEFILE)
                }
            })
            .collect()
    }

    /// Write a makefile for every project. Each project gets its own stream; one failing project does not stop
    /// the others.
    pub fn generate(&self, manifest: &Manifest) -> Vec<ProjectOutcome> {
        manifest
            .projects
            .iter()
            .zip(self.makefile_paths(manifest))
            .map(|(project, path)| {
                let result = self.write_project(project, &path);
                if let Err(err) = &result {
                    tracing::error!(project = %project.name, path = %path.display(), error = %err, "makefile generation failed");
                }
                ProjectOutcome {
                    project: project.name.clone(),
                    path,
                    result,
                }
            })
            .collect()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Configuration;
    use std::fs;
    use std::io;

    fn project(name: &str) -> Project {
        Project::new(name)
            .with_configuration(Configuration::new("Debug"))
            .with_files(["main.cpp"])
    }

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mkgen_session_{}_{}", tag, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    // ========================================
    // Naming tests
    // ========================================

    #[test]
    fn test_single_project_gets_makefile() {
        let session = Session::default();
        let manifest = Manifest::new(vec![project("app")]);
        assert_eq!(session.makefile_paths(&manifest), vec![PathBuf::from("./Makefile")]);
    }

    #[test]
    fn test_shared_location_gets_project_makefiles() {
        let session = Session::default();
        let manifest = Manifest::new(vec![
            project("app"),
            project("lib"),
            project("tool").with_location("tools"),
        ]);
        assert_eq!(
            session.makefile_paths(&manifest),
            vec![
                PathBuf::from("./app.make"),
                PathBuf::from("./lib.make"),
                PathBuf::from("./tools/Makefile"),
            ]
        );
    }

    #[test]
    fn test_output_dir_overrides_locations() {
        let session = Session::new(GeneratorConfig::new().with_output_dir("build"));
        let manifest = Manifest::new(vec![project("app"), project("tool").with_location("tools")]);
        assert_eq!(
            session.makefile_paths(&manifest),
            vec![PathBuf::from("build/app.make"), PathBuf::from("build/tool.make")]
        );
    }

    // ========================================
    // Emission tests
    // ========================================

    #[test]
    fn test_object_collision_rejected() {
        let session = Session::default();
        let project = project("app").with_files(["lib/main.c"]);
        let err = session.render_project(&project).unwrap_err();
        assert!(matches!(err, EmitError::ObjectCollision { ref object, .. } if object == "$(OBJDIR)/main.o"));
    }

    #[test]
    fn test_render_counts_lines() {
        let session = Session::default();
        let mut buf = Vec::new();
        let report = session.emit_project(&project("app"), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(report.lines, text.lines().count());
        assert!(report.path.is_none());
    }

    #[test]
    fn test_flush_failure_reported() {
        struct NoFlush(Vec<u8>);
        impl Write for NoFlush {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.extend_from_slice(buf);
                Ok(buf.len())
            }
            fn flush(&mut self) -> io::Result<()> {
                Err(io::Error::other("flush failed"))
            }
        }

        let session = Session::default();
        let mut sink = NoFlush(Vec::new());
        let err = session.emit_project(&project("app"), &mut sink).unwrap_err();
        assert_eq!(err.failed_steps(), vec!["flush"]);
    }

    // ========================================
    // File output tests
    // ========================================

    #[test]
    fn test_create_stream_missing_directory() {
        let err = Session::create_stream(Path::new("/nonexistent/mkgen/dir/Makefile")).unwrap_err();
        assert!(matches!(err, EmitError::Create { .. }));
    }

    #[test]
    fn test_write_project_creates_file() {
        let dir = temp_dir("write");
        let path = dir.join("Makefile");
        let session = Session::default();
        let report = session.write_project(&project("app"), &path).unwrap();
        assert_eq!(report.path.as_deref(), Some(path.as_path()));
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, session.render_project(&project("app")).unwrap());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_file() {
        let dir = temp_dir("atomic");
        let path = dir.join("Makefile");
        let session = Session::new(GeneratorConfig::new().with_atomic_writes(true));
        session.write_project(&project("app"), &path).unwrap();
        assert_eq!(entries(&dir), vec!["Makefile"]);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            session.render_project(&project("app")).unwrap()
        );
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_atomic_failure_keeps_previous_makefile() {
        use crate::emit::{ProjectStep, Stage};

        struct Failing;
        impl ProjectStep for Failing {
            fn name(&self) -> &'static str {
                "failing"
            }
            fn emit(&self, _cx: &ProjectContext<'_>, out: &mut MakeWriter<'_>) -> io::Result<()> {
                out.line("partial")?;
                Err(io::Error::other("disk full"))
            }
        }

        let dir = temp_dir("atomic_fail");
        let path = dir.join("Makefile");
        fs::write(&path, "previous\n").unwrap();

        let session = Session::new(GeneratorConfig::new().with_atomic_writes(true))
            .with_pipeline(Pipeline::new(vec![Stage::Project(Box::new(Failing))], Vec::new()));
        let err = session.write_project(&project("app"), &path).unwrap_err();
        assert_eq!(err.failed_steps(), vec!["failing"]);
        assert_eq!(fs::read_to_string(&path).unwrap(), "previous\n");
        assert_eq!(entries(&dir), vec!["Makefile"]);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_atomic_write_keeps_unrelated_tmp_file() {
        let dir = temp_dir("atomic_tmp");
        let path = dir.join("Makefile");
        let user_file = dir.join("Makefile.tmp");
        fs::write(&user_file, "user data\n").unwrap();

        let session = Session::new(GeneratorConfig::new().with_atomic_writes(true));
        session.write_project(&project("app"), &path).unwrap();
        assert_eq!(fs::read_to_string(&user_file).unwrap(), "user data\n");
        assert!(fs::read_to_string(&path).unwrap().starts_with(conventions::SIGNATURE));
        assert_eq!(entries(&dir), vec!["Makefile", "Makefile.tmp"]);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_atomic_write_missing_directory() {
        let session = Session::new(GeneratorConfig::new().with_atomic_writes(true));
        let err = session
            .write_project(&project("app"), Path::new("/nonexistent/mkgen/dir/Makefile"))
            .unwrap_err();
        assert!(matches!(err, EmitError::Create { .. }));
    }

    #[test]
    fn test_write_project_classifies_each_file_once_per_pass() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        struct Counting(Arc<AtomicUsize>);
        impl PathClassifier for Counting {
            fn is_source(&self, path: &str) -> bool {
                self.0.fetch_add(1, Ordering::SeqCst);
                CppClassifier.is_source(path)
            }
            fn object_name(&self, path: &str) -> String {
                CppClassifier.object_name(path)
            }
        }

        let dir = temp_dir("passes");
        let calls = Arc::new(AtomicUsize::new(0));
        let session = Session::default().with_classifier(Counting(Arc::clone(&calls)));
        session.write_project(&project("app"), &dir.join("Makefile")).unwrap();
        // collision check, OBJECTS list, compile rules
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_collision_creates_no_file() {
        let dir = temp_dir("collision");
        let path = dir.join("Makefile");
        let session = Session::default();
        let colliding = project("app").with_files(["other/main.cpp"]);
        assert!(matches!(
            session.write_project(&colliding, &path),
            Err(EmitError::ObjectCollision { .. })
        ));
        assert!(!path.exists());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_generate_reports_each_project() {
        let dir = temp_dir("generate");
        let session = Session::new(GeneratorConfig::new().with_base_dir(&dir));
        let manifest = Manifest::new(vec![project("app"), project("broken").with_location("missing/dir")]);

        let outcomes = session.generate(&manifest);
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].result.is_ok());
        assert_eq!(outcomes[0].path, dir.join(".").join("Makefile"));
        assert!(matches!(outcomes[1].result, Err(EmitError::Create { .. })));
        let _ = fs::remove_dir_all(&dir);
    }
}
