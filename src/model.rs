//! Project model and manifest loading
//!
//! A manifest is a JSON document listing projects:
//!
//! ```json
//! {
//!   "projects": [
//!     {
//!       "name": "hello",
//!       "defines": ["HELLO_STATIC"],
//!       "configurations": [
//!         { "name": "Debug", "defines": ["DEBUG"] },
//!         { "name": "Release", "defines": ["NDEBUG"] }
//!       ],
//!       "files": ["src/main.cpp", "src/hello.h"]
//!     }
//!   ]
//! }
//! ```
//!
//! The emitter treats the model as read-only; everything here is validated once, up front.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Characters that would break a configuration name used as `obj/<name>` or in `ifeq ($(CONFIG),<name>)`.
const UNSAFE_NAME_CHARS: &[char] = &['/', '\\', '$', '(', ')', '#', ':', '=', ',', '"'];

/// Errors raised while loading or validating a manifest
#[derive(Debug, Error, Diagnostic)]
pub enum ManifestError {
    #[error("cannot read manifest '{}': {source}", .path.display())]
    #[diagnostic(code(mkgen::manifest::io))]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid manifest: {0}")]
    #[diagnostic(
        code(mkgen::manifest::json),
        help("a manifest is a JSON object with a `projects` array")
    )]
    Json(#[from] serde_json::Error),

    #[error("manifest declares no projects")]
    #[diagnostic(code(mkgen::manifest::empty))]
    NoProjects,

    #[error("project name is empty")]
    #[diagnostic(code(mkgen::manifest::name))]
    EmptyName,

    #[error("project name '{name}' contains a path separator")]
    #[diagnostic(code(mkgen::manifest::name), help("set `location` to place the makefile in a subdirectory"))]
    UnsafeProjectName { name: String },

    #[error("project '{name}' is declared more than once")]
    #[diagnostic(code(mkgen::manifest::duplicate_project))]
    DuplicateProject { name: String },

    #[error("project '{project}' has no configurations")]
    #[diagnostic(
        code(mkgen::manifest::configurations),
        help("add at least one entry to `configurations`, for example a `Debug` configuration")
    )]
    NoConfigurations { project: String },

    #[error("project '{project}' declares configuration '{name}' more than once")]
    #[diagnostic(code(mkgen::manifest::configurations))]
    DuplicateConfiguration { project: String, name: String },

    #[error("project '{project}' has configuration name '{name}' that is not usable as a directory name")]
    #[diagnostic(
        code(mkgen::manifest::configurations),
        help("configuration names become `obj/<name>`; avoid whitespace, separators and make metacharacters")
    )]
    UnsafeConfigurationName { project: String, name: String },

    #[error("project '{project}' has a control character in {field}: {value:?}")]
    #[diagnostic(
        code(mkgen::manifest::control_character),
        help("manifest strings are written verbatim into makefile lines; remove newlines, tabs and other control characters")
    )]
    ControlCharacter {
        project: String,
        field: &'static str,
        value: String,
    },
}

/// A build configuration (`Debug`, `Release`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Configuration {
    pub name: String,
    /// Preprocessor symbols defined only in this configuration
    #[serde(default)]
    pub defines: Vec<String>,
}

impl Configuration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            defines: Vec::new(),
        }
    }

    pub fn with_defines<I, S>(mut self, defines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.defines.extend(defines.into_iter().map(Into::into));
        self
    }
}

/// A single buildable project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    pub name: String,
    /// Directory the makefile is written into, relative to the manifest
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<PathBuf>,
    /// Linked output file name; defaults to the project name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outfile: Option<String>,
    /// Preprocessor symbols defined in every configuration
    #[serde(default)]
    pub defines: Vec<String>,
    pub configurations: Vec<Configuration>,
    /// Source, header and resource files in build order
    #[serde(default)]
    pub files: Vec<String>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: None,
            outfile: None,
            defines: Vec::new(),
            configurations: Vec::new(),
            files: Vec::new(),
        }
    }

    pub fn with_location(mut self, location: impl AsRef<Path>) -> Self {
        self.location = Some(location.as_ref().to_path_buf());
        self
    }

    pub fn with_outfile(mut self, outfile: impl Into<String>) -> Self {
        self.outfile = Some(outfile.into());
        self
    }

    pub fn with_defines<I, S>(mut self, defines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.defines.extend(defines.into_iter().map(Into::into));
        self
    }

    pub fn with_configuration(mut self, configuration: Configuration) -> Self {
        self.configurations.push(configuration);
        self
    }

    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files.extend(files.into_iter().map(Into::into));
        self
    }

    /// Location relative to the manifest (`.` when unset)
    pub fn location(&self) -> &Path {
        self.location.as_deref().unwrap_or(Path::new("."))
    }

    /// Linked output file name
    pub fn outfile(&self) -> &str {
        self.outfile.as_deref().unwrap_or(&self.name)
    }

    /// Defines in effect for `configuration`: project-wide first, then the configuration's own.
    pub fn effective_defines<'a>(&'a self, configuration: &'a Configuration) -> impl Iterator<Item = &'a str> + 'a {
        self.defines
            .iter()
            .chain(configuration.defines.iter())
            .map(String::as_str)
    }

    /// Check the invariants the emitter relies on.
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.name.trim().is_empty() {
            return Err(ManifestError::EmptyName);
        }
        self.check_text("name", &self.name)?;
        if self.name.contains(['/', '\\']) {
            return Err(ManifestError::UnsafeProjectName {
                name: self.name.clone(),
            });
        }
        if self.configurations.is_empty() {
            return Err(ManifestError::NoConfigurations {
                project: self.name.clone(),
            });
        }

        if let Some(outfile) = &self.outfile {
            self.check_text("outfile", outfile)?;
        }
        for define in &self.defines {
            self.check_text("defines", define)?;
        }
        for file in &self.files {
            self.check_text("files", file)?;
        }

        let mut seen = HashSet::new();
        for configuration in &self.configurations {
            for define in &configuration.defines {
                self.check_text("configuration defines", define)?;
            }
            if !is_safe_configuration_name(&configuration.name) {
                return Err(ManifestError::UnsafeConfigurationName {
                    project: self.name.clone(),
                    name: configuration.name.clone(),
                });
            }
            if !seen.insert(configuration.name.as_str()) {
                return Err(ManifestError::DuplicateConfiguration {
                    project: self.name.clone(),
                    name: configuration.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Reject `value` if it holds a character that would split or corrupt a makefile line.
    fn check_text(&self, field: &'static str, value: &str) -> Result<(), ManifestError> {
        if value.chars().any(char::is_control) {
            return Err(ManifestError::ControlCharacter {
                project: self.name.clone(),
                field,
                value: value.to_string(),
            });
        }
        Ok(())
    }
}

/// Whether a configuration name can be used verbatim as a directory component and make conditional operand.
pub fn is_safe_configuration_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.chars().any(|c| c.is_whitespace() || c.is_control() || UNSAFE_NAME_CHARS.contains(&c))
}

/// Top-level manifest: the set of projects to generate makefiles for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub projects: Vec<Project>,
}

impl Manifest {
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }

    /// Parse and validate a manifest from JSON text.
    pub fn from_json(source: &str) -> Result<Self, ManifestError> {
        let manifest: Manifest = serde_json::from_str(source)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Read, parse and validate a manifest file.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let source = fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = source.len(), "loaded manifest");
        Self::from_json(&source)
    }

    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.projects.is_empty() {
            return Err(ManifestError::NoProjects);
        }
        let mut seen = HashSet::new();
        for project in &self.projects {
            project.validate()?;
            if !seen.insert(project.name.as_str()) {
                return Err(ManifestError::DuplicateProject {
                    name: project.name.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn project(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn debug_project() -> Project {
        Project::new("app").with_configuration(Configuration::new("Debug"))
    }

    // ========================================
    // Accessor tests
    // ========================================

    #[test]
    fn test_outfile_defaults_to_name() {
        assert_eq!(debug_project().outfile(), "app");
        assert_eq!(debug_project().with_outfile("app.exe").outfile(), "app.exe");
    }

    #[test]
    fn test_location_defaults_to_current_dir() {
        assert_eq!(debug_project().location(), Path::new("."));
        assert_eq!(debug_project().with_location("build").location(), Path::new("build"));
    }

    #[test]
    fn test_effective_defines_order() {
        let configuration = Configuration::new("Debug").with_defines(["DEBUG"]);
        let project = Project::new("app")
            .with_defines(["SHARED", "X=1"])
            .with_configuration(configuration.clone());
        let defines: Vec<_> = project.effective_defines(&configuration).collect();
        assert_eq!(defines, vec!["SHARED", "X=1", "DEBUG"]);
    }

    // ========================================
    // Validation tests
    // ========================================

    #[test]
    fn test_valid_project() {
        assert!(debug_project().validate().is_ok());
    }

    #[test]
    fn test_empty_name_rejected() {
        let project = Project::new("  ").with_configuration(Configuration::new("Debug"));
        assert!(matches!(project.validate(), Err(ManifestError::EmptyName)));
    }

    #[test]
    fn test_project_name_with_separator_rejected() {
        let project = Project::new("a/b").with_configuration(Configuration::new("Debug"));
        assert!(matches!(project.validate(), Err(ManifestError::UnsafeProjectName { .. })));
    }

    #[test]
    fn test_no_configurations_rejected() {
        assert!(matches!(
            Project::new("app").validate(),
            Err(ManifestError::NoConfigurations { .. })
        ));
    }

    #[test]
    fn test_duplicate_configuration_rejected() {
        let project = debug_project().with_configuration(Configuration::new("Debug"));
        assert!(matches!(
            project.validate(),
            Err(ManifestError::DuplicateConfiguration { name, .. }) if name == "Debug"
        ));
    }

    #[test]
    fn test_configuration_name_safety() {
        for ok in ["Debug", "Release", "debug-x64", "Dist.2", "a_b"] {
            assert!(is_safe_configuration_name(ok), "{ok}");
        }
        for bad in ["", ".", "..", "My Config", "a/b", "a\\b", "$(X)", "a#b", "a,b", "tab\there"] {
            assert!(!is_safe_configuration_name(bad), "{bad:?}");
        }
    }

    #[test]
    fn test_control_characters_rejected() {
        let cases = [
            ("name", Project::new("app\nall: evil").with_configuration(Configuration::new("Debug"))),
            ("outfile", debug_project().with_outfile("app\r")),
            ("defines", debug_project().with_defines(["A\"\nB"])),
            ("files", debug_project().with_files(["x\ny.cpp"])),
            (
                "configuration defines",
                Project::new("app").with_configuration(Configuration::new("Debug").with_defines(["X\tY"])),
            ),
        ];
        for (expected, project) in cases {
            match project.validate() {
                Err(ManifestError::ControlCharacter { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected ControlCharacter for {expected}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_from_json_rejects_newline_in_name() {
        let result = Manifest::from_json(
            r#"{"projects": [{"name": "app\nall: evil", "configurations": [{"name": "Debug"}], "files": ["main.cpp"]}]}"#,
        );
        assert!(matches!(result, Err(ManifestError::ControlCharacter { field: "name", .. })));
    }

    // ========================================
    // Manifest tests
    // ========================================

    #[test]
    fn test_from_json_minimal() {
        let manifest = Manifest::from_json(
            r#"{"projects": [{"name": "app", "configurations": [{"name": "Debug"}]}]}"#,
        )
        .unwrap();
        let project = &manifest.projects[0];
        assert_eq!(project.name, "app");
        assert!(project.files.is_empty());
        assert!(project.defines.is_empty());
        assert_eq!(project.configurations[0], Configuration::new("Debug"));
    }

    #[test]
    fn test_from_json_rejects_unknown_fields() {
        let result = Manifest::from_json(
            r#"{"projects": [{"name": "app", "kind": "exe", "configurations": [{"name": "Debug"}]}]}"#,
        );
        assert!(matches!(result, Err(ManifestError::Json(_))));
    }

    #[test]
    fn test_from_json_empty_projects() {
        assert!(matches!(
            Manifest::from_json(r#"{"projects": []}"#),
            Err(ManifestError::NoProjects)
        ));
    }

    #[test]
    fn test_duplicate_project_rejected() {
        let manifest = Manifest::new(vec![debug_project(), debug_project()]);
        assert!(matches!(
            manifest.validate(),
            Err(ManifestError::DuplicateProject { name }) if name == "app"
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Manifest::load(Path::new("/nonexistent/mkgen/manifest.json"));
        assert!(matches!(result, Err(ManifestError::Io { .. })));
    }

    #[test]
    fn test_project_lookup() {
        let manifest = Manifest::new(vec![debug_project()]);
        assert!(manifest.project("app").is_some());
        assert!(manifest.project("other").is_none());
    }
}
