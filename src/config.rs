//! Generator configuration
//!
//! Layout knobs for emitted text plus where and how makefiles are written.

use std::path::{Path, PathBuf};

/// Generator configuration
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Spaces before each per-configuration variable line
    pub variable_indent: usize,
    /// Column width the variable name is padded to before the operator
    pub variable_width: usize,
    /// Write to a temp file and rename into place only when every step succeeded
    pub atomic_writes: bool,
    /// Directory that relative project locations are resolved against
    pub base_dir: PathBuf,
    /// Write every makefile here instead of into each project's location
    pub output_dir: Option<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        // `   CPPFLAGS += ...` layout used by Premake-style makefiles
        Self {
            variable_indent: 3,
            variable_width: 8,
            atomic_writes: false,
            base_dir: PathBuf::from("."),
            output_dir: None,
        }
    }
}

impl GeneratorConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indentation of variable lines
    pub fn with_variable_indent(mut self, indent: usize) -> Self {
        self.variable_indent = indent;
        self
    }

    /// Set the alignment width of variable names
    pub fn with_variable_width(mut self, width: usize) -> Self {
        self.variable_width = width;
        self
    }

    /// Enable or disable write-to-temp-then-rename
    pub fn with_atomic_writes(mut self, atomic: bool) -> Self {
        self.atomic_writes = atomic;
        self
    }

    /// Set the directory relative project locations are resolved against
    pub fn with_base_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.base_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Redirect every makefile into one directory
    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.output_dir = Some(dir.as_ref().to_path_buf());
        self
    }
}
