//! Source classification and object naming
//!
//! The object list and the compile rules must walk the same filtered, ordered file sequence. Both go through
//! [`compile_units`] so they cannot drift apart.

use std::collections::HashMap;

use mkgen_core::paths;

/// Decide which project files are compiled and what object each produces.
pub trait PathClassifier {
    /// Whether `path` is compiled into an object file.
    fn is_source(&self, path: &str) -> bool;

    /// Object file produced from `path`, as written in the makefile.
    fn object_name(&self, path: &str) -> String;
}

/// C, C++ and assembly sources compiled into `$(OBJDIR)/<stem>.o`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CppClassifier;

impl PathClassifier for CppClassifier {
    fn is_source(&self, path: &str) -> bool {
        paths::is_cpp_source(path)
    }

    fn object_name(&self, path: &str) -> String {
        paths::object_filename(path)
    }
}

/// A compilable source paired with the object it produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileUnit<'a> {
    pub source: &'a str,
    pub object: String,
}

/// Compilable files of `files`, in order, with their object names.
pub fn compile_units<'a>(classifier: &dyn PathClassifier, files: &'a [String]) -> Vec<CompileUnit<'a>> {
    files
        .iter()
        .map(String::as_str)
        .filter(|path| classifier.is_source(path))
        .map(|source| CompileUnit {
            source,
            object: classifier.object_name(source),
        })
        .collect()
}

/// Two sources that derive the same object name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectCollision {
    pub object: String,
    pub first: String,
    pub second: String,
}

/// Find the first pair of sources whose object names collide.
pub fn find_object_collision(units: &[CompileUnit<'_>]) -> Option<ObjectCollision> {
    let mut owners: HashMap<&str, &str> = HashMap::new();
    for unit in units {
        if let Some(first) = owners.insert(unit.object.as_str(), unit.source) {
            return Some(ObjectCollision {
                object: unit.object.clone(),
                first: first.to_string(),
                second: unit.source.to_string(),
            });
        }
    }
    None
}
