//! Path helpers shared by the generator: source classification and object naming.
//!
//! Paths here are plain strings in the form they appear in a project manifest. Both `/` and `\` are accepted as
//! separators so manifests written on Windows classify the same way.

use crate::lang::conventions::OBJECT_EXT;
use crate::lang::variables::{self, VariableId};

/// Extensions (lowercase, without the dot) the C/C++ toolchain compiles into objects.
pub const SOURCE_EXTENSIONS: &[&str] = &["c", "cc", "cpp", "cxx", "c++", "s"];

/// Return the final path component.
pub fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Return the extension of the final component, without the dot.
///
/// Dotfiles such as `.hidden` have no extension.
pub fn extension(path: &str) -> Option<&str> {
    let name = file_name(path);
    match name.rfind('.') {
        Some(0) | None => None,
        Some(idx) => Some(&name[idx + 1..]),
    }
}

/// Return the final component with its extension removed.
pub fn file_stem(path: &str) -> &str {
    let name = file_name(path);
    match name.rfind('.') {
        Some(0) | None => name,
        Some(idx) => &name[..idx],
    }
}

/// Whether `path` names a compilable C/C++ (or assembly) source file. Case-insensitive.
pub fn is_cpp_source(path: &str) -> bool {
    extension(path)
        .map(|ext| SOURCE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}

/// Derive the object file a source compiles to: `$(OBJDIR)/<stem>.o`.
pub fn object_filename(path: &str) -> String {
    format!(
        "{}/{}.{}",
        variables::reference(VariableId::ObjDir),
        file_stem(path),
        OBJECT_EXT
    )
}

/// Rewrite separators to `/`, the only separator make rules understand portably.
pub fn to_make_path(path: &str) -> String {
    path.replace('\\', "/")
}
