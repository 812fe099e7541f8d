//! Shared makefile conventions (well-known spellings).

/// Banner written as the first line of every generated makefile.
pub const SIGNATURE: &str = "# GNU Makefile autogenerated by mkgen";

/// Root directory for per-configuration object files (`obj/<config>`).
pub const OBJ_ROOT: &str = "obj";

/// Output directory relative to the makefile.
pub const OUTDIR_VALUE: &str = ".";

/// Object file extension (without the dot).
pub const OBJECT_EXT: &str = "o";

/// Dependency file extension produced by `-MMD` (without the dot).
pub const DEPENDENCY_EXT: &str = "d";

/// Compiler flag that makes the compiler write `.d` dependency files next to objects.
pub const DEPFILE_FLAG: &str = "-MMD";

/// Value of `$(SHELLTYPE)` selecting POSIX shell commands.
pub const SHELL_POSIX: &str = "posix";

/// Name of the clean target.
pub const CLEAN_TARGET: &str = "clean";

/// Makefile name used when a project owns its location.
pub const DEFAULT_MAKEFILE: &str = "Makefile";

/// Extension used for per-project makefiles when several projects share a location.
pub const PROJECT_MAKEFILE_EXT: &str = "make";

/// Build the per-configuration object directory value (`obj/<config>`).
pub fn objdir_for(configuration: &str) -> String {
    format!("{}/{}", OBJ_ROOT, configuration)
}
