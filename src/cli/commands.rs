//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::config::GeneratorConfig;
use crate::model::{Manifest, ManifestError};
use crate::session::Session;

use super::{CliError, CliResult, ExitCode};

/// Load and validate a manifest, rendering failures as miette diagnostics.
pub fn load_manifest(path: &Path) -> CliResult<Manifest> {
    Manifest::load(path).map_err(render_manifest_error)
}

fn render_manifest_error(err: ManifestError) -> CliError {
    CliError::failure(format!("{:?}", miette::Report::new(err)))
}

/// Session configured for a manifest: relative project locations resolve against the manifest's directory.
fn session_for(manifest_path: &Path, output_dir: Option<&Path>, atomic: bool) -> Session {
    let base_dir = manifest_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut config = GeneratorConfig::new().with_base_dir(base_dir).with_atomic_writes(atomic);
    if let Some(dir) = output_dir {
        config = config.with_output_dir(dir);
    }
    Session::new(config)
}

/// Validate the output directory before anything is written.
///
/// The directory is created if missing; an existing non-directory is an error.
fn prepare_output_dir(dir: &Path) -> CliResult<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(CliError::failure(format!(
            "Output path '{}' exists and is not a directory",
            dir.display()
        )));
    }
    if dir.is_absolute() {
        tracing::warn!(dir = %dir.display(), "writing makefiles to an absolute output directory");
    }
    fs::create_dir_all(dir)
        .map_err(|e| CliError::failure(format!("Cannot create output directory '{}': {}", dir.display(), e)))
}

/// `mkgen generate`
pub fn generate(manifest_path: &Path, output_dir: Option<&Path>, atomic: bool) -> CliResult<ExitCode> {
    let manifest = load_manifest(manifest_path)?;
    if let Some(dir) = output_dir {
        prepare_output_dir(dir)?;
    }

    let session = session_for(manifest_path, output_dir, atomic);
    let outcomes = session.generate(&manifest);

    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(report) => println!("{} -> {} ({} lines)", outcome.project, outcome.path.display(), report.lines),
            Err(err) => {
                failed += 1;
                eprintln!("error: {}: {}", outcome.project, err);
            }
        }
    }

    if failed == 0 {
        Ok(ExitCode::SUCCESS)
    } else {
        Err(CliError::failure(format!(
            "{} of {} makefile(s) failed",
            failed,
            outcomes.len()
        )))
    }
}

/// `mkgen print`
pub fn print(manifest_path: &Path, project: Option<&str>) -> CliResult<ExitCode> {
    let manifest = load_manifest(manifest_path)?;
    let selected = match project {
        Some(name) => manifest
            .project(name)
            .ok_or_else(|| CliError::failure(format!("No project named '{}' in manifest", name)))?,
        None => manifest
            .projects
            .first()
            .ok_or_else(|| CliError::failure("Manifest declares no projects"))?,
    };

    let session = session_for(manifest_path, None, false);
    let text = session
        .render_project(selected)
        .map_err(|e| CliError::failure(format!("Error rendering '{}': {}", selected.name, e)))?;

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.flush())
        .map_err(|e| CliError::failure(format!("Error writing to stdout: {}", e)))?;
    Ok(ExitCode::SUCCESS)
}

/// `mkgen check`
pub fn check(manifest_path: &Path) -> CliResult<ExitCode> {
    let manifest = load_manifest(manifest_path)?;
    let session = session_for(manifest_path, None, false);

    let mut problems = 0;
    for (project, path) in manifest.projects.iter().zip(session.makefile_paths(&manifest)) {
        match session.check_project(project) {
            Ok(()) => println!(
                "{} -> {} ({} configuration(s), {} file(s))",
                project.name,
                path.display(),
                project.configurations.len(),
                project.files.len()
            ),
            Err(err) => {
                problems += 1;
                eprintln!("error: {}", err);
            }
        }
    }

    if problems == 0 {
        Ok(ExitCode::SUCCESS)
    } else {
        Err(CliError::failure(format!("{} project(s) failed validation", problems)))
    }
}
