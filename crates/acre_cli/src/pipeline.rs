//! Shared helpers for CLI commands: config discovery, design loading and
//! diagnostic rendering.

use std::path::{Path, PathBuf};

use acre_config::FloorplanConfig;
use acre_diagnostics::{Diagnostic, DiagnosticRenderer, Severity, TerminalRenderer};
use acre_floorplan::Problem;

use crate::GlobalArgs;

/// File name of the run configuration looked up next to a design.
const CONFIG_FILE: &str = "acre.toml";

/// Picks the run configuration file.
///
/// `--config` wins. Otherwise `acre.toml` in the design's directory is used
/// if it exists.
pub fn resolve_config_path(global: &GlobalArgs, design: &Path) -> Option<PathBuf> {
    if let Some(ref path) = global.config {
        return Some(PathBuf::from(path));
    }
    let dir = design.parent().unwrap_or_else(|| Path::new("."));
    let candidate = dir.join(CONFIG_FILE);
    candidate.is_file().then_some(candidate)
}

/// Loads the run configuration, falling back to the defaults when no file
/// is found.
pub fn load_run_config(
    global: &GlobalArgs,
    design: &Path,
) -> Result<FloorplanConfig, Box<dyn std::error::Error>> {
    match resolve_config_path(global, design) {
        Some(path) => Ok(acre_config::load_config(&path)?),
        None => Ok(FloorplanConfig::default()),
    }
}

/// Loads a design file and resolves it into a problem.
pub fn load_problem(design: &Path) -> Result<Problem, Box<dyn std::error::Error>> {
    let spec = acre_config::load_design(design)?;
    Ok(Problem::from_design(&spec)?)
}

/// Whether a diagnostic of `severity` is shown under the global flags.
///
/// `--quiet` keeps errors only and `--verbose` adds progress notes.
pub fn is_shown(severity: Severity, global: &GlobalArgs) -> bool {
    if global.quiet {
        severity == Severity::Error
    } else if global.verbose {
        true
    } else {
        severity >= Severity::Warning
    }
}

/// Renders diagnostics to stderr.
pub fn render_diagnostics(diagnostics: &[Diagnostic], global: &GlobalArgs) {
    let renderer = TerminalRenderer::new(global.color);
    for diag in diagnostics.iter().filter(|d| is_shown(d.severity, global)) {
        eprintln!("{}", renderer.render(diag));
    }
}
