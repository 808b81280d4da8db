//! `acre check`: validate a design and its run configuration.
//!
//! Loads the configuration the same way `acre place` would, resolves the
//! design into a problem and reports what it contains. Nothing is annealed.

use std::path::Path;

use crate::pipeline::{load_problem, load_run_config};
use crate::{CheckArgs, GlobalArgs};

/// Runs the `acre check` command.
///
/// Returns exit code 0 when both the configuration and the design resolve.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let design_path = Path::new(&args.design);

    let config = load_run_config(global, design_path)?;
    let problem = load_problem(design_path)?;

    if !global.quiet {
        eprintln!("   Checked {}", args.design);
        eprintln!(
            "   outline {} x {}",
            problem.outline.width, problem.outline.height
        );
        eprintln!(
            "   {} blocks ({} hard macros), {} nets, {} regions, {} locations",
            problem.blocks.len(),
            problem.macro_count(),
            problem.nets.len(),
            problem.regions.len(),
            problem.locations.len()
        );
        eprintln!(
            "   {} levels of {} workers, seed {}",
            config.parallel.num_level, config.parallel.num_worker, config.seed
        );
    }

    Ok(0)
}
