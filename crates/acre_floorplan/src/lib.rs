//! Fixed-outline macro floorplanning by simulated annealing.
//!
//! This crate places a set of soft blocks (fixed area, adjustable aspect
//! ratio) and hard macros (discrete shape options) inside a fixed outline.
//! A layout is encoded as a [`SequencePair`] and packed into coordinates by
//! a longest-common-subsequence sweep. The annealer minimizes a weighted sum
//! of normalized [`CostTerms`]: area, wirelength, outline overflow, macro
//! distance to the boundary, macro overlap with keepout regions, distance to
//! location guides, and notches between macros.
//!
//! # Pipeline
//!
//! 1. **Sample**: randomize shapes and walk random moves to calibrate the
//!    normalization constants and the initial temperature
//! 2. **Anneal**: `num_level` levels of `num_worker` parallel annealing
//!    workers, each level seeded from the previous level's winner
//! 3. **Align**: snap macros to the outline and to each other
//!
//! # Usage
//!
//! ```ignore
//! use acre_floorplan::{floorplan, Problem};
//!
//! let problem = Problem::from_design(&design)?;
//! let plan = floorplan(&problem, &config, &sink)?;
//! if !plan.feasible {
//!     eprintln!("layout exceeds the outline");
//! }
//! ```

#![warn(missing_docs)]

mod align;
mod anneal;
pub mod block;
pub mod cost;
mod driver;
pub mod error;
pub mod notch;
pub mod packing;
mod perturb;
pub mod problem;
pub mod report;

pub use block::{Block, BlockShape, ShapeState};
pub use cost::{CostModel, CostTerms};
pub use error::DesignError;
pub use packing::{pack, PackedSize, SequencePair};
pub use problem::{standard_terminals, Location, Net, Outline, Problem, Terminal};
pub use report::{Floorplan, LevelSummary, PlacedBlock};

use acre_common::{AcreResult, InternalError};
use acre_config::FloorplanConfig;
use acre_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};

/// Floorplans a resolved problem.
///
/// The run is fully determined by `config` (including its master seed).
/// Progress and per-level summaries are reported to `sink`; an infeasible
/// result also emits a warning. `config` is expected to have passed
/// [`acre_config::validate_config`].
///
/// Returns an error only when the problem has no blocks or the worker pool
/// cannot be started.
pub fn floorplan(
    problem: &Problem,
    config: &FloorplanConfig,
    sink: &DiagnosticSink,
) -> AcreResult<Floorplan> {
    if problem.blocks.is_empty() {
        return Err(InternalError::new("cannot floorplan a problem without blocks"));
    }

    sink.emit(
        Diagnostic::note(
            DiagnosticCode::STARTED,
            format!(
                "floorplanning {} blocks ({} hard macros) and {} nets",
                problem.blocks.len(),
                problem.macro_count(),
                problem.nets.len()
            ),
        )
        .with_note(format!(
            "{} levels of {} workers, seed {}",
            config.parallel.num_level, config.parallel.num_worker, config.seed
        )),
    );

    let seeds = driver::seed_list(config);

    // 1. Calibrate
    let (start, calibration) = driver::sample(problem, config, seeds[0], sink);

    // 2. Anneal
    let (best, levels) = driver::run_levels(problem, config, &seeds, start, calibration, sink)?;

    // 3. Align and report
    Ok(driver::finish(problem, config, best, calibration, levels, sink))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config() -> FloorplanConfig {
        let mut config = FloorplanConfig::default();
        config.anneal.max_num_step = 10;
        config.anneal.perturb_per_step = 20;
        config.parallel.num_level = 2;
        config.parallel.num_worker = 2;
        config
    }

    #[test]
    fn empty_problem_is_rejected() {
        let problem = Problem::new(Outline {
            width: 10.0,
            height: 10.0,
        });
        let sink = DiagnosticSink::new();
        assert!(floorplan(&problem, &quick_config(), &sink).is_err());
    }

    #[test]
    fn emits_progress_diagnostics() {
        let mut problem = Problem::new(Outline {
            width: 50.0,
            height: 50.0,
        });
        problem.add_block(Block::soft("a", 200.0, vec![(0.5, 2.0)]));
        problem.add_block(Block::hard("m", 100.0, 1, vec![(10.0, 10.0)]));
        let sink = DiagnosticSink::new();
        let plan = floorplan(&problem, &quick_config(), &sink).unwrap();
        assert_eq!(plan.levels.len(), 2);
        assert!(plan.feasible);

        let codes: Vec<String> = sink
            .diagnostics()
            .iter()
            .map(|d| d.code.to_string())
            .collect();
        assert_eq!(codes, vec!["I001", "I002", "I100", "I101", "I003"]);
    }

    #[test]
    fn zero_levels_keep_the_sampled_layout() {
        let mut problem = Problem::new(Outline {
            width: 50.0,
            height: 50.0,
        });
        problem.add_block(Block::soft("a", 200.0, vec![(0.5, 2.0)]));
        problem.add_block(Block::soft("b", 100.0, vec![(1.0, 1.0)]));
        let mut config = quick_config();
        config.parallel.num_level = 0;
        let sink = DiagnosticSink::new();
        let plan = floorplan(&problem, &config, &sink).unwrap();
        assert!(plan.levels.is_empty());
        assert_eq!(plan.blocks.len(), 2);
    }
}
