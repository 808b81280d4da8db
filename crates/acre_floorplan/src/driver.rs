//! The multi-level parallel driver.
//!
//! A sampling core calibrates the cost normalization and the initial
//! temperature once. Each level then runs `num_worker` annealing cores in a
//! fresh rayon pool, every worker starting from the previous level's winner
//! with its own cooling rate and seed. The cheapest worker seeds the next
//! level. Workers share only immutable data, so the result depends on the
//! master seed alone and not on thread scheduling.

use crate::align::align_macros;
use crate::anneal::{is_feasible, AnnealingCore, Calibration, Outcome, MAX_RESTARTS};
use crate::block::Block;
use crate::cost::CostModel;
use crate::packing::PackedSize;
use crate::problem::Problem;
use crate::report::{Floorplan, LevelSummary, PlacedBlock};
use acre_common::{AcreResult, InternalError};
use acre_config::{FloorplanConfig, ParallelConfig};
use acre_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

/// Spare seeds drawn after the per-worker seeds.
const GUARD_SEEDS: usize = 10;

/// Draws every seed a run needs from the master seed: one for the sampling
/// core, one per (level, worker) slot, then the guard band.
pub(crate) fn seed_list(config: &FloorplanConfig) -> Vec<u64> {
    let parallel = &config.parallel;
    let count = parallel.num_level * parallel.num_worker + 1 + GUARD_SEEDS;
    let mut rng = StdRng::seed_from_u64(config.seed);
    (0..count).map(|_| rng.gen()).collect()
}

/// Cooling rates linearly spaced from the upper to the lower bound.
pub(crate) fn cooling_rates(parallel: &ParallelConfig) -> Vec<f64> {
    let n = parallel.num_worker;
    if n <= 1 {
        return vec![parallel.cooling_rate_max; n];
    }
    let step = (parallel.cooling_rate_max - parallel.cooling_rate_min) / (n - 1) as f64;
    (0..n)
        .map(|j| parallel.cooling_rate_max - j as f64 * step)
        .collect()
}

/// Randomizes the initial shapes and samples the cost landscape.
///
/// Returns the sampler's final state, which seeds the first level, and the
/// calibration every worker uses.
pub(crate) fn sample(
    problem: &Problem,
    config: &FloorplanConfig,
    seed: u64,
    sink: &DiagnosticSink,
) -> (Outcome, Calibration) {
    let mut sampler = AnnealingCore::new(problem, config, config.parallel.cooling_rate_max, seed);
    sampler.randomize_shapes();
    let calibration = sampler.sample();

    let norms = calibration.norms;
    sink.emit(
        Diagnostic::note(
            DiagnosticCode::SAMPLED,
            format!(
                "sampled {} moves, initial temperature {:.6}",
                config.anneal.perturb_per_step, calibration.init_temperature
            ),
        )
        .with_note(format!(
            "norms: area {:.3}, wirelength {:.3}, outline {:.3}, boundary {:.3}",
            norms.area, norms.wirelength, norms.outline, norms.boundary
        ))
        .with_note(format!(
            "norms: macro blockage {:.3}, location {:.3}, notch {:.3}",
            norms.macro_blockage, norms.location, norms.notch
        )),
    );

    (sampler.into_outcome(), calibration)
}

/// Runs every level and returns the final winner with one summary per level.
pub(crate) fn run_levels(
    problem: &Problem,
    config: &FloorplanConfig,
    seeds: &[u64],
    start: Outcome,
    calibration: Calibration,
    sink: &DiagnosticSink,
) -> AcreResult<(Outcome, Vec<LevelSummary>)> {
    let parallel = &config.parallel;
    let rates = cooling_rates(parallel);
    let mut best = start;
    let mut levels = Vec::with_capacity(parallel.num_level);
    let mut heat_count = 1.0;
    let mut temperature = calibration.init_temperature;

    for level in 0..parallel.num_level {
        temperature *= heat_count;
        heat_count *= parallel.heat_rate;
        let level_calibration = Calibration {
            norms: calibration.norms,
            init_temperature: temperature,
        };

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(parallel.num_worker)
            .build()
            .map_err(|e| InternalError::new(format!("cannot start worker pool: {e}")))?;

        let base = &best;
        let outcomes: Vec<Outcome> = pool.install(|| {
            (0..parallel.num_worker)
                .into_par_iter()
                .map(|worker| {
                    let seed = seeds[1 + level * parallel.num_worker + worker];
                    let mut core = AnnealingCore::new(problem, config, rates[worker], seed);
                    core.calibrate(level_calibration);
                    core.set_state(base.blocks.clone(), base.seq.clone());
                    core.run();
                    core.into_outcome()
                })
                .collect()
        });

        best = outcomes
            .into_iter()
            .min_by(|a, b| a.cost.total_cmp(&b.cost))
            .ok_or_else(|| InternalError::new(format!("level {level} produced no result")))?;

        let summary = LevelSummary {
            level,
            cost: best.cost,
            terms: best.terms,
            normalized: best.terms.normalized(&calibration.norms),
        };
        sink.emit(level_diagnostic(&summary));
        levels.push(summary);
    }

    Ok((best, levels))
}

fn level_diagnostic(summary: &LevelSummary) -> Diagnostic {
    let t = summary.terms;
    let n = summary.normalized;
    Diagnostic::note(
        DiagnosticCode::level(summary.level),
        format!("level {} finished with cost {:.6}", summary.level, summary.cost),
    )
    .with_note(format!(
        "area {:.3} ({:.4}), wirelength {:.3} ({:.4}), outline {:.3} ({:.4})",
        t.area, n.area, t.wirelength, n.wirelength, t.outline, n.outline
    ))
    .with_note(format!(
        "boundary {:.3} ({:.4}), macro blockage {:.3} ({:.4})",
        t.boundary, n.boundary, t.macro_blockage, n.macro_blockage
    ))
    .with_note(format!(
        "location {:.3} ({:.4}), notch {:.3} ({:.4})",
        t.location, n.location, t.notch, n.notch
    ))
}

/// Aligns the winner's macros, re-evaluates it and builds the report.
pub(crate) fn finish(
    problem: &Problem,
    config: &FloorplanConfig,
    best: Outcome,
    calibration: Calibration,
    levels: Vec<LevelSummary>,
    sink: &DiagnosticSink,
) -> Floorplan {
    let mut blocks = best.blocks;
    align_macros(&mut blocks, problem.outline);

    let size = bounding_size(&blocks);
    let terms = CostModel::new(problem, &config.notch).evaluate(&blocks, size);
    let cost = terms.weighted_cost(&calibration.norms, &config.weights);
    let feasible = is_feasible(size, problem);
    let outline = problem.outline;

    sink.emit(Diagnostic::note(
        DiagnosticCode::FINISHED,
        format!(
            "floorplan {:.3} x {:.3} in outline {:.3} x {:.3}",
            size.width, size.height, outline.width, outline.height
        ),
    ));
    if !feasible {
        sink.emit(
            Diagnostic::warning(
                DiagnosticCode::INFEASIBLE,
                format!("floorplan exceeds the outline after {MAX_RESTARTS} restarts"),
            )
            .with_note(format!(
                "layout {:.3} x {:.3}, outline {:.3} x {:.3}",
                size.width, size.height, outline.width, outline.height
            ))
            .with_help("enlarge the outline or lower the soft block areas"),
        );
    }

    Floorplan {
        blocks: blocks.iter().map(PlacedBlock::from).collect(),
        width: size.width,
        height: size.height,
        outline,
        feasible,
        cost,
        terms,
        normalized: terms.normalized(&calibration.norms),
        levels,
    }
}

/// Extent of the blocks measured from the origin.
fn bounding_size(blocks: &[Block]) -> PackedSize {
    blocks.iter().fold(PackedSize::default(), |size, block| {
        let r = block.rect();
        PackedSize {
            width: size.width.max(r.ux),
            height: size.height.max(r.uy),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parallel(workers: usize) -> ParallelConfig {
        ParallelConfig {
            num_worker: workers,
            ..ParallelConfig::default()
        }
    }

    #[test]
    fn cooling_rates_span_bounds() {
        let rates = cooling_rates(&parallel(3));
        assert_eq!(rates.len(), 3);
        assert_eq!(rates[0], 0.995);
        assert!((rates[1] - 0.99).abs() < 1e-12);
        assert!((rates[2] - 0.985).abs() < 1e-12);
    }

    #[test]
    fn single_worker_uses_upper_rate() {
        assert_eq!(cooling_rates(&parallel(1)), vec![0.995]);
    }

    #[test]
    fn seed_list_is_deterministic_and_sized() {
        let mut config = FloorplanConfig::default();
        config.parallel.num_level = 3;
        config.parallel.num_worker = 2;
        let seeds = seed_list(&config);
        assert_eq!(seeds.len(), 3 * 2 + 1 + GUARD_SEEDS);
        assert_eq!(seeds, seed_list(&config));

        config.seed += 1;
        assert_ne!(seeds, seed_list(&config));
    }

    #[test]
    fn bounding_size_covers_all_blocks() {
        let mut a = Block::hard("a", 100.0, 1, vec![(10.0, 10.0)]);
        a.set_x(30.0);
        let mut b = Block::hard("b", 50.0, 1, vec![(5.0, 10.0)]);
        b.set_y(25.0);
        let size = bounding_size(&[a, b]);
        assert_eq!(size, PackedSize { width: 40.0, height: 35.0 });
    }
}
