//! The annealing core: one simulated-annealing run over a sequence pair.
//!
//! A core owns a private copy of the blocks and sequences plus its own seeded
//! generator. It first serves as a sampler that derives normalization
//! constants and the initial temperature from a random walk, then runs the
//! Metropolis loop with geometric cooling, periodic soft-block shrinking and
//! a bounded number of schedule restarts while the layout stays infeasible.

use crate::block::Block;
use crate::cost::{CostModel, CostTerms};
use crate::packing::{pack, PackedSize, SequencePair};
use crate::perturb::{perturb, undo, MoveThresholds};
use crate::problem::Problem;
use acre_config::{AnnealConfig, FloorplanConfig, ShrinkConfig, WeightConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Extra schedules a run may start while the result is still infeasible.
pub(crate) const MAX_RESTARTS: usize = 2;

/// Relative slack allowed on each outline dimension.
const FEASIBILITY_SLACK: f64 = 1.001;

/// Normalization constants and starting temperature shared by every worker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Calibration {
    pub(crate) norms: CostTerms,
    pub(crate) init_temperature: f64,
}

/// The best state seen during a run.
#[derive(Debug, Clone)]
struct Snapshot {
    blocks: Vec<Block>,
    seq: SequencePair,
    size: PackedSize,
    terms: CostTerms,
    cost: f64,
}

/// Final state of a finished run.
#[derive(Debug, Clone)]
pub(crate) struct Outcome {
    pub(crate) blocks: Vec<Block>,
    pub(crate) seq: SequencePair,
    pub(crate) terms: CostTerms,
    pub(crate) cost: f64,
}

/// One annealing worker.
pub(crate) struct AnnealingCore<'a> {
    problem: &'a Problem,
    model: CostModel<'a>,
    weights: WeightConfig,
    thresholds: MoveThresholds,
    anneal: AnnealConfig,
    shrink: ShrinkConfig,
    cooling_rate: f64,
    rng: StdRng,
    blocks: Vec<Block>,
    seq: SequencePair,
    size: PackedSize,
    terms: CostTerms,
    norms: CostTerms,
    init_temperature: f64,
}

impl<'a> AnnealingCore<'a> {
    /// Creates a core over the problem's blocks in identity order, packed and
    /// evaluated. Until calibrated every normalization constant is zero.
    pub(crate) fn new(
        problem: &'a Problem,
        config: &FloorplanConfig,
        cooling_rate: f64,
        seed: u64,
    ) -> Self {
        let mut core = Self {
            problem,
            model: CostModel::new(problem, &config.notch),
            weights: config.weights,
            thresholds: MoveThresholds::new(&config.moves),
            anneal: config.anneal,
            shrink: config.shrink,
            cooling_rate,
            rng: StdRng::seed_from_u64(seed),
            blocks: problem.blocks.clone(),
            seq: SequencePair::identity(problem.blocks.len()),
            size: PackedSize::default(),
            terms: CostTerms::default(),
            norms: CostTerms::default(),
            init_temperature: 0.0,
        };
        core.repack();
        core
    }

    /// Gives every block a random shape.
    pub(crate) fn randomize_shapes(&mut self) {
        for block in &mut self.blocks {
            block.randomize(&mut self.rng);
        }
        self.repack();
    }

    /// Walks `perturb_per_step` unfiltered moves and derives the
    /// normalization constants and the initial temperature from them.
    ///
    /// The constants are the per-term means of the visited layouts. The
    /// temperature is chosen so that the mean cost change between
    /// consecutive layouts is accepted with probability `init_prob`.
    pub(crate) fn sample(&mut self) -> Calibration {
        let count = self.anneal.perturb_per_step;
        let mut samples = Vec::with_capacity(count);
        for _ in 0..count {
            perturb(
                &mut self.blocks,
                &mut self.seq,
                self.problem.outline,
                &self.thresholds,
                &mut self.rng,
            );
            self.repack();
            samples.push(self.terms);
        }

        let norms = CostTerms::mean(&samples);
        let costs: Vec<f64> = samples
            .iter()
            .map(|terms| terms.weighted_cost(&norms, &self.weights))
            .collect();
        let total_delta: f64 = costs.windows(2).map(|w| (w[1] - w[0]).abs()).sum();
        let average = total_delta / costs.len().saturating_sub(1).max(1) as f64;
        let calibration = Calibration {
            norms,
            init_temperature: -average / self.anneal.init_prob.ln(),
        };
        self.calibrate(calibration);
        calibration
    }

    /// Installs normalization constants and a starting temperature.
    pub(crate) fn calibrate(&mut self, calibration: Calibration) {
        self.norms = calibration.norms;
        self.init_temperature = calibration.init_temperature;
    }

    /// Replaces the working state, repacking and re-evaluating it.
    pub(crate) fn set_state(&mut self, blocks: Vec<Block>, seq: SequencePair) {
        self.blocks = blocks;
        self.seq = seq;
        self.repack();
    }

    /// Weighted, normalized cost of the current layout.
    pub(crate) fn cost(&self) -> f64 {
        self.terms.weighted_cost(&self.norms, &self.weights)
    }

    /// Whether the current layout fits the outline within the slack.
    pub(crate) fn is_feasible(&self) -> bool {
        is_feasible(self.size, self.problem)
    }

    /// Runs the full schedule and leaves the core on the best state found.
    ///
    /// Returns the number of temperature steps taken, restarts included.
    pub(crate) fn run(&mut self) -> usize {
        let max_num_step = self.anneal.max_num_step;
        let max_num_shrink = (1.0 / self.shrink.freq) as usize;
        let modulo_base = ((max_num_step as f64 * self.shrink.freq) as usize).max(1);

        let mut temperature = self.init_temperature;
        let mut cost = self.cost();
        let mut best = self.snapshot(cost);
        let mut num_shrink = 0;
        let mut num_restart = 0;
        let mut step = 1;
        let mut total_steps = 0;

        while step <= max_num_step {
            for _ in 0..self.anneal.perturb_per_step {
                let previous_terms = self.terms;
                let previous_size = self.size;
                let mv = perturb(
                    &mut self.blocks,
                    &mut self.seq,
                    self.problem.outline,
                    &self.thresholds,
                    &mut self.rng,
                );
                self.repack();

                let new_cost = self.cost();
                let delta = new_cost - cost;
                let probability = if delta > 0.0 {
                    (-delta / temperature).exp()
                } else {
                    1.0
                };

                // Metropolis criterion
                if delta < 0.0 || self.rng.gen::<f64>() < probability {
                    cost = new_cost;
                    if cost < best.cost {
                        if num_shrink <= max_num_shrink
                            && step % modulo_base == 0
                            && !self.is_feasible()
                        {
                            self.shrink_soft_blocks();
                            num_shrink += 1;
                            cost = self.cost();
                        }
                        best = self.snapshot(cost);
                    }
                } else {
                    undo(mv, &mut self.blocks, &mut self.seq);
                    pack(&mut self.blocks, &self.seq);
                    self.terms = previous_terms;
                    self.size = previous_size;
                }
            }

            step += 1;
            total_steps += 1;
            temperature *= self.cooling_rate;

            if step > max_num_step
                && !is_feasible(best.size, self.problem)
                && num_restart < MAX_RESTARTS
            {
                step = 1;
                temperature = self.init_temperature;
                num_restart += 1;
            }
        }

        if best.cost < cost {
            self.blocks = best.blocks;
            self.seq = best.seq;
            self.size = best.size;
            self.terms = best.terms;
        }
        total_steps
    }

    /// Consumes the core, returning its current state.
    pub(crate) fn into_outcome(self) -> Outcome {
        let cost = self.cost();
        Outcome {
            blocks: self.blocks,
            seq: self.seq,
            terms: self.terms,
            cost,
        }
    }

    fn shrink_soft_blocks(&mut self) {
        for block in &mut self.blocks {
            block.shrink(self.shrink.factor);
        }
        self.repack();
    }

    fn snapshot(&self, cost: f64) -> Snapshot {
        Snapshot {
            blocks: self.blocks.clone(),
            seq: self.seq.clone(),
            size: self.size,
            terms: self.terms,
            cost,
        }
    }

    fn repack(&mut self) {
        self.size = pack(&mut self.blocks, &self.seq);
        self.terms = self.model.evaluate(&self.blocks, self.size);
    }
}

/// Whether a packed size fits the problem outline within the slack.
pub(crate) fn is_feasible(size: PackedSize, problem: &Problem) -> bool {
    size.width <= problem.outline.width * FEASIBILITY_SLACK
        && size.height <= problem.outline.height * FEASIBILITY_SLACK
}
