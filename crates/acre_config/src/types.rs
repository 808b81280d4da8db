//! Run-parameter types deserialized from `acre.toml`.
//!
//! Every section is optional. Missing sections and missing keys inside a
//! section fall back to the defaults documented on each field.

use serde::Deserialize;

/// The top-level floorplanning configuration parsed from `acre.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct FloorplanConfig {
    /// Master random seed. All per-worker seeds are derived from it.
    #[serde(default)]
    pub seed: u64,
    /// Cost-term weights.
    #[serde(default)]
    pub weights: WeightConfig,
    /// Perturbation move probabilities.
    #[serde(default)]
    pub moves: MoveConfig,
    /// Annealing schedule constants.
    #[serde(default)]
    pub anneal: AnnealConfig,
    /// Soft-block shrinking schedule.
    #[serde(default)]
    pub shrink: ShrinkConfig,
    /// Multi-level parallel search schedule.
    #[serde(default)]
    pub parallel: ParallelConfig,
    /// Notch (dead space) detection thresholds.
    #[serde(default)]
    pub notch: NotchConfig,
}

/// Weights applied to each normalized cost term.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct WeightConfig {
    /// Packed bounding-box area (default 0.5).
    pub area: f64,
    /// Net half-perimeter wirelength (default 0.5).
    pub wirelength: f64,
    /// Area by which the layout exceeds the outline (default 1.0).
    pub outline: f64,
    /// Distance of hard macros from the outline boundary (default 0.2).
    pub boundary: f64,
    /// Overlap of hard macros with keepout regions (default 1.0).
    pub macro_blockage: f64,
    /// Deviation of blocks from their location guides (default 0.5).
    pub location: f64,
    /// Dead-space notches between hard macros (default 0.2).
    pub notch: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            area: 0.5,
            wirelength: 0.5,
            outline: 1.0,
            boundary: 0.2,
            macro_blockage: 1.0,
            location: 0.5,
            notch: 0.2,
        }
    }
}

/// Probabilities of each perturbation kind.
///
/// The four values are turned into cumulative thresholds; whatever is left
/// above `resize + pos_swap + neg_swap` selects the double swap.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct MoveConfig {
    /// Resize one block (default 0.4).
    pub resize: f64,
    /// Swap two entries of the positive sequence (default 0.2).
    pub pos_swap: f64,
    /// Swap two entries of the negative sequence (default 0.2).
    pub neg_swap: f64,
    /// Swap the same two blocks in both sequences (default 0.2).
    pub double_swap: f64,
}

impl Default for MoveConfig {
    fn default() -> Self {
        Self {
            resize: 0.4,
            pos_swap: 0.2,
            neg_swap: 0.2,
            double_swap: 0.2,
        }
    }
}

/// Simulated annealing schedule constants shared by every worker.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnnealConfig {
    /// Target probability of accepting an average uphill move at the initial
    /// temperature (default 0.95).
    pub init_prob: f64,
    /// Number of outer temperature steps per run (default 300).
    pub max_num_step: usize,
    /// Perturbations per temperature step, also the sampling length
    /// (default 50).
    pub perturb_per_step: usize,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            init_prob: 0.95,
            max_num_step: 300,
            perturb_per_step: 50,
        }
    }
}

/// Shrinking of soft blocks while the layout does not fit the outline.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShrinkConfig {
    /// Scale applied to both dimensions of every soft block (default 0.995).
    pub factor: f64,
    /// Fraction of the step budget between shrink opportunities (default 0.1).
    pub freq: f64,
}

impl Default for ShrinkConfig {
    fn default() -> Self {
        Self {
            factor: 0.995,
            freq: 0.1,
        }
    }
}

/// Multi-level parallel search schedule.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParallelConfig {
    /// Number of sequential levels (default 4).
    pub num_level: usize,
    /// Concurrent annealing workers per level (default 4).
    pub num_worker: usize,
    /// Multiplier applied to the reheating factor after each level
    /// (default 0.5).
    pub heat_rate: f64,
    /// Cooling rate of the first worker (default 0.995).
    pub cooling_rate_max: f64,
    /// Cooling rate of the last worker (default 0.985).
    pub cooling_rate_min: f64,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            num_level: 4,
            num_worker: 4,
            heat_rate: 0.5,
            cooling_rate_max: 0.995,
            cooling_rate_min: 0.985,
        }
    }
}

/// Size thresholds under which an uncovered grid cell counts as a notch.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct NotchConfig {
    /// Absolute cap on the threshold, in layout units (default 50.0).
    pub max_threshold: f64,
    /// Threshold as a fraction of the outline dimension (default 0.1).
    pub outline_fraction: f64,
}

impl Default for NotchConfig {
    fn default() -> Self {
        Self {
            max_threshold: 50.0,
            outline_fraction: 0.1,
        }
    }
}

impl NotchConfig {
    /// Returns the horizontal and vertical notch thresholds for an outline.
    pub fn thresholds(&self, outline_width: f64, outline_height: f64) -> (f64, f64) {
        (
            self.max_threshold.min(outline_width * self.outline_fraction),
            self.max_threshold.min(outline_height * self.outline_fraction),
        )
    }
}
