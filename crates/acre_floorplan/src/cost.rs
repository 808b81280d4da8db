//! The multi-term floorplan cost model.
//!
//! Each term is computed from a packed layout. Terms are combined into one
//! scalar by dividing each by a normalization constant, multiplying by its
//! weight and summing. Terms whose constant is not positive are left out.

use crate::block::Block;
use crate::notch;
use crate::packing::PackedSize;
use crate::problem::{Outline, Problem};
use acre_config::{NotchConfig, WeightConfig};
use serde::Serialize;

/// Raw values of every cost term for one layout.
///
/// The same struct carries normalization constants, which are per-term means
/// of raw values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CostTerms {
    /// Packed bounding-box area.
    pub area: f64,
    /// Weighted half-perimeter wirelength.
    pub wirelength: f64,
    /// Area by which the layout's bounding box exceeds the outline.
    pub outline: f64,
    /// Squared distance of hard macros from the nearest outline edge.
    pub boundary: f64,
    /// Overlap area between hard macros and keepout regions.
    pub macro_blockage: f64,
    /// Distance of guided blocks from their location guides.
    pub location: f64,
    /// Dead-space notches between hard macros.
    pub notch: f64,
}

impl CostTerms {
    fn pairs(&self) -> [f64; 7] {
        [
            self.area,
            self.wirelength,
            self.outline,
            self.boundary,
            self.macro_blockage,
            self.location,
            self.notch,
        ]
    }

    fn from_pairs(v: [f64; 7]) -> Self {
        Self {
            area: v[0],
            wirelength: v[1],
            outline: v[2],
            boundary: v[3],
            macro_blockage: v[4],
            location: v[5],
            notch: v[6],
        }
    }

    /// Combines the terms into the scalar annealing cost.
    pub fn weighted_cost(&self, norms: &CostTerms, weights: &WeightConfig) -> f64 {
        let weights = [
            weights.area,
            weights.wirelength,
            weights.outline,
            weights.boundary,
            weights.macro_blockage,
            weights.location,
            weights.notch,
        ];
        self.pairs()
            .iter()
            .zip(norms.pairs())
            .zip(weights)
            .filter(|((_, norm), _)| *norm > 0.0)
            .map(|((value, norm), weight)| weight * value / norm)
            .sum()
    }

    /// Divides every term by its normalization constant, reporting zero for
    /// terms whose constant is not positive.
    pub fn normalized(&self, norms: &CostTerms) -> CostTerms {
        let mut out = [0.0; 7];
        for (slot, (value, norm)) in out.iter_mut().zip(self.pairs().iter().zip(norms.pairs())) {
            if norm > 0.0 {
                *slot = value / norm;
            }
        }
        Self::from_pairs(out)
    }

    /// Returns the per-term mean of a set of samples.
    pub fn mean(samples: &[CostTerms]) -> CostTerms {
        if samples.is_empty() {
            return CostTerms::default();
        }
        let mut sum = [0.0; 7];
        for sample in samples {
            for (slot, value) in sum.iter_mut().zip(sample.pairs()) {
                *slot += value;
            }
        }
        let n = samples.len() as f64;
        Self::from_pairs(sum.map(|total| total / n))
    }
}

/// Evaluates cost terms against the shared problem data.
#[derive(Debug, Clone, Copy)]
pub struct CostModel<'a> {
    problem: &'a Problem,
    notch_thresholds: (f64, f64),
}

impl<'a> CostModel<'a> {
    /// Creates a cost model for a problem.
    pub fn new(problem: &'a Problem, notch: &NotchConfig) -> Self {
        let outline = problem.outline;
        Self {
            problem,
            notch_thresholds: notch.thresholds(outline.width, outline.height),
        }
    }

    /// Computes every term for the current block positions.
    pub fn evaluate(&self, blocks: &[Block], size: PackedSize) -> CostTerms {
        let outline = self.problem.outline;
        CostTerms {
            area: size.area(),
            wirelength: self.wirelength(blocks),
            outline: outline_penalty(outline, size),
            boundary: boundary_penalty(outline, blocks),
            macro_blockage: self.macro_blockage_penalty(blocks),
            location: self.location_penalty(blocks),
            notch: notch::notch_penalty(outline, size, blocks, self.notch_thresholds),
        }
    }

    /// Sum over nets of the weighted half-perimeter of the box spanning the
    /// centers of the net's blocks and its terminal points.
    ///
    /// Each block counts as a single pin at its center, not as its full
    /// extent, so a net of two abutting blocks still has a nonzero length.
    pub fn wirelength(&self, blocks: &[Block]) -> f64 {
        let mut total = 0.0;
        for net in &self.problem.nets {
            let points = net
                .blocks
                .iter()
                .map(|id| blocks[id.index()].center())
                .chain(net.terminals.iter().map(|id| {
                    let terminal = &self.problem.terminals[id.index()];
                    (terminal.x, terminal.y)
                }));
            let mut bbox: Option<(f64, f64, f64, f64)> = None;
            for (x, y) in points {
                bbox = Some(match bbox {
                    None => (x, y, x, y),
                    Some((lx, ly, ux, uy)) => (lx.min(x), ly.min(y), ux.max(x), uy.max(y)),
                });
            }
            if let Some((lx, ly, ux, uy)) = bbox {
                total += ((ux - lx) + (uy - ly)) * f64::from(net.weight);
            }
        }
        total
    }

    /// Overlap area between hard macros and keepout regions.
    pub fn macro_blockage_penalty(&self, blocks: &[Block]) -> f64 {
        let mut total = 0.0;
        for region in &self.problem.regions {
            for block in blocks.iter().filter(|b| b.is_macro()) {
                total += block.rect().overlap_area(region);
            }
        }
        total
    }

    /// Sum over location guides of the smaller per-axis gap between the
    /// block and its guide, measured center to center minus half-extents.
    pub fn location_penalty(&self, blocks: &[Block]) -> f64 {
        let mut total = 0.0;
        for location in &self.problem.locations {
            let block = &blocks[location.block.index()];
            let (bx, by) = block.center();
            let (lx, ly) = location.rect.center();
            let half_width = (block.width() + location.rect.width()) / 2.0;
            let half_height = (block.height() + location.rect.height()) / 2.0;
            let x_dist = ((bx - lx).abs() - half_width).max(0.0);
            let y_dist = ((by - ly).abs() - half_height).max(0.0);
            total += x_dist.min(y_dist);
        }
        total
    }
}

/// Area by which the layout's bounding box, grown to cover the outline,
/// exceeds the outline.
pub fn outline_penalty(outline: Outline, size: PackedSize) -> f64 {
    let max_width = outline.width.max(size.width);
    let max_height = outline.height.max(size.height);
    (max_width * max_height - outline.area()).max(0.0)
}

/// Squared distance of each hard macro to its nearest outline edge, scaled
/// by the square of its macro count.
pub fn boundary_penalty(outline: Outline, blocks: &[Block]) -> f64 {
    blocks
        .iter()
        .filter(|b| b.is_macro())
        .map(|block| {
            let r = block.rect();
            let dist = r
                .lx
                .min((outline.width - r.ux).abs())
                .min(r.ly)
                .min((outline.height - r.uy).abs());
            let weight = f64::from(block.num_macro());
            dist * dist * weight * weight
        })
        .sum()
}
