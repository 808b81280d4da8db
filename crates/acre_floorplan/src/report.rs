//! The floorplanning result returned to callers.

use crate::block::Block;
use crate::cost::CostTerms;
use crate::problem::Outline;
use serde::Serialize;

/// Final geometry of one block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedBlock {
    /// Block name from the design.
    pub name: String,
    /// Lower-left x coordinate.
    pub x: f64,
    /// Lower-left y coordinate.
    pub y: f64,
    /// Final width.
    pub width: f64,
    /// Final height.
    pub height: f64,
    /// Final area. Soft blocks may have shrunk below their design area.
    pub area: f64,
    /// Whether the block is a hard macro.
    pub hard: bool,
}

impl From<&Block> for PlacedBlock {
    fn from(block: &Block) -> Self {
        Self {
            name: block.name().to_string(),
            x: block.x(),
            y: block.y(),
            width: block.width(),
            height: block.height(),
            area: block.area(),
            hard: block.is_macro(),
        }
    }
}

/// Result of one parallel level: the winning worker's cost breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelSummary {
    /// Zero-based level index.
    pub level: usize,
    /// Weighted, normalized cost of the winner.
    pub cost: f64,
    /// Raw cost terms of the winner.
    pub terms: CostTerms,
    /// Cost terms divided by their normalization constants.
    pub normalized: CostTerms,
}

/// A finished floorplan.
///
/// An infeasible floorplan is still a complete, best-effort layout; check
/// [`feasible`](Floorplan::feasible) before using it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Floorplan {
    /// Every block in design order.
    pub blocks: Vec<PlacedBlock>,
    /// Width of the layout's bounding box.
    pub width: f64,
    /// Height of the layout's bounding box.
    pub height: f64,
    /// The fixed outline.
    pub outline: Outline,
    /// Whether the layout fits the outline.
    pub feasible: bool,
    /// Final weighted, normalized cost.
    pub cost: f64,
    /// Final raw cost terms.
    pub terms: CostTerms,
    /// Final cost terms divided by their normalization constants.
    pub normalized: CostTerms,
    /// Per-level summaries in run order.
    pub levels: Vec<LevelSummary>,
}

impl Floorplan {
    /// Looks up a placed block by name.
    pub fn block(&self, name: &str) -> Option<&PlacedBlock> {
        self.blocks.iter().find(|b| b.name == name)
    }

    /// Number of hard macros in the result.
    pub fn macro_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.hard).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Floorplan {
        let mut soft = Block::soft("cluster", 200.0, vec![(0.5, 2.0)]);
        soft.set_x(10.0);
        let hard = Block::hard("ram", 100.0, 1, vec![(10.0, 10.0)]);
        Floorplan {
            blocks: vec![PlacedBlock::from(&soft), PlacedBlock::from(&hard)],
            width: 30.0,
            height: 20.0,
            outline: Outline {
                width: 40.0,
                height: 40.0,
            },
            feasible: true,
            cost: 1.5,
            terms: CostTerms::default(),
            normalized: CostTerms::default(),
            levels: vec![],
        }
    }

    #[test]
    fn placed_block_copies_geometry() {
        let plan = sample();
        let cluster = plan.block("cluster").unwrap();
        assert_eq!(cluster.x, 10.0);
        assert!(!cluster.hard);
        assert!((cluster.width * cluster.height - 200.0).abs() < 1e-9);
        assert!(plan.block("ram").unwrap().hard);
        assert!(plan.block("missing").is_none());
        assert_eq!(plan.macro_count(), 1);
    }

    #[test]
    fn serializes_to_json() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["feasible"], true);
        assert_eq!(json["outline"]["width"], 40.0);
        assert_eq!(json["blocks"][1]["name"], "ram");
        assert_eq!(json["terms"]["macro_blockage"], 0.0);
    }
}
