//! The index-based floorplanning problem.
//!
//! A [`Problem`] owns the initial blocks and the read-only data shared by all
//! annealing workers: nets, terminals, keepout regions and location guides.
//! Every cross-reference is an index, resolved once from names when the
//! problem is built from a [`DesignSpec`].

use crate::block::Block;
use crate::error::DesignError;
use acre_common::{BlockId, LocationId, NetId, Rect, RegionId, TerminalId};
use acre_config::{BlockSpec, DesignSpec, NetSpec};
use serde::Serialize;
use std::collections::HashMap;

/// The fixed outline. Its lower-left corner is the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Outline {
    /// Outline width.
    pub width: f64,
    /// Outline height.
    pub height: f64,
}

impl Outline {
    /// Returns the outline area.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// A weighted net over blocks and terminals.
#[derive(Debug, Clone, PartialEq)]
pub struct Net {
    /// Connected blocks.
    pub blocks: Vec<BlockId>,
    /// Connected terminals.
    pub terminals: Vec<TerminalId>,
    /// Net weight.
    pub weight: u32,
}

/// A fixed IO point.
#[derive(Debug, Clone, PartialEq)]
pub struct Terminal {
    /// Terminal name.
    pub name: String,
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

/// A location guide: a block should sit over `rect`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    /// The guided block.
    pub block: BlockId,
    /// Preferred area.
    pub rect: Rect,
}

/// A floorplanning problem ready for the engine.
#[derive(Debug, Clone)]
pub struct Problem {
    /// The outline to fit.
    pub outline: Outline,
    /// Blocks in their initial shapes.
    pub blocks: Vec<Block>,
    /// Nets.
    pub nets: Vec<Net>,
    /// Terminals, starting with the twelve standard boundary terminals.
    pub terminals: Vec<Terminal>,
    /// Keepout regions for hard macros.
    pub regions: Vec<Rect>,
    /// Location guides.
    pub locations: Vec<Location>,
    terminal_by_name: HashMap<String, TerminalId>,
    block_by_name: HashMap<String, BlockId>,
}

/// Names and positions of the standard boundary terminals.
///
/// Each edge carries three terminals at 1/6, 3/6 and 5/6 of its length; the
/// number is the position in sixths.
const STANDARD_TERMINALS: [(&str, Edge, f64); 12] = [
    ("LL", Edge::Left, 1.0),
    ("LM", Edge::Left, 3.0),
    ("LU", Edge::Left, 5.0),
    ("RL", Edge::Right, 1.0),
    ("RM", Edge::Right, 3.0),
    ("RU", Edge::Right, 5.0),
    ("BL", Edge::Bottom, 1.0),
    ("BM", Edge::Bottom, 3.0),
    ("BU", Edge::Bottom, 5.0),
    ("TL", Edge::Top, 1.0),
    ("TM", Edge::Top, 3.0),
    ("TU", Edge::Top, 5.0),
];

#[derive(Clone, Copy)]
enum Edge {
    Left,
    Right,
    Bottom,
    Top,
}

/// Returns the twelve standard boundary terminals of an outline.
pub fn standard_terminals(outline: Outline) -> Vec<Terminal> {
    STANDARD_TERMINALS
        .iter()
        .map(|&(name, edge, sixths)| {
            let along_x = outline.width * sixths / 6.0;
            let along_y = outline.height * sixths / 6.0;
            let (x, y) = match edge {
                Edge::Left => (0.0, along_y),
                Edge::Right => (outline.width, along_y),
                Edge::Bottom => (along_x, 0.0),
                Edge::Top => (along_x, outline.height),
            };
            Terminal {
                name: name.to_string(),
                x,
                y,
            }
        })
        .collect()
}

impl Problem {
    /// Creates an empty problem for an outline, holding only the standard
    /// boundary terminals.
    pub fn new(outline: Outline) -> Self {
        let mut problem = Self {
            outline,
            blocks: Vec::new(),
            nets: Vec::new(),
            terminals: Vec::new(),
            regions: Vec::new(),
            locations: Vec::new(),
            terminal_by_name: HashMap::new(),
            block_by_name: HashMap::new(),
        };
        for terminal in standard_terminals(outline) {
            problem.push_terminal(terminal);
        }
        problem
    }

    /// Adds a block and returns its ID.
    pub fn add_block(&mut self, block: Block) -> BlockId {
        let id = BlockId::from_index(self.blocks.len());
        self.block_by_name.insert(block.name().to_string(), id);
        self.blocks.push(block);
        id
    }

    /// Adds a terminal and returns its ID.
    ///
    /// Fails if the name is already taken.
    pub fn add_terminal(&mut self, terminal: Terminal) -> Result<TerminalId, DesignError> {
        if self.terminal_by_name.contains_key(&terminal.name) {
            return Err(DesignError::DuplicateTerminal(terminal.name));
        }
        Ok(self.push_terminal(terminal))
    }

    fn push_terminal(&mut self, terminal: Terminal) -> TerminalId {
        let id = TerminalId::from_index(self.terminals.len());
        self.terminal_by_name.insert(terminal.name.clone(), id);
        self.terminals.push(terminal);
        id
    }

    /// Adds a net and returns its ID.
    pub fn add_net(&mut self, net: Net) -> NetId {
        let id = NetId::from_index(self.nets.len());
        self.nets.push(net);
        id
    }

    /// Adds a keepout region and returns its ID.
    pub fn add_region(&mut self, rect: Rect) -> RegionId {
        let id = RegionId::from_index(self.regions.len());
        self.regions.push(rect);
        id
    }

    /// Adds a location guide and returns its ID.
    pub fn add_location(&mut self, location: Location) -> LocationId {
        let id = LocationId::from_index(self.locations.len());
        self.locations.push(location);
        id
    }

    /// Looks up a block by name.
    pub fn block_id(&self, name: &str) -> Option<BlockId> {
        self.block_by_name.get(name).copied()
    }

    /// Looks up a terminal by name.
    pub fn terminal_id(&self, name: &str) -> Option<TerminalId> {
        self.terminal_by_name.get(name).copied()
    }

    /// Returns the number of hard macro blocks.
    pub fn macro_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_macro()).count()
    }

    /// Resolves a name-based design description.
    ///
    /// Checks the outline, every block's shape data and every name
    /// reference. Fanout nets are expanded into one two-pin net per sink.
    pub fn from_design(design: &DesignSpec) -> Result<Self, DesignError> {
        let outline = Outline {
            width: design.outline.width,
            height: design.outline.height,
        };
        if !(outline.width > 0.0 && outline.height > 0.0)
            || !outline.width.is_finite()
            || !outline.height.is_finite()
        {
            return Err(DesignError::InvalidOutline {
                width: outline.width,
                height: outline.height,
            });
        }
        if design.blocks.is_empty() {
            return Err(DesignError::NoBlocks);
        }

        let mut problem = Problem::new(outline);
        for spec in &design.blocks {
            if problem.block_id(&spec.name).is_some() {
                return Err(DesignError::DuplicateBlock(spec.name.clone()));
            }
            problem.add_block(resolve_block(spec)?);
        }
        for spec in &design.terminals {
            problem.add_terminal(Terminal {
                name: spec.name.clone(),
                x: spec.x,
                y: spec.y,
            })?;
        }
        for (index, spec) in design.nets.iter().enumerate() {
            for net in problem.resolve_net(index, spec)? {
                problem.add_net(net);
            }
        }
        for rect in &design.regions {
            problem.add_region(*rect);
        }
        for spec in &design.locations {
            let block = problem
                .block_id(&spec.block)
                .ok_or_else(|| DesignError::UnknownLocationBlock(spec.block.clone()))?;
            problem.add_location(Location {
                block,
                rect: spec.rect,
            });
        }
        Ok(problem)
    }

    fn resolve_net(&self, index: usize, spec: &NetSpec) -> Result<Vec<Net>, DesignError> {
        match spec {
            NetSpec::Explicit {
                blocks,
                terminals,
                weight,
            } => {
                let blocks = blocks
                    .iter()
                    .map(|name| {
                        self.block_id(name).ok_or_else(|| DesignError::UnknownNetBlock {
                            net: index,
                            name: name.clone(),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                let terminals = terminals
                    .iter()
                    .map(|name| {
                        self.terminal_id(name)
                            .ok_or_else(|| DesignError::UnknownNetTerminal {
                                net: index,
                                name: name.clone(),
                            })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(vec![Net {
                    blocks,
                    terminals,
                    weight: *weight,
                }])
            }
            NetSpec::Fanout { source, sinks } => sinks
                .iter()
                .map(|sink| {
                    let mut net = Net {
                        blocks: Vec::new(),
                        terminals: Vec::new(),
                        weight: sink.weight,
                    };
                    self.attach_pin(index, source, &mut net)?;
                    self.attach_pin(index, &sink.name, &mut net)?;
                    Ok(net)
                })
                .collect(),
        }
    }

    /// Adds a fanout pin to `net`: a terminal if the name is a terminal,
    /// otherwise a block.
    fn attach_pin(&self, index: usize, name: &str, net: &mut Net) -> Result<(), DesignError> {
        if let Some(terminal) = self.terminal_id(name) {
            net.terminals.push(terminal);
            return Ok(());
        }
        let block = self
            .block_id(name)
            .ok_or_else(|| DesignError::UnknownNetBlock {
                net: index,
                name: name.to_string(),
            })?;
        net.blocks.push(block);
        Ok(())
    }
}

fn resolve_block(spec: &BlockSpec) -> Result<Block, DesignError> {
    let name = spec.name.clone();
    if spec.num_macro > 0 {
        let valid = !spec.shapes.is_empty()
            && spec
                .shapes
                .iter()
                .all(|&(w, h)| w > 0.0 && h > 0.0 && w.is_finite() && h.is_finite());
        if !valid {
            return Err(DesignError::InvalidShapes(name));
        }
        let (w, h) = spec.shapes[0];
        let area = spec.area.unwrap_or(w * h);
        check_area(&name, area)?;
        return Ok(Block::hard(name, area, spec.num_macro, spec.shapes.clone()));
    }

    let area = spec.area.ok_or_else(|| DesignError::MissingArea(name.clone()))?;
    check_area(&name, area)?;
    if spec.aspect_ratios.is_empty() {
        return Err(DesignError::InvalidAspectRatio {
            name,
            range: "(none)".to_string(),
        });
    }
    for &(low, high) in &spec.aspect_ratios {
        if !(low > 0.0 && low <= high && high.is_finite()) {
            return Err(DesignError::InvalidAspectRatio {
                name,
                range: format!("[{low}, {high}]"),
            });
        }
    }
    Ok(Block::soft(name, area, spec.aspect_ratios.clone()))
}

fn check_area(name: &str, area: f64) -> Result<(), DesignError> {
    if area > 0.0 && area.is_finite() {
        Ok(())
    } else {
        Err(DesignError::InvalidArea {
            name: name.to_string(),
            area,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use acre_config::{load_design_from_str, DesignFormat};

    fn design(toml: &str) -> DesignSpec {
        load_design_from_str(toml, DesignFormat::Toml).unwrap()
    }

    const BASE: &str = r#"
[outline]
width = 120.0
height = 60.0

[[blocks]]
name = "cpu"
area = 800.0
aspect_ratios = [[0.5, 2.0]]

[[blocks]]
name = "sram"
num_macro = 1
shapes = [[20.0, 10.0]]
"#;

    #[test]
    fn standard_terminal_positions() {
        let terminals = standard_terminals(Outline {
            width: 60.0,
            height: 120.0,
        });
        assert_eq!(terminals.len(), 12);
        let find = |name: &str| terminals.iter().find(|t| t.name == name).unwrap();
        assert_eq!((find("LL").x, find("LL").y), (0.0, 20.0));
        assert_eq!((find("RM").x, find("RM").y), (60.0, 60.0));
        assert_eq!((find("BU").x, find("BU").y), (50.0, 0.0));
        assert_eq!((find("TL").x, find("TL").y), (10.0, 120.0));
    }

    #[test]
    fn resolves_blocks_and_defaults() {
        let problem = Problem::from_design(&design(BASE)).unwrap();
        assert_eq!(problem.blocks.len(), 2);
        assert_eq!(problem.macro_count(), 1);
        let sram = &problem.blocks[problem.block_id("sram").unwrap().index()];
        assert_eq!(sram.area(), 200.0);
        assert_eq!((sram.width(), sram.height()), (20.0, 10.0));
        assert_eq!(problem.terminals.len(), 12);
    }

    #[test]
    fn fanout_net_expands_per_sink() {
        let toml = format!(
            "{BASE}\n[[nets]]\nsource = \"cpu\"\nsinks = [{{ name = \"sram\", weight = 4 }}, {{ name = \"TM\" }}]\n"
        );
        let problem = Problem::from_design(&design(&toml)).unwrap();
        assert_eq!(problem.nets.len(), 2);
        let cpu = problem.block_id("cpu").unwrap();
        let sram = problem.block_id("sram").unwrap();
        assert_eq!(problem.nets[0].blocks, vec![cpu, sram]);
        assert_eq!(problem.nets[0].weight, 4);
        assert_eq!(problem.nets[1].blocks, vec![cpu]);
        assert_eq!(
            problem.nets[1].terminals,
            vec![problem.terminal_id("TM").unwrap()]
        );
    }

    #[test]
    fn unknown_net_block_rejected() {
        let toml = format!("{BASE}\n[[nets]]\nblocks = [\"cpu\", \"gpu\"]\n");
        let err = Problem::from_design(&design(&toml)).unwrap_err();
        assert_eq!(
            err,
            DesignError::UnknownNetBlock {
                net: 0,
                name: "gpu".to_string()
            }
        );
    }

    #[test]
    fn unknown_terminal_rejected() {
        let toml = format!("{BASE}\n[[nets]]\nblocks = [\"cpu\"]\nterminals = [\"XX\"]\n");
        assert!(matches!(
            Problem::from_design(&design(&toml)),
            Err(DesignError::UnknownNetTerminal { .. })
        ));
    }

    #[test]
    fn unknown_location_block_rejected() {
        let toml = format!(
            "{BASE}\n[[locations]]\nblock = \"dsp\"\nlx = 0.0\nly = 0.0\nux = 1.0\nuy = 1.0\n"
        );
        assert_eq!(
            Problem::from_design(&design(&toml)).unwrap_err(),
            DesignError::UnknownLocationBlock("dsp".to_string())
        );
    }

    #[test]
    fn duplicate_names_rejected() {
        let toml = format!("{BASE}\n[[blocks]]\nname = \"cpu\"\narea = 1.0\naspect_ratios = [[1.0, 1.0]]\n");
        assert_eq!(
            Problem::from_design(&design(&toml)).unwrap_err(),
            DesignError::DuplicateBlock("cpu".to_string())
        );
        let toml = format!("{BASE}\n[[terminals]]\nname = \"LM\"\nx = 0.0\ny = 0.0\n");
        assert_eq!(
            Problem::from_design(&design(&toml)).unwrap_err(),
            DesignError::DuplicateTerminal("LM".to_string())
        );
    }

    #[test]
    fn bad_shapes_rejected() {
        let toml = r#"
[outline]
width = 10.0
height = 10.0

[[blocks]]
name = "m"
num_macro = 2
"#;
        assert_eq!(
            Problem::from_design(&design(toml)).unwrap_err(),
            DesignError::InvalidShapes("m".to_string())
        );

        let toml = r#"
[outline]
width = 10.0
height = 10.0

[[blocks]]
name = "s"
area = 4.0
aspect_ratios = [[2.0, 1.0]]
"#;
        assert!(matches!(
            Problem::from_design(&design(toml)),
            Err(DesignError::InvalidAspectRatio { .. })
        ));

        let toml = "[outline]\nwidth = 10.0\nheight = 10.0\n[[blocks]]\nname = \"s\"\naspect_ratios = [[1.0, 1.0]]\n";
        assert_eq!(
            Problem::from_design(&design(toml)).unwrap_err(),
            DesignError::MissingArea("s".to_string())
        );
    }

    #[test]
    fn empty_design_rejected() {
        let toml = "[outline]\nwidth = 10.0\nheight = 10.0\n";
        assert_eq!(
            Problem::from_design(&design(toml)).unwrap_err(),
            DesignError::NoBlocks
        );
    }
}
