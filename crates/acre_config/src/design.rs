//! Name-based design descriptions: outline, blocks, terminals, nets, regions
//! and location guides.
//!
//! These types only describe the input. Cross-references (a net naming a
//! block, a location naming a block) are checked when the description is
//! resolved into a floorplanning problem.

use acre_common::Rect;
use serde::Deserialize;
use std::path::Path;

/// A complete design description.
#[derive(Debug, Clone, Deserialize)]
pub struct DesignSpec {
    /// The fixed outline that the floorplan must fit in.
    pub outline: OutlineSpec,
    /// Blocks to place.
    #[serde(default)]
    pub blocks: Vec<BlockSpec>,
    /// Extra fixed terminals in addition to the standard boundary terminals.
    #[serde(default)]
    pub terminals: Vec<TerminalSpec>,
    /// Nets connecting blocks and terminals.
    #[serde(default)]
    pub nets: Vec<NetSpec>,
    /// Keepout regions for hard macros.
    #[serde(default)]
    pub regions: Vec<Rect>,
    /// Location guides binding a block to a preferred area.
    #[serde(default)]
    pub locations: Vec<LocationSpec>,
}

/// Outline dimensions. The outline's lower-left corner is the origin.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct OutlineSpec {
    /// Outline width.
    pub width: f64,
    /// Outline height.
    pub height: f64,
}

/// One placeable block.
///
/// A block with `num_macro == 0` is a soft cluster described by its area and
/// a list of `(min, max)` aspect-ratio (height / width) ranges. A block with
/// `num_macro > 0` is a hard macro restricted to the listed `(width, height)`
/// shapes; its area defaults to the area of the first shape.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockSpec {
    /// Unique block name.
    pub name: String,
    /// Block area. Required for soft blocks.
    #[serde(default)]
    pub area: Option<f64>,
    /// Number of hard macros in the block; zero for a soft block.
    #[serde(default)]
    pub num_macro: u32,
    /// Allowed aspect-ratio ranges of a soft block.
    #[serde(default)]
    pub aspect_ratios: Vec<(f64, f64)>,
    /// Allowed shapes of a hard macro, in preference order.
    #[serde(default)]
    pub shapes: Vec<(f64, f64)>,
}

/// A named fixed terminal.
#[derive(Debug, Clone, Deserialize)]
pub struct TerminalSpec {
    /// Unique terminal name.
    pub name: String,
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

/// A net, in either explicit or fanout form.
///
/// Uses serde's untagged enum: a table with `source` and `sinks` is a fanout
/// net, anything else is read as an explicit net.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NetSpec {
    /// A driver fanning out to several sinks. Each sink becomes one two-pin
    /// net with the sink's weight. Names that match a terminal are treated as
    /// terminals, all others as blocks.
    Fanout {
        /// Driver block or terminal name.
        source: String,
        /// Sinks with their connection weights.
        sinks: Vec<SinkSpec>,
    },
    /// A multi-pin net listing its blocks and terminals separately.
    Explicit {
        /// Names of connected blocks.
        #[serde(default)]
        blocks: Vec<String>,
        /// Names of connected terminals.
        #[serde(default)]
        terminals: Vec<String>,
        /// Net weight.
        #[serde(default = "default_weight")]
        weight: u32,
    },
}

/// One sink of a fanout net.
#[derive(Debug, Clone, Deserialize)]
pub struct SinkSpec {
    /// Sink block or terminal name.
    pub name: String,
    /// Connection weight.
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    1
}

/// A location guide for one block.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationSpec {
    /// Name of the guided block.
    pub block: String,
    /// Preferred area.
    #[serde(flatten)]
    pub rect: Rect,
}

/// Serialization format of a design file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesignFormat {
    /// TOML document.
    Toml,
    /// JSON document.
    Json,
}

impl DesignFormat {
    /// Picks the format from a file extension, defaulting to TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DesignFormat::Json,
            _ => DesignFormat::Toml,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_design_from_str;

    #[test]
    fn format_from_extension() {
        assert_eq!(
            DesignFormat::from_path(Path::new("chip.json")),
            DesignFormat::Json
        );
        assert_eq!(
            DesignFormat::from_path(Path::new("chip.JSON")),
            DesignFormat::Json
        );
        assert_eq!(
            DesignFormat::from_path(Path::new("chip.toml")),
            DesignFormat::Toml
        );
        assert_eq!(DesignFormat::from_path(Path::new("chip")), DesignFormat::Toml);
    }

    #[test]
    fn net_forms_are_distinguished() {
        let toml = r#"
[outline]
width = 100.0
height = 100.0

[[nets]]
blocks = ["a", "b"]
terminals = ["LM"]

[[nets]]
source = "a"
sinks = [{ name = "b", weight = 3 }, { name = "RM" }]
"#;
        let design = load_design_from_str(toml, DesignFormat::Toml).unwrap();
        match &design.nets[0] {
            NetSpec::Explicit {
                blocks,
                terminals,
                weight,
            } => {
                assert_eq!(blocks, &vec!["a".to_string(), "b".to_string()]);
                assert_eq!(terminals, &vec!["LM".to_string()]);
                assert_eq!(*weight, 1);
            }
            other => panic!("expected explicit net, got {other:?}"),
        }
        match &design.nets[1] {
            NetSpec::Fanout { source, sinks } => {
                assert_eq!(source, "a");
                assert_eq!(sinks.len(), 2);
                assert_eq!(sinks[0].weight, 3);
                assert_eq!(sinks[1].weight, 1);
            }
            other => panic!("expected fanout net, got {other:?}"),
        }
    }

    #[test]
    fn location_rect_is_flattened() {
        let json = r#"{
            "outline": { "width": 50.0, "height": 40.0 },
            "locations": [{ "block": "cpu", "lx": 1.0, "ly": 2.0, "ux": 3.0, "uy": 4.0 }]
        }"#;
        let design = load_design_from_str(json, DesignFormat::Json).unwrap();
        assert_eq!(design.locations[0].block, "cpu");
        assert_eq!(design.locations[0].rect, Rect::new(1.0, 2.0, 3.0, 4.0));
    }
}
