//! Parsing and validation of `acre.toml` run parameters and design descriptions.
//!
//! [`FloorplanConfig`] holds every tunable of the annealing engine (cost
//! weights, move probabilities, schedule, parallel levels, seed). A
//! [`DesignSpec`] is the name-based description of the blocks, nets, regions
//! and locations to floorplan; it is resolved to an index-based problem by
//! the floorplanning crate.

#![warn(missing_docs)]

pub mod design;
pub mod error;
pub mod loader;
pub mod types;

pub use design::{
    BlockSpec, DesignFormat, DesignSpec, LocationSpec, NetSpec, OutlineSpec, SinkSpec,
    TerminalSpec,
};
pub use error::ConfigError;
pub use loader::{
    load_config, load_config_from_str, load_design, load_design_from_str, validate_config,
};
pub use types::*;
