//! Shared foundational types used across the Acre floorplanner.
//!
//! This crate provides opaque index newtypes for floorplan entities, the
//! axis-aligned [`Rect`] primitive, and the common result type.

#![warn(missing_docs)]

pub mod geom;
pub mod ids;
pub mod result;

pub use geom::Rect;
pub use ids::{BlockId, LocationId, NetId, RegionId, TerminalId};
pub use result::{AcreResult, InternalError};
