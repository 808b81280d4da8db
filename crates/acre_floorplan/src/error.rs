//! Errors raised while resolving a design description into a problem.
//!
//! Once a [`Problem`](crate::Problem) exists the engine assumes its input is
//! consistent; every check lives here.

/// A design description that cannot be floorplanned.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DesignError {
    /// The design contains no blocks.
    #[error("design has no blocks")]
    NoBlocks,

    /// The outline has a non-positive or non-finite dimension.
    #[error("invalid outline {width} x {height}")]
    InvalidOutline {
        /// Outline width.
        width: f64,
        /// Outline height.
        height: f64,
    },

    /// Two blocks share a name.
    #[error("duplicate block `{0}`")]
    DuplicateBlock(String),

    /// Two terminals share a name, or a declared terminal shadows a standard
    /// boundary terminal.
    #[error("duplicate terminal `{0}`")]
    DuplicateTerminal(String),

    /// A block has a non-positive or non-finite area.
    #[error("block `{name}` has invalid area {area}")]
    InvalidArea {
        /// Block name.
        name: String,
        /// The offending area.
        area: f64,
    },

    /// A soft block is missing its area.
    #[error("soft block `{0}` has no area")]
    MissingArea(String),

    /// A hard macro lists no shapes, or a shape has a non-positive side.
    #[error("hard macro `{0}` needs at least one shape with positive sides")]
    InvalidShapes(String),

    /// A soft block lists no aspect-ratio range, or a range is inverted or
    /// non-positive.
    #[error("soft block `{name}` has invalid aspect ratio range {range}")]
    InvalidAspectRatio {
        /// Block name.
        name: String,
        /// Description of the offending range.
        range: String,
    },

    /// A net names a block that does not exist.
    #[error("net {net} references unknown block `{name}`")]
    UnknownNetBlock {
        /// Index of the net in the design file.
        net: usize,
        /// The unresolved name.
        name: String,
    },

    /// A net names a terminal that does not exist.
    #[error("net {net} references unknown terminal `{name}`")]
    UnknownNetTerminal {
        /// Index of the net in the design file.
        net: usize,
        /// The unresolved name.
        name: String,
    },

    /// A location guide names a block that does not exist.
    #[error("location guide references unknown block `{0}`")]
    UnknownLocationBlock(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unknown_net_block() {
        let err = DesignError::UnknownNetBlock {
            net: 3,
            name: "cpu".to_string(),
        };
        assert_eq!(format!("{err}"), "net 3 references unknown block `cpu`");
    }

    #[test]
    fn display_invalid_outline() {
        let err = DesignError::InvalidOutline {
            width: 0.0,
            height: 10.0,
        };
        assert_eq!(format!("{err}"), "invalid outline 0 x 10");
    }
}
