//! Index newtypes for the entities of a floorplanning problem.
//!
//! Names in a design description are resolved to these indices once, when the
//! problem is built, so the annealing loop never performs string lookups.
//! Each id is the position of its entity in the owning vector of the problem.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Id of the entity at `index` in its owning vector.
            pub fn from_index(index: usize) -> Self {
                Self(index as u32)
            }

            /// Position in the owning vector.
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($label, " #{}"), self.0)
            }
        }
    };
}

define_id!(
    /// A block, soft cluster or hard macro.
    BlockId,
    "block"
);

define_id!(
    /// A net.
    NetId,
    "net"
);

define_id!(
    /// A fixed terminal, one of the twelve boundary terminals or a declared one.
    TerminalId,
    "terminal"
);

define_id!(
    /// A keepout region for hard macros.
    RegionId,
    "region"
);

define_id!(
    /// A location guide.
    LocationId,
    "location"
);
