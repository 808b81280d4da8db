//! Diagnostic codes and the codes the floorplanner emits.
//!
//! | code | meaning |
//! |------|---------|
//! | `I001` | floorplanning started |
//! | `I002` | sampling finished, calibration known |
//! | `I003` | final floorplan size |
//! | `I100`..`I999` | level `n` finished, as `I(100 + n)` |
//! | `W001` | result exceeds the outline |

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix letter of a diagnostic code.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// `E`: the run could not produce a result.
    Error,
    /// `W`: the result needs attention.
    Warning,
    /// `I`: progress and summaries.
    Info,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Warning => 'W',
            Category::Info => 'I',
        }
    }
}

/// A category prefix plus a number, displayed as e.g. `I101`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

/// Highest level index with its own summary code.
const LAST_LEVEL_CODE: usize = 899;

impl DiagnosticCode {
    /// Floorplanning started.
    pub const STARTED: Self = Self::new(Category::Info, 1);
    /// Sampling finished.
    pub const SAMPLED: Self = Self::new(Category::Info, 2);
    /// Final floorplan size.
    pub const FINISHED: Self = Self::new(Category::Info, 3);
    /// The final layout exceeds the outline.
    pub const INFEASIBLE: Self = Self::new(Category::Warning, 1);

    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }

    /// Summary code of a finished level. Levels past 899 share `I999`.
    pub fn level(level: usize) -> Self {
        Self::new(Category::Info, 100 + level.min(LAST_LEVEL_CODE) as u16)
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_codes() {
        assert_eq!(DiagnosticCode::STARTED.to_string(), "I001");
        assert_eq!(DiagnosticCode::SAMPLED.to_string(), "I002");
        assert_eq!(DiagnosticCode::FINISHED.to_string(), "I003");
        assert_eq!(DiagnosticCode::INFEASIBLE.to_string(), "W001");
    }

    #[test]
    fn level_codes() {
        assert_eq!(DiagnosticCode::level(0).to_string(), "I100");
        assert_eq!(DiagnosticCode::level(17).to_string(), "I117");
        assert_eq!(DiagnosticCode::level(5000), DiagnosticCode::level(899));
        assert_eq!(DiagnosticCode::level(899).to_string(), "I999");
    }

    #[test]
    fn error_prefix() {
        assert_eq!(DiagnosticCode::new(Category::Error, 12).to_string(), "E012");
    }
}
