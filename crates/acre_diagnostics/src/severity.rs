//! How serious a diagnostic is.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic severity, ordered so that `Help < Note < Warning < Error`.
///
/// Front ends filter on this ordering: a quiet run keeps `Error` only, the
/// default keeps `Warning` and above.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A suggestion attached to a run.
    Help,
    /// Progress and summary reports from the floorplanner.
    Note,
    /// A usable result that needs attention, such as an infeasible layout.
    Warning,
    /// No result could be produced.
    Error,
}

impl Severity {
    /// All severities from least to most serious.
    pub const ALL: [Severity; 4] = [
        Severity::Help,
        Severity::Note,
        Severity::Warning,
        Severity::Error,
    ];

    /// Lowercase label used in rendered headers.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Help => "help",
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    /// SGR color code for terminal output.
    pub fn ansi_color(self) -> u8 {
        match self {
            Severity::Help => 32,
            Severity::Note => 36,
            Severity::Warning => 33,
            Severity::Error => 31,
        }
    }

    pub(crate) fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_sorted() {
        assert!(Severity::ALL.windows(2).all(|w| w[0] < w[1]));
        for (i, severity) in Severity::ALL.iter().enumerate() {
            assert_eq!(severity.slot(), i);
        }
    }

    #[test]
    fn labels() {
        assert_eq!(Severity::Warning.to_string(), "warning");
        assert_eq!(Severity::Note.label(), "note");
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&Severity::Error).unwrap();
        assert_eq!(json, "\"error\"");
    }
}
