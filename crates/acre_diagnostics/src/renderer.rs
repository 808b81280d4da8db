//! Diagnostic rendering backends.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// Produces output like:
/// ```text
/// warning[W001]: floorplan exceeds the outline after 2 restarts
///    = note: layout 120.000 x 80.000, outline 100.000 x 80.000
///    = help: enlarge the outline or lower the soft block areas
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn severity_label(&self, severity: Severity) -> String {
        if !self.color {
            return severity.to_string();
        }
        format!("\x1b[1;{}m{severity}\x1b[0m", severity.ansi_color())
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = format!(
            "{}[{}]: {}\n",
            self.severity_label(diag.severity),
            diag.code,
            diag.message
        );

        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }

        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{Category, DiagnosticCode};

    #[test]
    fn render_warning_with_notes() {
        let code = DiagnosticCode::new(Category::Warning, 1);
        let diag = Diagnostic::warning(code, "floorplan exceeds the outline")
            .with_note("layout 120 x 80")
            .with_help("enlarge the outline");

        let output = TerminalRenderer::new(false).render(&diag);

        assert!(output.starts_with("warning[W001]: floorplan exceeds the outline\n"));
        assert!(output.contains("= note: layout 120 x 80"));
        assert!(output.contains("= help: enlarge the outline"));
    }

    #[test]
    fn render_plain_note() {
        let code = DiagnosticCode::new(Category::Info, 101);
        let diag = Diagnostic::note(code, "level 0 finished");
        let output = TerminalRenderer::new(false).render(&diag);
        assert_eq!(output, "note[I101]: level 0 finished\n");
    }

    #[test]
    fn render_colored_header() {
        let code = DiagnosticCode::new(Category::Error, 1);
        let diag = Diagnostic::error(code, "boom");
        let output = TerminalRenderer::new(true).render(&diag);
        assert!(output.contains("\x1b[1;31merror\x1b[0m[E001]: boom"));
    }
}
