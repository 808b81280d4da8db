//! Shared collector for the diagnostics of one floorplanning run.

use crate::code::DiagnosticCode;
use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Collects diagnostics in emission order.
///
/// The sink is passed by reference into the engine and may be shared with
/// worker threads. Per-severity counters are atomics so callers can ask
/// whether a run warned without locking the list.
#[derive(Default)]
pub struct DiagnosticSink {
    entries: Mutex<Vec<Diagnostic>>,
    counts: [AtomicUsize; 4],
}

impl DiagnosticSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic.
    pub fn emit(&self, diag: Diagnostic) {
        self.counts[diag.severity.slot()].fetch_add(1, Ordering::Relaxed);
        // A poisoned lock still holds every earlier entry.
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.push(diag);
    }

    /// Number of diagnostics emitted with `severity`.
    pub fn count(&self, severity: Severity) -> usize {
        self.counts[severity.slot()].load(Ordering::Relaxed)
    }

    /// Whether an error was emitted.
    pub fn has_errors(&self) -> bool {
        self.count(Severity::Error) > 0
    }

    /// The most serious severity emitted so far.
    pub fn worst(&self) -> Option<Severity> {
        Severity::ALL
            .iter()
            .rev()
            .copied()
            .find(|&s| self.count(s) > 0)
    }

    /// Whether a diagnostic with `code` was emitted.
    pub fn contains(&self, code: DiagnosticCode) -> bool {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.iter().any(|d| d.code == code)
    }

    /// Copies out every diagnostic in emission order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.clone()
    }
}
