//! Diagnostic creation, severity management, and terminal rendering.
//!
//! The floorplanning engine never prints. It reports progress, per-level
//! summaries and problems as structured [`Diagnostic`] values emitted into a
//! thread-safe [`DiagnosticSink`], and front ends decide how to render them
//! (see [`TerminalRenderer`]).

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
