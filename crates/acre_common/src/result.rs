//! Result type of the floorplanning engine.

/// Result of an engine operation.
///
/// `Err` means a violated engine precondition or a bug, never a bad design:
/// designs are checked when they are resolved, and an infeasible floorplan is
/// an `Ok` value with its feasibility flag cleared.
pub type AcreResult<T> = Result<T, InternalError>;

/// A bug or violated precondition inside the engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("internal floorplanner error: {0}")]
pub struct InternalError(String);

impl InternalError {
    /// Wraps a description of what went wrong.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// The description passed to [`new`](Self::new).
    pub fn message(&self) -> &str {
        &self.0
    }
}
