//! Common result and error types for the Relo toolkit.

/// The standard result type for operations that can only fail on a defect.
///
/// Expected negative outcomes (no corresponding tile, an invalid placement,
/// an illegal removal) are ordinary values and never travel through this
/// type. `Err` means an entity-graph invariant was found broken, which is a
/// bug in whatever code mutated the graph.
pub type ReloResult<T> = Result<T, InternalError>;

/// An internal error indicating a broken invariant, not a user input problem.
#[derive(Debug, thiserror::Error)]
#[error("internal error: {message}")]
pub struct InternalError {
    /// Description of the violated invariant.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}
