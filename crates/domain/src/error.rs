//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`FieldOpsError`] via `#[from]` / `From` implementations.

/// Top-level error returned by ports and services.
#[derive(Debug, thiserror::Error)]
pub enum FieldOpsError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// Opaque failure from a storage adapter.
    #[error("storage error: {0}")]
    Storage(Box<dyn std::error::Error + Send + Sync>),
}

/// A domain invariant was violated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("unknown action type `{0}`")]
    UnknownActionType(String),

    #[error("action config must be a JSON object (action #{sequence_order})")]
    ConfigNotAnObject { sequence_order: i32 },

    #[error("invalid identifier `{0}`")]
    InvalidId(String),
}

/// A looked-up record does not exist (or is not visible to the caller).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}
