use crate::types::DbId;

/// Domain error taxonomy.
///
/// Every failure an operation can surface maps to one of these. None of
/// them is retryable from inside the engine; retries are a transport
/// concern.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The referenced entity does not exist (or is not visible in the
    /// caller's workspace, which is deliberately indistinguishable).
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Malformed input. Surfaced verbatim, never retried.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A precondition was violated (duplicate seed, empty-ledger undo).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Bad credentials. The message never distinguishes a wrong password
    /// from a nonexistent workspace.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}
