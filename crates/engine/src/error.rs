//! Service-level error type.

use brigade_core::heap::QueueCorruption;
use brigade_core::CoreError;
use brigade_db::StoreError;

/// Error surfaced by every engine operation.
///
/// Wraps [`CoreError`] for the domain taxonomy and adds the storage and
/// corruption cases the service layer owns.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A domain-level error (validation, not-found, conflict, auth).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A storage backend failure. The operation left state unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Persisted rows for a workspace cannot form a valid queue. The
    /// workspace is refused service until the rows are repaired; other
    /// workspaces are unaffected.
    #[error("corrupt workspace state: {0}")]
    CorruptState(String),

    /// An unexpected internal failure (e.g. the password hasher).
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<QueueCorruption> for EngineError {
    fn from(err: QueueCorruption) -> Self {
        EngineError::CorruptState(err.to_string())
    }
}

/// Convenience alias for operation return values.
pub type EngineResult<T> = Result<T, EngineError>;
