use thiserror::Error;

/// Engine-level failures. None are fatal: `InvalidState` clears once the
/// outstanding request is resolved, `InvalidTransition` signals a caller
/// logic fault, and `InvalidEvent` rejects a malformed event payload. The
/// snapshot is never modified when an error is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    #[error("invalid event: {0}")]
    InvalidEvent(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
