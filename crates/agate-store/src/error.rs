use agate_types::{EntityKind, ErrorKind, RecordId};

/// Errors from record store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No row with the requested identifier.
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: RecordId },

    /// The backend rejected the row (check, type, or foreign-key constraint).
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// The backend cannot serve the request right now.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Anything the backend reported that has no better classification.
    #[error("store error: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn not_found(kind: EntityKind, id: RecordId) -> Self {
        Self::NotFound { kind, id }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::ConstraintViolation(_) => ErrorKind::ConstraintViolation,
            Self::Unavailable(_) => ErrorKind::StoreUnavailable,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
