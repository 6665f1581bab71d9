use std::fmt;

use thiserror::Error;

/// Classification of a failure, shared by every layer of the pipeline.
///
/// Layers may wrap a failure with context but never change its kind. Only
/// the HTTP boundary folds kinds into status codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or missing input. The caller can fix it and resubmit.
    InvalidArgument,
    /// The referenced identifier does not exist.
    NotFound,
    /// The store rejected the row (type, check, or foreign-key constraint).
    ConstraintViolation,
    /// Transient infrastructure failure. Never retried by the core.
    StoreUnavailable,
    /// Anything unclassified.
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalid-argument",
            Self::NotFound => "not-found",
            Self::ConstraintViolation => "constraint-violation",
            Self::StoreUnavailable => "store-unavailable",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown campaign state: {0}")]
    UnknownCampaignState(String),
}
