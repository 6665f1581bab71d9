use std::fmt;

use agate_store::StoreError;
use agate_types::{EntityKind, ErrorKind, RecordId};

/// The service operation a failure happened in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::List => "list",
            Self::Get => "get",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        })
    }
}

/// Errors from entity services.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Rejected before reaching the store.
    #[error("invalid {entity}: {reason}")]
    InvalidArgument { entity: EntityKind, reason: String },

    /// The store failed; `source` keeps its classification.
    #[error("failed to {op} {subject}: {source}")]
    Store {
        op: Operation,
        subject: String,
        #[source]
        source: StoreError,
    },
}

impl ServiceError {
    pub fn invalid(entity: EntityKind, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            entity,
            reason: reason.into(),
        }
    }

    /// Wrap a store failure with the entity, operation, and target id.
    pub fn store(
        entity: EntityKind,
        op: Operation,
        id: Option<RecordId>,
        source: StoreError,
    ) -> Self {
        let subject = match id {
            Some(id) => format!("{entity} {id}"),
            None => format!("{entity} records"),
        };
        Self::Store {
            op,
            subject,
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::Store { source, .. } => source.kind(),
        }
    }
}

/// Result alias for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_context_keeps_kind() {
        let err = ServiceError::store(
            EntityKind::Client,
            Operation::Update,
            Some(9999),
            StoreError::not_found(EntityKind::Client, 9999),
        );
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(
            err.to_string(),
            "failed to update client 9999: client 9999 not found"
        );
    }

    #[test]
    fn store_context_without_id() {
        let err = ServiceError::store(
            EntityKind::Advert,
            Operation::List,
            None,
            StoreError::Unavailable("database is locked".into()),
        );
        assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
        assert_eq!(
            err.to_string(),
            "failed to list advert records: store unavailable: database is locked"
        );
    }

    #[test]
    fn invalid_argument_message() {
        let err = ServiceError::invalid(EntityKind::StaffGrade, "grade_name is required");
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.to_string(), "invalid grade: grade_name is required");
    }
}
