use thiserror::Error;

/// Failure talking to the persistence collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// A conditional write lost to another writer.
    #[error("{entity} {id} was changed by another save")]
    Conflict { entity: &'static str, id: String },

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("DynamoDB {operation} error: {message}")]
    Backend {
        operation: &'static str,
        message: String,
    },
}

impl PersistenceError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        PersistenceError::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn conflict(entity: &'static str, id: impl Into<String>) -> Self {
        PersistenceError::Conflict {
            entity,
            id: id.into(),
        }
    }

    /// Wraps an SDK error; the SDK error types are generic so only the rendered message is kept.
    pub fn backend(operation: &'static str, err: impl std::fmt::Display) -> Self {
        PersistenceError::Backend {
            operation,
            message: err.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PersistenceError::NotFound { .. })
    }
}
