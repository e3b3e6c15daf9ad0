use thiserror::Error;

use crate::models::{SessionStatus, TransitionError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("invalid session transition from {from} to {to}")]
    InvalidTransition {
        from: SessionStatus,
        to: SessionStatus,
    },
    #[error("study session {id} is {status}, reviews can only be recorded while in progress")]
    SessionNotInProgress { id: i64, status: SessionStatus },
    #[error(transparent)]
    Store(#[from] sqlx::Error),
}

impl ServiceError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<TransitionError> for ServiceError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::InvalidTransition { from, to } => Self::InvalidTransition { from, to },
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// True when the store rejected a write because a referenced row does not exist.
pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.is_foreign_key_violation()
                || db_err.message().contains("FOREIGN KEY constraint failed")
        }
        _ => false,
    }
}
