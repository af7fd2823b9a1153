/// Domain error taxonomy
///
/// Every service operation returns [`DomainResult`]. The HTTP layer maps each
/// variant to a status code and a stable identifier; nothing below that layer
/// knows about HTTP.

use crate::auth::authorization::AuthzError;
use crate::store::StoreError;

/// Result alias for service operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Errors surfaced by domain operations
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    /// Request data failed validation
    #[error("{0}")]
    Validation(String),

    /// Request body failed field-level validation
    #[error("Request validation failed")]
    InvalidFields(#[from] validator::ValidationErrors),

    /// Caller could not be authenticated (uniform for every cause)
    #[error("Invalid or missing credentials")]
    Unauthenticated,

    /// Caller's role is not allowed to perform the operation
    #[error("{0}")]
    Forbidden(String),

    /// Resource does not exist within the caller's shop
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Resource conflicts with an existing one
    #[error("{0}")]
    Conflict(String),

    /// A sale asked for more units than are on hand
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: i32, available: i32 },

    /// Unexpected failure; the message is logged, never returned to clients
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(constraint) => {
                DomainError::Conflict(format!("Conflicts with an existing record ({})", constraint))
            }
            other => DomainError::Internal(other.to_string()),
        }
    }
}

impl From<AuthzError> for DomainError {
    fn from(err: AuthzError) -> Self {
        DomainError::Forbidden(err.to_string())
    }
}
