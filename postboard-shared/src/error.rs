/// Service-level error taxonomy
///
/// Services raise these; the API layer is the only place that turns them
/// into HTTP responses.

use crate::auth::password::PasswordError;
use crate::store::StoreError;
use crate::validation::FieldErrors;

/// Error raised by the auth and post services
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Client-supplied data failed validation
    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(FieldErrors),

    /// Login credentials did not match any user
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing, malformed or revoked access token
    #[error("Unauthenticated")]
    Unauthenticated,

    /// Referenced resource does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Anything else; never shown to clients
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

/// Service result type alias
pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { field } => ServiceError::Validation(FieldErrors::single(
                field,
                format!("The {} has already been taken.", field),
            )),
            other => ServiceError::Unexpected(other.into()),
        }
    }
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        ServiceError::Unexpected(err.into())
    }
}
