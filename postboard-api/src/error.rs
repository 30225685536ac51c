/// Error handling for the API server
///
/// All handlers return `Result<T, ApiError>`; `ApiError` renders the JSON
/// error envelope:
///
/// ```json
/// { "message": "Validation failed.", "errors": { "email": ["..."] } }
/// ```
///
/// `errors` is present only for validation failures that name a field.
///
/// Service errors are translated here and nowhere else. Unexpected failures
/// are logged with their cause and reach the client only as the
/// endpoint's generic failure message.
///
/// # Example
///
/// ```
/// use postboard_api::error::{ApiResult, ServiceResultExt};
/// use postboard_shared::error::ServiceResult;
///
/// fn handler(result: ServiceResult<u64>) -> ApiResult<u64> {
///     result.or_fail("Failed to do the thing")
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use postboard_shared::error::{ServiceError, ServiceResult};
use postboard_shared::validation::FieldErrors;
use serde::Serialize;
use std::fmt;

/// Message used when login credentials do not match
pub const INVALID_CREDENTIALS: &str = "These credentials do not match our records.";

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400), e.g. a body that is not JSON
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Not found (404)
    NotFound(String),

    /// Unprocessable entity (422) with field-keyed messages
    ValidationError {
        message: String,
        errors: FieldErrors,
    },

    /// Internal server error (500); holds the client-facing message only
    InternalError(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub message: String,

    /// Field-keyed validation messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl ApiError {
    /// Validation failure with the default message
    pub fn validation(errors: FieldErrors) -> Self {
        ApiError::ValidationError {
            message: "Validation failed.".to_string(),
            errors,
        }
    }

    /// Missing or invalid bearer token
    pub fn unauthenticated() -> Self {
        ApiError::Unauthorized("Unauthenticated.".to_string())
    }

    /// Translates a service error
    ///
    /// `failure` is the generic message sent to the client when the error is
    /// unexpected; the underlying cause is logged instead.
    pub fn from_service(err: ServiceError, failure: &str) -> Self {
        match err {
            ServiceError::Validation(errors) => ApiError::validation(errors),
            ServiceError::InvalidCredentials => ApiError::ValidationError {
                message: INVALID_CREDENTIALS.to_string(),
                errors: FieldErrors::single("email", INVALID_CREDENTIALS),
            },
            ServiceError::Unauthenticated => ApiError::unauthenticated(),
            ServiceError::NotFound(resource) => ApiError::NotFound(format!("{} not found", resource)),
            ServiceError::Unexpected(cause) => {
                tracing::error!(error = ?cause, "{}", failure);
                ApiError::InternalError(failure.to_string())
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ValidationError { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::ValidationError { errors, .. } => {
                write!(f, "Validation failed: {} fields", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            ApiError::ValidationError { message, errors } => ErrorResponse {
                message,
                errors: (!errors.is_empty()).then_some(errors),
            },
            ApiError::BadRequest(message)
            | ApiError::Unauthorized(message)
            | ApiError::NotFound(message)
            | ApiError::InternalError(message) => ErrorResponse {
                message,
                errors: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError::from_service(err, "An internal error occurred")
    }
}

/// Attaches an endpoint-specific failure message to service results
pub trait ServiceResultExt<T> {
    fn or_fail(self, failure: &str) -> ApiResult<T>;
}

impl<T> ServiceResultExt<T> for ServiceResult<T> {
    fn or_fail(self, failure: &str) -> ApiResult<T> {
        self.map_err(|err| ApiError::from_service(err, failure))
    }
}
