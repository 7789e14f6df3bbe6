/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// Handlers and gates return `Result<T, ApiError>`, which converts into a
/// structured JSON body at the response boundary:
///
/// ```json
/// { "error": { "name": "Unauthorized", "message": "Request is unauthorized!" } }
/// ```
///
/// Every domain error carries a fixed name/message pair. Store and importer
/// failures are not part of the domain taxonomy; they are logged and masked
/// as a generic 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Missing, invalid, or stale credential (401)
    ///
    /// Deliberately carries no detail: the caller cannot distinguish a
    /// missing header from a bad signature or a vanished user.
    Unauthorized,

    /// Authenticated but not entitled to the task (403)
    Forbidden,

    /// Resource does not exist (404)
    NotFound(String),

    /// Registration with an email that is already taken (422)
    EmailAlreadyTaken,

    /// Login with an email no user has (422)
    EmailNotExists,

    /// Login with a password that doesn't verify (422)
    IncorrectPassword,

    /// Request payload failed validation (422)
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500); detail is logged, not exposed
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response body: `{"error": {...}}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// The error envelope
    pub error: ErrorBody,
}

/// Machine-readable error name plus human-readable message
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error name (e.g. "Unauthorized", "EmailAlreadyTaken")
    pub name: String,

    /// Human-readable error message
    pub message: String,

    /// Optional per-field validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized => write!(f, "Unauthorized"),
            ApiError::Forbidden => write!(f, "Forbidden"),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::EmailAlreadyTaken => write!(f, "Email already taken"),
            ApiError::EmailNotExists => write!(f, "Email doesn't exist"),
            ApiError::IncorrectPassword => write!(f, "Incorrect password"),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, name, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BadRequest", msg, None),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Unauthorized",
                "Request is unauthorized!".to_string(),
                None,
            ),
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                "Forbidden",
                "You're not allowed to read or write this task.".to_string(),
                None,
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NotFound", msg, None),
            ApiError::EmailAlreadyTaken => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EmailAlreadyTaken",
                "Email has already been taken!".to_string(),
                None,
            ),
            ApiError::EmailNotExists => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EmailNotExists",
                "Email doesn't exist!".to_string(),
                None,
            ),
            ApiError::IncorrectPassword => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "IncorrectPassword",
                "Password is not correct!".to_string(),
                None,
            ),
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "ValidationError",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalError",
                    "Something went wrong!".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: ErrorBody {
                name: name.to_string(),
                message,
                details,
            },
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
///
/// A unique-constraint violation on the email column is the loser of a
/// concurrent-registration race and maps to `EmailAlreadyTaken`; everything
/// else is internal.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        if taskbox_shared::models::user::is_unique_email_violation(&err) {
            return ApiError::EmailAlreadyTaken;
        }

        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert password errors to API errors
impl From<taskbox_shared::auth::password::PasswordError> for ApiError {
    fn from(err: taskbox_shared::auth::password::PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert token errors to API errors
///
/// Token creation failures are internal; everything else means the caller
/// presented a bad credential.
impl From<taskbox_shared::auth::jwt::JwtError> for ApiError {
    fn from(err: taskbox_shared::auth::jwt::JwtError) -> Self {
        match err {
            taskbox_shared::auth::jwt::JwtError::CreateError(msg) => {
                ApiError::InternalError(format!("Token creation failed: {}", msg))
            }
            _ => ApiError::Unauthorized,
        }
    }
}

/// Convert payload validation failures to API errors
impl From<validator::ValidationErrors> for ApiError {
    fn from(e: validator::ValidationErrors) -> Self {
        let errors: Vec<ValidationErrorDetail> = e
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();
        ApiError::ValidationError(errors)
    }
}
