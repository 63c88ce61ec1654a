//! Service error taxonomy and its mapping onto HTTP responses

use axum::{http::StatusCode, Json};
use sea_orm::DbErr;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;
use workdesk_auth::{JwtError, PasswordError};

use crate::models::ErrorResponse;

/// Error body shape returned by every handler
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Errors produced by the domain services
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Referenced entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// Role or company-membership violation
    #[error("{0}")]
    Forbidden(String),

    /// Duplicate name/code, booked calendar slot, already-in-company
    #[error("{0}")]
    Conflict(String),

    /// Malformed or empty input
    #[error("{0}")]
    BadRequest(String),

    /// Request fields outside their declared bounds
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    /// Credentials rejected
    #[error("{0}")]
    Unauthorized(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] JwtError),
}

impl ServiceError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        ServiceError::NotFound(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        ServiceError::Forbidden(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        ServiceError::Conflict(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        ServiceError::BadRequest(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::BadRequest(_) | ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Database(_) | ServiceError::Password(_) | ServiceError::Token(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable code placed in `ErrorResponse::code`
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => "NOT_FOUND",
            ServiceError::Forbidden(_) => "FORBIDDEN",
            ServiceError::Conflict(_) => "CONFLICT",
            ServiceError::BadRequest(_) | ServiceError::Validation(_) => "BAD_REQUEST",
            ServiceError::Unauthorized(_) => "UNAUTHORIZED",
            ServiceError::Database(_) => "DATABASE_ERROR",
            ServiceError::Password(_) | ServiceError::Token(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let status = err.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", err);
        }

        (
            status,
            Json(ErrorResponse {
                error: err.to_string(),
                code: Some(err.code().to_string()),
            }),
        )
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_keep_their_message() {
        let (status, Json(body)) = ApiError::from(ServiceError::conflict("Company already exists"));

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.error, "Company already exists");
        assert_eq!(body.code.as_deref(), Some("CONFLICT"));
    }

    #[test]
    fn test_database_error_is_echoed_as_server_error() {
        let err = ServiceError::from(DbErr::Custom("disk I/O error".to_string()));
        let (status, Json(body)) = ApiError::from(err);

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.error.starts_with("Database error:"));
        assert!(body.error.contains("disk I/O error"));
        assert_eq!(body.code.as_deref(), Some("DATABASE_ERROR"));
    }

    #[test]
    fn test_validation_errors_are_bad_requests() {
        let mut errors = ValidationErrors::new();
        errors.add("title", validator::ValidationError::new("length"));

        let (status, Json(body)) = ApiError::from(ServiceError::from(errors));

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.starts_with("Validation error:"));
        assert!(body.error.contains("title"));
        assert_eq!(body.code.as_deref(), Some("BAD_REQUEST"));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ServiceError::not_found("x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::forbidden("x").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ServiceError::bad_request("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::Unauthorized("x".to_string()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ServiceError::from(JwtError::InvalidToken).code(),
            "INTERNAL_ERROR"
        );
    }
}
