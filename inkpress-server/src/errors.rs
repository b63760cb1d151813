use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use inkpress_core::{ConstraintViolation, IdentityError};

pub type AppResult<T> = Result<T, AppError>;

/// HTTP-facing error: a status code and a client-safe message.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "message": self.message,
                "status": self.status.as_u16(),
            }
        }));

        (self.status, body).into_response()
    }
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Constraint(violation) => {
                let message = match violation {
                    ConstraintViolation::DuplicateEmail => {
                        "an account with this email already exists"
                    }
                    ConstraintViolation::DuplicateToken => {
                        "session token collision"
                    }
                    ConstraintViolation::DuplicateProviderAccount => {
                        "this provider account is already linked"
                    }
                    ConstraintViolation::DanglingReference => {
                        "referenced user does not exist"
                    }
                };
                Self::conflict(message)
            }
            IdentityError::InvalidCredentials => {
                Self::unauthorized("invalid email or password")
            }
            IdentityError::SessionInvalid => {
                Self::unauthorized("invalid or expired session")
            }
            IdentityError::AccountBanned => Self::forbidden("account is banned"),
            IdentityError::Forbidden(msg) => Self::forbidden(msg),
            IdentityError::NotFound(msg) => Self::not_found(msg),
            IdentityError::Validation(msg) => Self::bad_request(msg),
            // Internal details stay in the logs, not the response body.
            IdentityError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                Self::internal("internal server error")
            }
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(err.to_string())
    }
}
