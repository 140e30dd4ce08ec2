//! Application error types with HTTP response conversion.
//!
//! Every failure leaving a handler is an [`AppError`]. It carries a stable
//! numeric [`ErrorCode`] (what clients branch on), a human readable message,
//! optional per-field details and, for internal failures, the underlying
//! cause. The cause is logged when the response is rendered and is never
//! written to the response body.
//!
//! # Example
//!
//! ```ignore
//! use edudesk_core::AppError;
//!
//! if repo.is_name_exist(&name, None).await? {
//!     return Err(AppError::already_exists("name"));
//! }
//! ```

use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::response::{ApiResponse, Empty, Meta};

/// Stable error codes exposed in `meta.err_code`.
///
/// The numeric values are part of the public API and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    ServerError,
    ServiceUnavailable,
    TokenMissing,
    TokenExpired,
    TokenInvalid,
    BadCredentials,
    OldPasswordIncorrect,
}

impl ErrorCode {
    /// Numeric code written to `meta.err_code`.
    pub const fn code(self) -> i32 {
        match self {
            Self::BadRequest => 1000_0400,
            Self::Unauthorized => 1000_0401,
            Self::Forbidden => 1000_0403,
            Self::NotFound => 1000_0404,
            Self::Conflict => 1000_0409,
            Self::ServerError => 1000_0500,
            Self::ServiceUnavailable => 1000_0503,
            Self::TokenMissing => 2000_0001,
            Self::TokenExpired => 2000_0002,
            Self::TokenInvalid => 2000_0003,
            Self::BadCredentials => 3000_0001,
            Self::OldPasswordIncorrect => 3000_0002,
        }
    }

    /// HTTP status used when this code is returned.
    pub const fn status(self) -> StatusCode {
        match self {
            Self::BadRequest | Self::BadCredentials | Self::OldPasswordIncorrect => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthorized | Self::TokenMissing | Self::TokenExpired | Self::TokenInvalid => {
                StatusCode::UNAUTHORIZED
            }
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Message used when the caller does not supply one.
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::BadRequest => "invalid request parameters",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "permission denied",
            Self::NotFound => "resource not found",
            Self::Conflict => "resource already exists",
            Self::ServerError => "internal server error",
            Self::ServiceUnavailable => "service unavailable",
            Self::TokenMissing => "authentication token is missing",
            Self::TokenExpired => "authentication token has expired",
            Self::TokenInvalid => "authentication token is invalid",
            Self::BadCredentials => "incorrect name or password",
            Self::OldPasswordIncorrect => "old password is incorrect",
        }
    }
}

/// The error returned by every service and handler.
#[derive(Debug)]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Vec<String>,
    /// Server-side cause. Logged, never serialized.
    pub source: Option<anyhow::Error>,
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Vec::new(),
            source: None,
        }
    }

    fn from_code(code: ErrorCode) -> Self {
        Self::new(code, code.default_message())
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    /// Field validation failure carrying one message per failing rule.
    pub fn validation(message: impl Into<String>, details: Vec<String>) -> Self {
        Self::bad_request(message).with_details(details)
    }

    pub fn token_missing() -> Self {
        Self::from_code(ErrorCode::TokenMissing)
    }

    pub fn token_expired() -> Self {
        Self::from_code(ErrorCode::TokenExpired)
    }

    pub fn token_invalid() -> Self {
        Self::from_code(ErrorCode::TokenInvalid)
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, reason)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// A unique field collided with an existing row.
    pub fn already_exists(field: &str) -> Self {
        Self::new(ErrorCode::Conflict, format!("{field} already exists"))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Returned for both an unknown name and a wrong password.
    pub fn bad_credentials() -> Self {
        Self::from_code(ErrorCode::BadCredentials)
    }

    pub fn old_password_incorrect() -> Self {
        Self::from_code(ErrorCode::OldPasswordIncorrect)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Opaque internal failure. The cause stays server-side.
    pub fn internal<E>(err: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self {
            source: Some(err.into()),
            ..Self::from_code(ErrorCode::ServerError)
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)?;
        if let Some(source) = &self.source {
            write!(f, ": {source:#}")?;
        }
        Ok(())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(source) = &self.source {
            tracing::error!(
                err_code = self.code.code(),
                error = %format!("{source:#}"),
                "request failed with internal error"
            );
        }

        let body = ApiResponse {
            meta: Meta {
                err_code: self.code.code(),
                err_msg: self.message,
                err_details: self.details,
            },
            data: Empty {},
        };

        (self.code.status(), Json(body)).into_response()
    }
}
