use poem_openapi::{payload::Json, ApiResponse};
use std::fmt;

use crate::errors::{user_facing_message, InternalError};
use crate::types::dto::common::ErrorResponse;

/// Authentication error types (login and token validation).
#[derive(ApiResponse, Debug)]
pub enum AuthError {
    /// Invalid email or password
    #[oai(status = 401)]
    InvalidCredentials(Json<ErrorResponse>),

    /// Invalid or malformed JWT
    #[oai(status = 401)]
    InvalidToken(Json<ErrorResponse>),

    /// JWT has expired
    #[oai(status = 401)]
    ExpiredToken(Json<ErrorResponse>),

    /// Account is blocked
    #[oai(status = 403)]
    AccountBlocked(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl AuthError {
    pub fn invalid_credentials() -> Self {
        AuthError::InvalidCredentials(Json(ErrorResponse {
            error: "invalid_credentials".to_string(),
            message: "Invalid email or password".to_string(),
            status_code: 401,
        }))
    }

    pub fn invalid_token() -> Self {
        AuthError::InvalidToken(Json(ErrorResponse {
            error: "invalid_token".to_string(),
            message: "Invalid or malformed JWT".to_string(),
            status_code: 401,
        }))
    }

    pub fn expired_token() -> Self {
        AuthError::ExpiredToken(Json(ErrorResponse {
            error: "expired_token".to_string(),
            message: "JWT has expired".to_string(),
            status_code: 401,
        }))
    }

    pub fn account_blocked() -> Self {
        AuthError::AccountBlocked(Json(ErrorResponse {
            error: "account_blocked".to_string(),
            message: "This account has been blocked".to_string(),
            status_code: 403,
        }))
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        AuthError::InternalError(Json(ErrorResponse {
            error: "internal_error".to_string(),
            message: message.into(),
            status_code: 500,
        }))
    }

    pub fn message(&self) -> String {
        match self {
            AuthError::InvalidCredentials(json)
            | AuthError::InvalidToken(json)
            | AuthError::ExpiredToken(json)
            | AuthError::AccountBlocked(json)
            | AuthError::InternalError(json) => json.0.message.clone(),
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Error type for the management endpoints (users, referrals, audit logs).
#[derive(ApiResponse, Debug)]
pub enum ApiError {
    /// Request failed validation before any mutation
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),

    /// Missing or invalid authentication
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),

    /// Actor lacks permission, or the change is blocked by a business rule
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    /// Target entity does not exist
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// Request conflicts with existing state
    #[oai(status = 409)]
    Conflict(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    Internal(Json<ErrorResponse>),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(Json(ErrorResponse {
            error: "bad_request".to_string(),
            message: message.into(),
            status_code: 400,
        }))
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(Json(ErrorResponse {
            error: "unauthorized".to_string(),
            message: message.into(),
            status_code: 401,
        }))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(Json(ErrorResponse {
            error: "forbidden".to_string(),
            message: message.into(),
            status_code: 403,
        }))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(Json(ErrorResponse {
            error: "not_found".to_string(),
            message: message.into(),
            status_code: 404,
        }))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(Json(ErrorResponse {
            error: "conflict".to_string(),
            message: message.into(),
            status_code: 409,
        }))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(Json(ErrorResponse {
            error: "internal_error".to_string(),
            message: message.into(),
            status_code: 500,
        }))
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::BadRequest(json)
            | ApiError::Unauthorized(json)
            | ApiError::Forbidden(json)
            | ApiError::NotFound(json)
            | ApiError::Conflict(json)
            | ApiError::Internal(json) => json.0.message.clone(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl From<InternalError> for ApiError {
    fn from(err: InternalError) -> Self {
        let full = err.to_string();
        ApiError::internal(user_facing_message(&full).to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InternalError(json) => ApiError::Internal(json),
            AuthError::AccountBlocked(json) => ApiError::Forbidden(json),
            other => ApiError::unauthorized(other.message()),
        }
    }
}
