//! Custom error types for the authentication layer

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::DatabaseError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Custom error type for credential and session handling
#[derive(Error, Debug)]
pub enum AuthError {
    /// Missing or malformed `Authorization` header
    #[error("Missing authorization token")]
    MissingToken,

    /// Token failed signature or expiry validation
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Token was explicitly revoked
    #[error("Token has been revoked")]
    TokenRevoked,

    /// Wrong email or password
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Input rejected by a validator
    #[error("{0}")]
    Validation(String),

    /// Password hashing backend failure or unreadable stored hash
    #[error("Password hashing error: {0}")]
    Hashing(String),

    /// Configuration error
    #[error("Auth configuration error: {0}")]
    Configuration(String),

    /// Persistence failure while consulting the revocation list
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingToken
            | AuthError::InvalidToken(_)
            | AuthError::TokenRevoked
            | AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::Database(e) if e.is_constraint_violation() => StatusCode::BAD_REQUEST,
            AuthError::Database(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            AuthError::Hashing(_) | AuthError::Configuration(_) | AuthError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let msg = if status.is_server_error() {
            error!(error = %self, "Authentication failure");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "success": false, "msg": msg }))).into_response()
    }
}

/// Type alias for authentication results
pub type AuthResult<T> = Result<T, AuthError>;
