//! Authentication error type.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use carebook_db_postgres::StorageError;

/// Errors raised while resolving a session from a request.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No usable bearer token on the request.
    #[error("Authentication credentials were not provided.")]
    MissingToken,

    /// The token does not resolve to a live session.
    #[error("Invalid or expired session token.")]
    InvalidToken,

    /// Password hashing or verification failed.
    #[error("Credential processing failed: {0}")]
    Hash(String),

    /// Session lookup failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingToken | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::Hash(_) | Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to the client. Internal detail stays in logs.
    pub fn public_message(&self) -> String {
        match self {
            Self::Hash(_) | Self::Storage(_) => "Internal server error.".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<argon2::password_hash::Error> for AuthError {
    fn from(err: argon2::password_hash::Error) -> Self {
        Self::Hash(err.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Authentication internal error");
        }
        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::MissingToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::Hash("oops".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_not_leaked() {
        let err = AuthError::Hash("salt too short".into());
        assert_eq!(err.public_message(), "Internal server error.");

        let err = AuthError::MissingToken;
        assert_eq!(
            err.public_message(),
            "Authentication credentials were not provided."
        );
    }
}
