//! Session extractor for axum handlers.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use carebook_core::Role;
use carebook_db_postgres::{PgPool, SessionStorage};

use crate::error::AuthError;

/// State container for session authentication.
#[derive(Clone)]
pub struct AuthState {
    /// Pool used to look up session rows.
    pub pool: PgPool,
}

impl AuthState {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// An authenticated caller, resolved from the bearer token.
///
/// Extracting this from a request rejects with 401 when the token is
/// missing, malformed, expired, or unknown.
#[derive(Debug, Clone)]
pub struct SessionAuth {
    pub user_id: i64,
    /// Role recorded on the session at login time.
    pub role: Role,
    /// The raw token, kept so logout can delete its own session.
    pub token: String,
}

impl SessionAuth {
    pub fn is_doctor(&self) -> bool {
        matches!(self.role, Role::Doctor { .. })
    }
}

impl<S> FromRequestParts<S> for SessionAuth
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::MissingToken)?;

        let token = parse_bearer(header)?;

        let session = SessionStorage::new(&auth_state.pool)
            .find_valid_by_token(token)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        let role = session.role().ok_or(AuthError::InvalidToken)?;

        tracing::debug!(
            user_id = session.user_id,
            role = role.code(),
            endpoint = %parts.uri.path(),
            "Session authenticated"
        );

        Ok(SessionAuth {
            user_id: session.user_id,
            role,
            token: session.token,
        })
    }
}

/// Extracts the token from a `Bearer <token>` header value.
fn parse_bearer(header: &str) -> Result<&str, AuthError> {
    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingToken)?;
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bearer_valid() {
        assert_eq!(parse_bearer("Bearer sess_abc").unwrap(), "sess_abc");
    }

    #[test]
    fn test_parse_bearer_rejects_other_schemes() {
        assert!(parse_bearer("Basic dXNlcjpwdw==").is_err());
        assert!(parse_bearer("sess_abc").is_err());
        assert!(parse_bearer("Bearer ").is_err());
    }
}
