//! Session storage.
//!
//! A session row binds a bearer token to a user and the role resolved at
//! login. Tokens expire; expired rows are ignored on lookup and reaped by
//! [`SessionStorage::delete_expired`].

use sqlx_postgres::PgPool;
use time::OffsetDateTime;
use tracing::{debug, instrument};

use carebook_core::Role;

use crate::error::{StorageResult, map_unique_violation};

const COLUMNS: &str = "id, token, user_id, role, doctor_id, expires_at";

type SessionTuple = (i64, String, i64, String, Option<i64>, OffsetDateTime);

#[derive(Debug, Clone)]
pub struct SessionRow {
    pub id: i64,
    pub token: String,
    pub user_id: i64,
    pub role_code: String,
    pub doctor_id: Option<i64>,
    pub expires_at: OffsetDateTime,
}

impl SessionRow {
    fn from_tuple(t: SessionTuple) -> Self {
        Self {
            id: t.0,
            token: t.1,
            user_id: t.2,
            role_code: t.3,
            doctor_id: t.4,
            expires_at: t.5,
        }
    }

    /// The role stored on this session, or `None` if the stored code and
    /// doctor id do not form a valid role.
    pub fn role(&self) -> Option<Role> {
        Role::from_parts(&self.role_code, self.doctor_id).ok()
    }
}

/// Storage for login sessions.
pub struct SessionStorage<'a> {
    pool: &'a PgPool,
}

impl<'a> SessionStorage<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self, token))]
    pub async fn create(
        &self,
        token: &str,
        user_id: i64,
        role: Role,
        expires_at: OffsetDateTime,
    ) -> StorageResult<SessionRow> {
        let sql = format!(
            "INSERT INTO sessions (token, user_id, role, doctor_id, expires_at) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );

        let row: SessionTuple = sqlx_core::query_as::query_as(&sql)
            .bind(token)
            .bind(user_id)
            .bind(role.code())
            .bind(role.doctor_id())
            .bind(expires_at)
            .fetch_one(self.pool)
            .await
            .map_err(|e| {
                map_unique_violation(
                    e,
                    &[("sessions_token_key", "Session token collision.")],
                    "Session already exists.",
                )
            })?;

        debug!(session_id = row.0, user_id, "Created session");

        Ok(SessionRow::from_tuple(row))
    }

    /// Looks up a session by token, ignoring expired rows.
    #[instrument(skip(self, token))]
    pub async fn find_valid_by_token(&self, token: &str) -> StorageResult<Option<SessionRow>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM sessions \
             WHERE token = $1 AND expires_at > NOW()"
        );
        let row: Option<SessionTuple> = sqlx_core::query_as::query_as(&sql)
            .bind(token)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(SessionRow::from_tuple))
    }

    /// Deletes the session for a token. Returns whether a row was deleted.
    #[instrument(skip(self, token))]
    pub async fn delete_by_token(&self, token: &str) -> StorageResult<bool> {
        let result = sqlx_core::query::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Reaps expired sessions. Returns the number of rows deleted.
    #[instrument(skip(self))]
    pub async fn delete_expired(&self) -> StorageResult<u64> {
        let result = sqlx_core::query::query("DELETE FROM sessions WHERE expires_at <= NOW()")
            .execute(self.pool)
            .await?;

        if result.rows_affected() > 0 {
            debug!(deleted = result.rows_affected(), "Reaped expired sessions");
        }

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_reconstruction() {
        let expires = time::macros::datetime!(2025-06-01 00:00:00 UTC);

        let patient =
            SessionRow::from_tuple((1, "sess_a".into(), 9, "P".into(), None, expires));
        assert_eq!(patient.role(), Some(Role::Patient));

        let doctor =
            SessionRow::from_tuple((2, "sess_b".into(), 9, "D".into(), Some(4), expires));
        assert_eq!(doctor.role(), Some(Role::Doctor { doctor_id: 4 }));

        let broken = SessionRow::from_tuple((3, "sess_c".into(), 9, "D".into(), None, expires));
        assert_eq!(broken.role(), None);
    }
}
