//! User account storage.

use sqlx_postgres::PgPool;
use time::Date;
use tracing::{debug, instrument};

use carebook_core::{Gender, User};

use crate::error::{StorageResult, map_unique_violation};

const COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, \
     date_of_birth, gender, profile_photo";

type UserTuple = (
    i64,
    String,
    String,
    String,
    String,
    String,
    Option<Date>,
    Option<String>,
    Option<String>,
);

/// A user row as stored, including the password hash. The hash stays inside
/// the storage and auth layers; [`UserRow::into_user`] drops it.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<Date>,
    pub gender: Option<Gender>,
    pub profile_photo: Option<String>,
}

impl UserRow {
    fn from_tuple(t: UserTuple) -> Self {
        Self {
            id: t.0,
            username: t.1,
            email: t.2,
            password_hash: t.3,
            first_name: t.4,
            last_name: t.5,
            date_of_birth: t.6,
            gender: t.7.and_then(|g| g.parse().ok()),
            profile_photo: t.8,
        }
    }

    /// Converts the row into the public entity, dropping the password hash.
    pub fn into_user(self) -> User {
        User {
            id: self.id,
            username: self.username,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            profile_photo: self.profile_photo,
        }
    }
}

/// Fields required to insert a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<Date>,
    pub gender: Option<Gender>,
    pub profile_photo: Option<String>,
}

/// Storage for user accounts.
pub struct UserStorage<'a> {
    pool: &'a PgPool,
}

impl<'a> UserStorage<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new user, mapping unique violations on username and email
    /// to conflicts.
    #[instrument(skip(self, user), fields(username = %user.username))]
    pub async fn create(&self, user: &NewUser) -> StorageResult<UserRow> {
        let sql = format!(
            "INSERT INTO users \
                 (username, email, password_hash, first_name, last_name, \
                  date_of_birth, gender, profile_photo) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );

        let row: UserTuple = sqlx_core::query_as::query_as(&sql)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(user.date_of_birth)
            .bind(user.gender.map(|g| g.as_str()))
            .bind(&user.profile_photo)
            .fetch_one(self.pool)
            .await
            .map_err(|e| {
                map_unique_violation(
                    e,
                    &[
                        ("users_username_key", "Username already taken."),
                        ("users_email_key", "Email already registered."),
                    ],
                    "User already exists.",
                )
            })?;

        debug!(user_id = row.0, "Created user");

        Ok(UserRow::from_tuple(row))
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i64) -> StorageResult<Option<UserRow>> {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        let row: Option<UserTuple> = sqlx_core::query_as::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(UserRow::from_tuple))
    }

    #[instrument(skip(self))]
    pub async fn find_by_username(&self, username: &str) -> StorageResult<Option<UserRow>> {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        let row: Option<UserTuple> = sqlx_core::query_as::query_as(&sql)
            .bind(username)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(UserRow::from_tuple))
    }

    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> StorageResult<Option<UserRow>> {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        let row: Option<UserTuple> = sqlx_core::query_as::query_as(&sql)
            .bind(email)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(UserRow::from_tuple))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> UserRow {
        UserRow::from_tuple((
            7,
            "jdoe".into(),
            "jdoe@example.com".into(),
            "$argon2id$fake".into(),
            "Jane".into(),
            "Doe".into(),
            None,
            Some("Female".into()),
            None,
        ))
    }

    #[test]
    fn test_into_user_drops_password_hash() {
        let user = sample_row().into_user();
        assert_eq!(user.id, 7);
        assert_eq!(user.gender, Some(Gender::Female));

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_unknown_gender_label_becomes_none() {
        let row = UserRow::from_tuple((
            1,
            "a".into(),
            "a@b.c".into(),
            "h".into(),
            "A".into(),
            "B".into(),
            None,
            Some("???".into()),
            None,
        ));
        assert_eq!(row.gender, None);
    }
}
