//! Signup, login, and logout.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use time::{Date, OffsetDateTime, macros::format_description};

use carebook_api::{ApiError, ApiJson, Message};
use carebook_auth::{SessionAuth, generate_session_token, hash_password, verify_password};
use carebook_core::{Gender, Role};
use carebook_db_postgres::{DoctorStorage, NewUser, SessionStorage, UserStorage};

use crate::handlers::{required, storage_error};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /api/signup
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SignupRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let username = required(&req.username, "Username")?;
    let password = required(&req.password, "Password")?;
    let email = required(&req.email, "Email")?;
    let first_name = required(&req.first_name, "First name")?;
    let last_name = required(&req.last_name, "Last name")?;

    let date_of_birth = req
        .date_of_birth
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(parse_date)
        .transpose()?;

    let gender = req
        .gender
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            s.parse::<Gender>()
                .map_err(|e| ApiError::bad_request(e.to_string()))
        })
        .transpose()?;

    let password_hash =
        hash_password(password).map_err(|e| ApiError::internal(format!("hashing failed: {e}")))?;

    let new_user = NewUser {
        username: username.to_string(),
        email: email.to_string(),
        password_hash,
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        date_of_birth,
        gender,
        profile_photo: None,
    };

    let row = UserStorage::new(&state.pool)
        .create(&new_user)
        .await
        .map_err(storage_error)?;

    let user = row.into_user();
    tracing::info!(user_id = user.id, "User registered");

    Ok((StatusCode::CREATED, Json(json!({ "user": user }))))
}

/// POST /api/login
///
/// Verifies the password, resolves the caller's role by the existence of a
/// linked doctor row, and issues a fresh session token.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let username = required(&req.username, "Username")?;
    let password = required(&req.password, "Password")?;

    let row = UserStorage::new(&state.pool)
        .find_by_username(username)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| ApiError::unauthorized("Invalid username or password."))?;

    let verified = verify_password(password, &row.password_hash)
        .map_err(|e| ApiError::internal(format!("hash verification failed: {e}")))?;
    if !verified {
        return Err(ApiError::unauthorized("Invalid username or password."));
    }

    let role = match DoctorStorage::new(&state.pool)
        .find_by_user_id(row.id)
        .await
        .map_err(storage_error)?
    {
        Some(doctor) => Role::Doctor {
            doctor_id: doctor.id,
        },
        None => Role::Patient,
    };

    let token = generate_session_token();
    let expires_at = OffsetDateTime::now_utc() + state.session_ttl;

    SessionStorage::new(&state.pool)
        .create(&token, row.id, role, expires_at)
        .await
        .map_err(storage_error)?;

    tracing::info!(user_id = row.id, role = role.code(), "User logged in");

    let mut user = serde_json::to_value(row.into_user())
        .map_err(|e| ApiError::internal(format!("serialization failed: {e}")))?;
    if let Value::Object(ref mut map) = user {
        map.insert("role".into(), json!(role.code()));
        map.insert("token".into(), json!(token));
    }

    Ok(Json(json!({ "user": user })))
}

/// GET /api/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: SessionAuth,
) -> Result<Json<Message>, ApiError> {
    SessionStorage::new(&state.pool)
        .delete_by_token(&auth.token)
        .await
        .map_err(storage_error)?;

    tracing::info!(user_id = auth.user_id, "User logged out");

    Ok(Json(Message::new("Logged out successfully.")))
}

fn parse_date(s: &str) -> Result<Date, ApiError> {
    Date::parse(s.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| ApiError::bad_request(format!("Invalid date_of_birth: {s}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        let date = parse_date("1990-04-12").unwrap();
        assert_eq!(date, time::macros::date!(1990 - 04 - 12));

        assert!(parse_date("12/04/1990").is_err());
        assert!(parse_date("1990-13-40").is_err());
    }

    #[test]
    fn test_signup_request_optional_fields() {
        let req: SignupRequest = serde_json::from_str(
            r#"{"first_name":"A","last_name":"B","email":"a@b.c",
                "username":"ab","password":"pw"}"#,
        )
        .unwrap();
        assert!(req.date_of_birth.is_none());
        assert!(req.gender.is_none());
    }
}
