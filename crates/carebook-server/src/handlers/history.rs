//! Appointment history recording.

use axum::{Json, extract::State, http::StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use carebook_api::{ApiError, ApiJson, Message};
use carebook_auth::SessionAuth;
use carebook_db_postgres::{DoctorStorage, HistoryStorage, UserStorage};

use crate::handlers::storage_error;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddHistoryRequest {
    pub user: i64,
    pub doctor: i64,
    pub price: Decimal,
    pub date: String,
}

/// POST /api/appointment-histories
pub async fn add_history(
    State(state): State<AppState>,
    _auth: SessionAuth,
    ApiJson(req): ApiJson<AddHistoryRequest>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    let date = OffsetDateTime::parse(req.date.trim(), &Rfc3339)
        .map_err(|_| ApiError::bad_request(format!("Invalid date: {}", req.date)))?;

    UserStorage::new(&state.pool)
        .find_by_id(req.user)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| ApiError::not_found(format!("User not found: {}", req.user)))?;

    DoctorStorage::new(&state.pool)
        .find_by_id(req.doctor)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| ApiError::not_found(format!("Doctor not found: {}", req.doctor)))?;

    let row = HistoryStorage::new(&state.pool)
        .create(req.user, req.doctor, req.price, date)
        .await
        .map_err(storage_error)?;

    tracing::info!(history_id = row.id, "Appointment history recorded");

    Ok((
        StatusCode::CREATED,
        Json(Message::new("Appointment history added successfully.")),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let req: AddHistoryRequest = serde_json::from_str(
            r#"{"user":1,"doctor":2,"price":"200.00","date":"2025-05-20T14:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(req.price, Decimal::new(20000, 2));
        assert!(OffsetDateTime::parse(&req.date, &Rfc3339).is_ok());
    }
}
