//! Appointment booking.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use carebook_api::{ApiError, ApiJson, Message};
use carebook_auth::SessionAuth;
use carebook_db_postgres::AppointmentStorage;

use crate::handlers::storage_error;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BookRequest {
    pub slot: i64,
}

/// POST /api/appointments
///
/// Books a slot for the calling user. The storage layer claims the slot
/// atomically, so a concurrent second booking gets a conflict.
pub async fn book_appointment(
    State(state): State<AppState>,
    auth: SessionAuth,
    ApiJson(req): ApiJson<BookRequest>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    let row = AppointmentStorage::new(&state.pool)
        .book(req.slot, auth.user_id)
        .await
        .map_err(storage_error)?;

    tracing::info!(
        appointment_id = row.id,
        slot_id = req.slot,
        user_id = auth.user_id,
        "Appointment booked"
    );

    Ok((
        StatusCode::CREATED,
        Json(Message::new("Appointment booked successfully.")),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let req: BookRequest = serde_json::from_str(r#"{"slot":11}"#).unwrap();
        assert_eq!(req.slot, 11);

        assert!(serde_json::from_str::<BookRequest>(r#"{"slot":"eleven"}"#).is_err());
    }
}
