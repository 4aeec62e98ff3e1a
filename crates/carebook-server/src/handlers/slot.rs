//! Appointment slot creation and listing.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use carebook_api::{ApiError, ApiJson, Message};
use carebook_auth::SessionAuth;
use carebook_core::AppointmentSlot;
use carebook_db_postgres::{DoctorStorage, SlotStorage};

use crate::handlers::storage_error;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddSlotRequest {
    pub doctor: i64,
    pub start_time: String,
    pub price: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct SlotListQuery {
    #[serde(default)]
    pub doctor: Option<i64>,
}

/// POST /api/appointment-slots
pub async fn add_slot(
    State(state): State<AppState>,
    _auth: SessionAuth,
    ApiJson(req): ApiJson<AddSlotRequest>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    let start_time = OffsetDateTime::parse(req.start_time.trim(), &Rfc3339)
        .map_err(|_| ApiError::bad_request(format!("Invalid start_time: {}", req.start_time)))?;

    DoctorStorage::new(&state.pool)
        .find_by_id(req.doctor)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| ApiError::not_found(format!("Doctor not found: {}", req.doctor)))?;

    let row = SlotStorage::new(&state.pool)
        .create(req.doctor, start_time, req.price)
        .await
        .map_err(storage_error)?;

    tracing::info!(slot_id = row.id, doctor_id = req.doctor, "Slot added");

    Ok((
        StatusCode::CREATED,
        Json(Message::new("Appointment slot added successfully.")),
    ))
}

/// GET /api/appointment-slots?doctor=<id>
pub async fn list_slots(
    State(state): State<AppState>,
    Query(query): Query<SlotListQuery>,
) -> Result<Json<Vec<AppointmentSlot>>, ApiError> {
    let storage = SlotStorage::new(&state.pool);
    let rows = match query.doctor {
        Some(doctor_id) => storage.list_by_doctor(doctor_id).await,
        None => storage.list().await,
    }
    .map_err(storage_error)?;

    Ok(Json(rows.into_iter().map(|r| r.into_slot()).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_parses_decimal_price() {
        let req: AddSlotRequest = serde_json::from_str(
            r#"{"doctor":1,"start_time":"2025-06-01T09:30:00Z","price":"150.50"}"#,
        )
        .unwrap();
        assert_eq!(req.price, Decimal::new(15050, 2));

        let parsed = OffsetDateTime::parse(&req.start_time, &Rfc3339).unwrap();
        assert_eq!(parsed.hour(), 9);
    }

    #[test]
    fn test_invalid_start_time_is_rejected_by_parse() {
        assert!(OffsetDateTime::parse("tomorrow", &Rfc3339).is_err());
    }
}
