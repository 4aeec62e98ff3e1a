//! Prescription recording.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use carebook_api::{ApiError, ApiJson, Message};
use carebook_auth::SessionAuth;
use carebook_db_postgres::{HistoryStorage, PrescriptionStorage};

use crate::handlers::{required, storage_error};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddPrescriptionRequest {
    pub appointment_history: i64,
    pub notes: String,
}

/// POST /api/prescriptions
pub async fn add_prescription(
    State(state): State<AppState>,
    _auth: SessionAuth,
    ApiJson(req): ApiJson<AddPrescriptionRequest>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    let notes = required(&req.notes, "Notes")?;

    HistoryStorage::new(&state.pool)
        .find_by_id(req.appointment_history)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| {
            ApiError::not_found(format!(
                "Appointment history not found: {}",
                req.appointment_history
            ))
        })?;

    let row = PrescriptionStorage::new(&state.pool)
        .create(req.appointment_history, notes)
        .await
        .map_err(storage_error)?;

    tracing::info!(prescription_id = row.id, "Prescription added");

    Ok((
        StatusCode::CREATED,
        Json(Message::new("Prescription added successfully.")),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let req: AddPrescriptionRequest =
            serde_json::from_str(r#"{"appointment_history":8,"notes":"Rest and fluids."}"#)
                .unwrap();
        assert_eq!(req.appointment_history, 8);
    }
}
