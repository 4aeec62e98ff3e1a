//! Medicine prescription creation.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use carebook_api::{ApiError, ApiJson, Message};
use carebook_auth::SessionAuth;
use carebook_core::{Frequency, TimeOfDay};
use carebook_db_postgres::{MedicationStorage, MedicinePrescriptionStorage, PrescriptionStorage};

use crate::handlers::{required, storage_error};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddMedicinePrescriptionRequest {
    pub prescription: i64,
    pub medicine: i64,
    pub dosage: String,
    pub frequency: String,
    /// Must be a JSON array of time-of-day labels; a non-array body is
    /// rejected during deserialization, before any row is written.
    pub when: Vec<String>,
}

/// POST /api/medication-prescriptions
pub async fn add_medicine_prescription(
    State(state): State<AppState>,
    _auth: SessionAuth,
    ApiJson(req): ApiJson<AddMedicinePrescriptionRequest>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    let dosage = required(&req.dosage, "Dosage")?;

    let frequency = required(&req.frequency, "Frequency")?
        .parse::<Frequency>()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let when = req
        .when
        .iter()
        .map(|s| {
            s.parse::<TimeOfDay>()
                .map_err(|e| ApiError::bad_request(e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    PrescriptionStorage::new(&state.pool)
        .find_by_id(req.prescription)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| {
            ApiError::not_found(format!("Prescription not found: {}", req.prescription))
        })?;

    MedicationStorage::new(&state.pool)
        .find_by_id(req.medicine)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| ApiError::not_found(format!("Medication not found: {}", req.medicine)))?;

    let row = MedicinePrescriptionStorage::new(&state.pool)
        .create(req.prescription, req.medicine, dosage, frequency, &when)
        .await
        .map_err(storage_error)?;

    tracing::info!(medicine_prescription_id = row.id, "Medicine prescription added");

    Ok((
        StatusCode::CREATED,
        Json(Message::new("Medicine prescription added successfully.")),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_when_must_be_a_list() {
        let err = serde_json::from_str::<AddMedicinePrescriptionRequest>(
            r#"{"prescription":1,"medicine":2,"dosage":"1 tablet","frequency":"Daily","when":"Morning"}"#,
        );
        assert!(err.is_err());

        let ok: AddMedicinePrescriptionRequest = serde_json::from_str(
            r#"{"prescription":1,"medicine":2,"dosage":"1 tablet","frequency":"Daily","when":["Morning","Night"]}"#,
        )
        .unwrap();
        assert_eq!(ok.when, vec!["Morning", "Night"]);
    }

    #[test]
    fn test_empty_when_list_allowed() {
        let ok: AddMedicinePrescriptionRequest = serde_json::from_str(
            r#"{"prescription":1,"medicine":2,"dosage":"5ml","frequency":"Weekly","when":[]}"#,
        )
        .unwrap();
        assert!(ok.when.is_empty());
        assert_eq!(ok.frequency, "Weekly");
    }

    #[test]
    fn test_frequency_must_be_present() {
        let err = serde_json::from_str::<AddMedicinePrescriptionRequest>(
            r#"{"prescription":1,"medicine":2,"dosage":"1 tablet","when":["Morning"]}"#,
        );
        assert!(err.is_err());
    }
}
