//! Medication catalog entry creation.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use carebook_api::{ApiError, ApiJson, Message};
use carebook_auth::SessionAuth;
use carebook_core::{DosageForm, Indication};
use carebook_db_postgres::MedicationStorage;

use crate::handlers::{required, storage_error};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddMedicationRequest {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub dosage_form: Option<String>,
    pub strength: String,
    pub manufacturer: String,
    #[serde(default)]
    pub indication: Option<String>,
    pub classification: String,
}

/// POST /api/medications
pub async fn add_medication(
    State(state): State<AppState>,
    _auth: SessionAuth,
    ApiJson(req): ApiJson<AddMedicationRequest>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    let name = required(&req.name, "Name")?;
    let category = required(&req.category, "Category")?;
    let strength = required(&req.strength, "Strength")?;
    let manufacturer = required(&req.manufacturer, "Manufacturer")?;
    let classification = required(&req.classification, "Classification")?;

    let dosage_form = match req.dosage_form.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(s) => s
            .parse::<DosageForm>()
            .map_err(|e| ApiError::bad_request(e.to_string()))?,
        None => DosageForm::default(),
    };

    let indication = match req.indication.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(s) => s
            .parse::<Indication>()
            .map_err(|e| ApiError::bad_request(e.to_string()))?,
        None => Indication::default(),
    };

    let row = MedicationStorage::new(&state.pool)
        .create(
            name,
            category,
            dosage_form,
            strength,
            manufacturer,
            indication,
            classification,
        )
        .await
        .map_err(storage_error)?;

    tracing::info!(medication_id = row.id, "Medication added");

    Ok((
        StatusCode::CREATED,
        Json(Message::new("Medication added successfully.")),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_when_fields_omitted() {
        let req: AddMedicationRequest = serde_json::from_str(
            r#"{"name":"Paracetamol","category":"Analgesic","strength":"500mg",
                "manufacturer":"Acme","classification":"OTC"}"#,
        )
        .unwrap();
        assert!(req.dosage_form.is_none());
        assert!(req.indication.is_none());
    }
}
