//! Doctor registration and listing.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use carebook_api::{ApiError, ApiJson, Message};
use carebook_auth::SessionAuth;
use carebook_core::Doctor;
use carebook_db_postgres::{DoctorStorage, HospitalStorage};

use crate::handlers::{required, storage_error};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddDoctorRequest {
    pub license_number: String,
    pub years_of_experience: i32,
    pub qualification: String,
    pub hospital_id: i64,
}

/// POST /api/doctors
///
/// Registers the calling user as a doctor at a hospital.
pub async fn add_doctor(
    State(state): State<AppState>,
    auth: SessionAuth,
    ApiJson(req): ApiJson<AddDoctorRequest>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    let license_number = required(&req.license_number, "License number")?;
    let qualification = required(&req.qualification, "Qualification")?;
    if req.years_of_experience < 0 {
        return Err(ApiError::bad_request(
            "Years of experience must not be negative.",
        ));
    }

    HospitalStorage::new(&state.pool)
        .find_by_id(req.hospital_id)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| ApiError::not_found(format!("Hospital not found: {}", req.hospital_id)))?;

    let row = DoctorStorage::new(&state.pool)
        .create(
            auth.user_id,
            license_number,
            req.years_of_experience,
            qualification,
            req.hospital_id,
        )
        .await
        .map_err(storage_error)?;

    tracing::info!(doctor_id = row.id, user_id = auth.user_id, "Doctor added");

    Ok((
        StatusCode::CREATED,
        Json(Message::new("Doctor added successfully.")),
    ))
}

/// GET /api/doctors
pub async fn list_doctors(State(state): State<AppState>) -> Result<Json<Vec<Doctor>>, ApiError> {
    let rows = DoctorStorage::new(&state.pool)
        .list()
        .await
        .map_err(storage_error)?;

    Ok(Json(rows.into_iter().map(|r| r.into_doctor()).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let req: AddDoctorRequest = serde_json::from_str(
            r#"{"license_number":"LIC-1","years_of_experience":5,
                "qualification":"MBBS","hospital_id":2}"#,
        )
        .unwrap();
        assert_eq!(req.license_number, "LIC-1");
        assert_eq!(req.hospital_id, 2);
    }
}
