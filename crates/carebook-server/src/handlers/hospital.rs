//! Hospital registration and listing.

use std::path::Path;

use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use uuid::Uuid;

use carebook_api::{ApiError, Message};
use carebook_auth::SessionAuth;
use carebook_core::Hospital;
use carebook_db_postgres::HospitalStorage;

use crate::handlers::{required, storage_error};
use crate::state::AppState;

/// POST /api/hospitals
///
/// Multipart form: `name`, `address`, optional `photo` file. The photo bytes
/// land under the media directory; only the relative reference is stored.
pub async fn add_hospital(
    State(state): State<AppState>,
    _auth: SessionAuth,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    let mut name = String::new();
    let mut address = String::new();
    let mut photo: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {e}")))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "name" => {
                name = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Invalid name field: {e}")))?;
            }
            "address" => {
                address = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Invalid address field: {e}")))?;
            }
            "photo" => {
                let file_name = field.file_name().unwrap_or("photo").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Invalid photo field: {e}")))?;
                if !bytes.is_empty() {
                    photo = Some((file_name, bytes.to_vec()));
                }
            }
            _ => {}
        }
    }

    let name = required(&name, "Name")?.to_string();
    let address = required(&address, "Address")?.to_string();

    let photo_ref = match photo {
        Some((file_name, bytes)) => Some(store_photo(&state, "hospitals", &file_name, &bytes).await?),
        None => None,
    };

    let row = HospitalStorage::new(&state.pool)
        .create(&name, &address, photo_ref.as_deref())
        .await
        .map_err(storage_error)?;

    tracing::info!(hospital_id = row.id, "Hospital added");

    Ok((
        StatusCode::CREATED,
        Json(Message::new("Hospital added successfully.")),
    ))
}

/// GET /api/hospitals
pub async fn list_hospitals(
    State(state): State<AppState>,
) -> Result<Json<Vec<Hospital>>, ApiError> {
    let rows = HospitalStorage::new(&state.pool)
        .list()
        .await
        .map_err(storage_error)?;

    Ok(Json(rows.into_iter().map(|r| r.into_hospital()).collect()))
}

/// Writes uploaded bytes under `<media_dir>/<subdir>/` with a random file
/// name and returns the relative reference.
pub(crate) async fn store_photo(
    state: &AppState,
    subdir: &str,
    original_name: &str,
    bytes: &[u8],
) -> Result<String, ApiError> {
    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("bin");
    let file_name = format!("{}.{ext}", Uuid::new_v4());

    let dir = state.media_dir.join(subdir);
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| ApiError::internal(format!("media dir creation failed: {e}")))?;
    tokio::fs::write(dir.join(&file_name), bytes)
        .await
        .map_err(|e| ApiError::internal(format!("photo write failed: {e}")))?;

    Ok(format!("{subdir}/{file_name}"))
}
