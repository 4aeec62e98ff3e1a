//! HTTP handlers, one module per resource.

pub mod accounts;
pub mod appointment;
pub mod doctor;
pub mod health;
pub mod history;
pub mod hospital;
pub mod medication;
pub mod medicine_prescription;
pub mod prescription;
pub mod slot;

use carebook_api::ApiError;
use carebook_db_postgres::StorageError;

/// Maps storage failures onto HTTP errors. Database errors are logged here
/// and surface as a generic 500.
pub(crate) fn storage_error(err: StorageError) -> ApiError {
    match err {
        StorageError::NotFound { entity, id } => {
            ApiError::not_found(format!("{entity} not found: {id}"))
        }
        StorageError::Conflict { message } => ApiError::conflict(message),
        other => {
            tracing::error!(error = %other, "Storage failure");
            ApiError::internal(other.to_string())
        }
    }
}

/// Rejects a non-empty requirement on a request field.
pub(crate) fn required<'a>(value: &'a str, field: &str) -> Result<&'a str, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::bad_request(format!("{field} is required.")));
    }
    Ok(trimmed)
}

/// Fallback for unmatched routes.
pub async fn not_found() -> ApiError {
    ApiError::not_found("Not found.")
}

/// Fallback for known routes hit with the wrong verb.
pub async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed("Method not allowed.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_rejects_blank() {
        assert!(required("  ", "Username").is_err());
        assert_eq!(required(" jdoe ", "Username").unwrap(), "jdoe");
    }

    #[test]
    fn test_storage_error_mapping() {
        let err = storage_error(StorageError::not_found("Hospital", 9));
        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(err.public_message(), "Hospital not found: 9");

        let err = storage_error(StorageError::conflict("Slot is already booked."));
        assert!(matches!(err, ApiError::Conflict(_)));
    }
}
