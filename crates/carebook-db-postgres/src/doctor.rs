//! Doctor storage.

use sqlx_postgres::PgPool;
use tracing::{debug, instrument};

use carebook_core::Doctor;

use crate::error::{StorageResult, map_unique_violation};

const COLUMNS: &str = "id, user_id, license_number, years_of_experience, qualification, hospital_id";

type DoctorTuple = (i64, i64, String, i32, String, i64);

#[derive(Debug, Clone)]
pub struct DoctorRow {
    pub id: i64,
    pub user_id: i64,
    pub license_number: String,
    pub years_of_experience: i32,
    pub qualification: String,
    pub hospital_id: i64,
}

impl DoctorRow {
    fn from_tuple(t: DoctorTuple) -> Self {
        Self {
            id: t.0,
            user_id: t.1,
            license_number: t.2,
            years_of_experience: t.3,
            qualification: t.4,
            hospital_id: t.5,
        }
    }

    pub fn into_doctor(self) -> Doctor {
        Doctor {
            id: self.id,
            user_id: self.user_id,
            license_number: self.license_number,
            years_of_experience: self.years_of_experience,
            qualification: self.qualification,
            hospital_id: self.hospital_id,
        }
    }
}

/// Storage for doctor profiles.
pub struct DoctorStorage<'a> {
    pool: &'a PgPool,
}

impl<'a> DoctorStorage<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new doctor profile. A user can hold at most one profile and
    /// license numbers are unique; both violations map to conflicts.
    #[instrument(skip(self, license_number, qualification))]
    pub async fn create(
        &self,
        user_id: i64,
        license_number: &str,
        years_of_experience: i32,
        qualification: &str,
        hospital_id: i64,
    ) -> StorageResult<DoctorRow> {
        let sql = format!(
            "INSERT INTO doctors \
                 (user_id, license_number, years_of_experience, qualification, hospital_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );

        let row: DoctorTuple = sqlx_core::query_as::query_as(&sql)
            .bind(user_id)
            .bind(license_number)
            .bind(years_of_experience)
            .bind(qualification)
            .bind(hospital_id)
            .fetch_one(self.pool)
            .await
            .map_err(|e| {
                map_unique_violation(
                    e,
                    &[
                        ("doctors_user_id_key", "User is already a doctor."),
                        (
                            "doctors_license_number_key",
                            "License number already registered.",
                        ),
                    ],
                    "Doctor already exists.",
                )
            })?;

        debug!(doctor_id = row.0, "Created doctor");

        Ok(DoctorRow::from_tuple(row))
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i64) -> StorageResult<Option<DoctorRow>> {
        let sql = format!("SELECT {COLUMNS} FROM doctors WHERE id = $1");
        let row: Option<DoctorTuple> = sqlx_core::query_as::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(DoctorRow::from_tuple))
    }

    /// Looks up the doctor profile linked to a user account, if any. Used at
    /// login to decide the caller's role.
    #[instrument(skip(self))]
    pub async fn find_by_user_id(&self, user_id: i64) -> StorageResult<Option<DoctorRow>> {
        let sql = format!("SELECT {COLUMNS} FROM doctors WHERE user_id = $1");
        let row: Option<DoctorTuple> = sqlx_core::query_as::query_as(&sql)
            .bind(user_id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(DoctorRow::from_tuple))
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> StorageResult<Vec<DoctorRow>> {
        let sql = format!("SELECT {COLUMNS} FROM doctors ORDER BY id");
        let rows: Vec<DoctorTuple> = sqlx_core::query_as::query_as(&sql)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(DoctorRow::from_tuple).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_doctor() {
        let doctor =
            DoctorRow::from_tuple((2, 9, "LIC-100".into(), 12, "MBBS".into(), 4)).into_doctor();

        assert_eq!(doctor.id, 2);
        assert_eq!(doctor.user_id, 9);
        assert_eq!(doctor.years_of_experience, 12);
        assert_eq!(doctor.hospital_id, 4);
    }
}
