//! Prescription storage.

use sqlx_postgres::PgPool;
use tracing::{debug, instrument};

use carebook_core::Prescription;

use crate::error::StorageResult;

type PrescriptionTuple = (i64, i64, String);

#[derive(Debug, Clone)]
pub struct PrescriptionRow {
    pub id: i64,
    pub appointment_history_id: i64,
    pub notes: String,
}

impl PrescriptionRow {
    fn from_tuple(t: PrescriptionTuple) -> Self {
        Self {
            id: t.0,
            appointment_history_id: t.1,
            notes: t.2,
        }
    }

    pub fn into_prescription(self) -> Prescription {
        Prescription {
            id: self.id,
            appointment_history_id: self.appointment_history_id,
            notes: self.notes,
        }
    }
}

/// Storage for prescriptions.
pub struct PrescriptionStorage<'a> {
    pool: &'a PgPool,
}

impl<'a> PrescriptionStorage<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self, notes))]
    pub async fn create(
        &self,
        appointment_history_id: i64,
        notes: &str,
    ) -> StorageResult<PrescriptionRow> {
        let row: PrescriptionTuple = sqlx_core::query_as::query_as(
            "INSERT INTO prescriptions (appointment_history_id, notes) \
             VALUES ($1, $2) \
             RETURNING id, appointment_history_id, notes",
        )
        .bind(appointment_history_id)
        .bind(notes)
        .fetch_one(self.pool)
        .await?;

        debug!(prescription_id = row.0, "Created prescription");

        Ok(PrescriptionRow::from_tuple(row))
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i64) -> StorageResult<Option<PrescriptionRow>> {
        let row: Option<PrescriptionTuple> = sqlx_core::query_as::query_as(
            "SELECT id, appointment_history_id, notes FROM prescriptions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(PrescriptionRow::from_tuple))
    }

    #[instrument(skip(self))]
    pub async fn list_by_history(
        &self,
        appointment_history_id: i64,
    ) -> StorageResult<Vec<PrescriptionRow>> {
        let rows: Vec<PrescriptionTuple> = sqlx_core::query_as::query_as(
            "SELECT id, appointment_history_id, notes FROM prescriptions \
             WHERE appointment_history_id = $1 \
             ORDER BY id",
        )
        .bind(appointment_history_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(PrescriptionRow::from_tuple).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_prescription() {
        let prescription =
            PrescriptionRow::from_tuple((4, 8, "Rest and fluids.".into())).into_prescription();
        assert_eq!(prescription.id, 4);
        assert_eq!(prescription.appointment_history_id, 8);
        assert_eq!(prescription.notes, "Rest and fluids.");
    }
}
