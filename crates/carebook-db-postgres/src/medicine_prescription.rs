//! Medicine prescription storage (the prescription-to-medication join).

use sqlx_postgres::PgPool;
use tracing::{debug, instrument};

use carebook_core::{Frequency, MedicinePrescription, TimeOfDay};

use crate::error::StorageResult;

const COLUMNS: &str = "id, prescription_id, medication_id, dosage, frequency, when_taken";

type MedicinePrescriptionTuple = (i64, i64, i64, String, String, Vec<String>);

#[derive(Debug, Clone)]
pub struct MedicinePrescriptionRow {
    pub id: i64,
    pub prescription_id: i64,
    pub medication_id: i64,
    pub dosage: String,
    pub frequency: Frequency,
    pub when: Vec<TimeOfDay>,
}

impl MedicinePrescriptionRow {
    fn from_tuple(t: MedicinePrescriptionTuple) -> Self {
        Self {
            id: t.0,
            prescription_id: t.1,
            medication_id: t.2,
            dosage: t.3,
            frequency: t.4.parse().unwrap_or_default(),
            when: t.5.iter().filter_map(|s| s.parse().ok()).collect(),
        }
    }

    pub fn into_medicine_prescription(self) -> MedicinePrescription {
        MedicinePrescription {
            id: self.id,
            prescription_id: self.prescription_id,
            medication_id: self.medication_id,
            dosage: self.dosage,
            frequency: self.frequency,
            when: self.when,
        }
    }
}

/// Storage for medicine prescriptions.
pub struct MedicinePrescriptionStorage<'a> {
    pool: &'a PgPool,
}

impl<'a> MedicinePrescriptionStorage<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self, dosage, frequency, when))]
    pub async fn create(
        &self,
        prescription_id: i64,
        medication_id: i64,
        dosage: &str,
        frequency: Frequency,
        when: &[TimeOfDay],
    ) -> StorageResult<MedicinePrescriptionRow> {
        let when_labels: Vec<String> = when.iter().map(|w| w.as_str().to_string()).collect();

        let sql = format!(
            "INSERT INTO medicine_prescriptions \
                 (prescription_id, medication_id, dosage, frequency, when_taken) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );

        let row: MedicinePrescriptionTuple = sqlx_core::query_as::query_as(&sql)
            .bind(prescription_id)
            .bind(medication_id)
            .bind(dosage)
            .bind(frequency.as_str())
            .bind(when_labels)
            .fetch_one(self.pool)
            .await?;

        debug!(medicine_prescription_id = row.0, "Created medicine prescription");

        Ok(MedicinePrescriptionRow::from_tuple(row))
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i64) -> StorageResult<Option<MedicinePrescriptionRow>> {
        let sql = format!("SELECT {COLUMNS} FROM medicine_prescriptions WHERE id = $1");
        let row: Option<MedicinePrescriptionTuple> = sqlx_core::query_as::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(MedicinePrescriptionRow::from_tuple))
    }

    #[instrument(skip(self))]
    pub async fn list_by_prescription(
        &self,
        prescription_id: i64,
    ) -> StorageResult<Vec<MedicinePrescriptionRow>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM medicine_prescriptions \
             WHERE prescription_id = $1 \
             ORDER BY id"
        );
        let rows: Vec<MedicinePrescriptionTuple> = sqlx_core::query_as::query_as(&sql)
            .bind(prescription_id)
            .fetch_all(self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(MedicinePrescriptionRow::from_tuple)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_when_labels_parse() {
        let row = MedicinePrescriptionRow::from_tuple((
            1,
            2,
            3,
            "1 tablet".into(),
            "Night".into(),
            vec!["Morning".into(), "Night".into()],
        ));

        assert_eq!(row.frequency, Frequency::Night);
        assert_eq!(row.when, vec![TimeOfDay::Morning, TimeOfDay::Night]);
    }

    #[test]
    fn test_empty_when_list() {
        let row = MedicinePrescriptionRow::from_tuple((
            1,
            2,
            3,
            "5ml".into(),
            "Morning".into(),
            vec![],
        ));
        assert!(row.when.is_empty());
    }
}
