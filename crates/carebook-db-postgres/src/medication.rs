//! Medication catalog storage.

use sqlx_postgres::PgPool;
use tracing::{debug, instrument};

use carebook_core::{DosageForm, Indication, Medication};

use crate::error::StorageResult;

const COLUMNS: &str =
    "id, name, category, dosage_form, strength, manufacturer, indication, classification";

type MedicationTuple = (i64, String, String, String, String, String, String, String);

#[derive(Debug, Clone)]
pub struct MedicationRow {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub dosage_form: DosageForm,
    pub strength: String,
    pub manufacturer: String,
    pub indication: Indication,
    pub classification: String,
}

impl MedicationRow {
    fn from_tuple(t: MedicationTuple) -> Self {
        Self {
            id: t.0,
            name: t.1,
            category: t.2,
            dosage_form: t.3.parse().unwrap_or_default(),
            strength: t.4,
            manufacturer: t.5,
            indication: t.6.parse().unwrap_or_default(),
            classification: t.7,
        }
    }

    pub fn into_medication(self) -> Medication {
        Medication {
            id: self.id,
            name: self.name,
            category: self.category,
            dosage_form: self.dosage_form,
            strength: self.strength,
            manufacturer: self.manufacturer,
            indication: self.indication,
            classification: self.classification,
        }
    }
}

/// Storage for the medication catalog.
pub struct MedicationStorage<'a> {
    pool: &'a PgPool,
}

impl<'a> MedicationStorage<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    #[instrument(skip_all, fields(name))]
    pub async fn create(
        &self,
        name: &str,
        category: &str,
        dosage_form: DosageForm,
        strength: &str,
        manufacturer: &str,
        indication: Indication,
        classification: &str,
    ) -> StorageResult<MedicationRow> {
        let sql = format!(
            "INSERT INTO medications \
                 (name, category, dosage_form, strength, manufacturer, \
                  indication, classification) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );

        let row: MedicationTuple = sqlx_core::query_as::query_as(&sql)
            .bind(name)
            .bind(category)
            .bind(dosage_form.as_str())
            .bind(strength)
            .bind(manufacturer)
            .bind(indication.as_str())
            .bind(classification)
            .fetch_one(self.pool)
            .await?;

        debug!(medication_id = row.0, "Created medication");

        Ok(MedicationRow::from_tuple(row))
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i64) -> StorageResult<Option<MedicationRow>> {
        let sql = format!("SELECT {COLUMNS} FROM medications WHERE id = $1");
        let row: Option<MedicationTuple> = sqlx_core::query_as::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(MedicationRow::from_tuple))
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> StorageResult<Vec<MedicationRow>> {
        let sql = format!("SELECT {COLUMNS} FROM medications ORDER BY name");
        let rows: Vec<MedicationTuple> = sqlx_core::query_as::query_as(&sql)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(MedicationRow::from_tuple).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_labels_parse() {
        let row = MedicationRow::from_tuple((
            1,
            "Amoxicillin".into(),
            "Antibiotic".into(),
            "Capsule".into(),
            "500mg".into(),
            "Acme Pharma".into(),
            "Infection".into(),
            "Penicillin".into(),
        ));

        assert_eq!(row.dosage_form, DosageForm::Capsule);
        assert_eq!(row.indication, Indication::Infection);

        let medication = row.into_medication();
        assert_eq!(medication.name, "Amoxicillin");
    }
}
