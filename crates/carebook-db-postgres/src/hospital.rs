//! Hospital storage.

use sqlx_postgres::PgPool;
use tracing::{debug, instrument};

use carebook_core::Hospital;

use crate::error::StorageResult;

type HospitalTuple = (i64, String, String, Option<String>);

#[derive(Debug, Clone)]
pub struct HospitalRow {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub photo: Option<String>,
}

impl HospitalRow {
    fn from_tuple(t: HospitalTuple) -> Self {
        Self {
            id: t.0,
            name: t.1,
            address: t.2,
            photo: t.3,
        }
    }

    pub fn into_hospital(self) -> Hospital {
        Hospital {
            id: self.id,
            name: self.name,
            address: self.address,
            photo: self.photo,
        }
    }
}

/// Storage for hospitals.
pub struct HospitalStorage<'a> {
    pool: &'a PgPool,
}

impl<'a> HospitalStorage<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self, name, address, photo))]
    pub async fn create(
        &self,
        name: &str,
        address: &str,
        photo: Option<&str>,
    ) -> StorageResult<HospitalRow> {
        let row: HospitalTuple = sqlx_core::query_as::query_as(
            "INSERT INTO hospitals (name, address, photo) \
             VALUES ($1, $2, $3) \
             RETURNING id, name, address, photo",
        )
        .bind(name)
        .bind(address)
        .bind(photo)
        .fetch_one(self.pool)
        .await?;

        debug!(hospital_id = row.0, "Created hospital");

        Ok(HospitalRow::from_tuple(row))
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i64) -> StorageResult<Option<HospitalRow>> {
        let row: Option<HospitalTuple> = sqlx_core::query_as::query_as(
            "SELECT id, name, address, photo FROM hospitals WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(HospitalRow::from_tuple))
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> StorageResult<Vec<HospitalRow>> {
        let rows: Vec<HospitalTuple> = sqlx_core::query_as::query_as(
            "SELECT id, name, address, photo FROM hospitals ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(HospitalRow::from_tuple).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_hospital() {
        let hospital = HospitalRow::from_tuple((
            3,
            "General Hospital".into(),
            "1 Main St".into(),
            Some("media/hospitals/gh.png".into()),
        ))
        .into_hospital();

        assert_eq!(hospital.id, 3);
        assert_eq!(hospital.name, "General Hospital");
        assert_eq!(hospital.photo.as_deref(), Some("media/hospitals/gh.png"));
    }
}
