//! Appointment slot storage.

use rust_decimal::Decimal;
use sqlx_postgres::PgPool;
use time::OffsetDateTime;
use tracing::{debug, instrument};

use carebook_core::{AppointmentSlot, SlotStatus};

use crate::error::StorageResult;

const COLUMNS: &str = "id, doctor_id, start_time, price, status";

type SlotTuple = (i64, i64, OffsetDateTime, Decimal, String);

#[derive(Debug, Clone)]
pub struct SlotRow {
    pub id: i64,
    pub doctor_id: i64,
    pub start_time: OffsetDateTime,
    pub price: Decimal,
    pub status: SlotStatus,
}

impl SlotRow {
    fn from_tuple(t: SlotTuple) -> Self {
        Self {
            id: t.0,
            doctor_id: t.1,
            start_time: t.2,
            price: t.3,
            status: t.4.parse().unwrap_or_default(),
        }
    }

    pub fn into_slot(self) -> AppointmentSlot {
        AppointmentSlot {
            id: self.id,
            doctor_id: self.doctor_id,
            start_time: self.start_time,
            price: self.price,
            status: self.status,
        }
    }
}

/// Storage for appointment slots.
pub struct SlotStorage<'a> {
    pool: &'a PgPool,
}

impl<'a> SlotStorage<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new slot. Slots always start out available.
    #[instrument(skip(self, start_time, price))]
    pub async fn create(
        &self,
        doctor_id: i64,
        start_time: OffsetDateTime,
        price: Decimal,
    ) -> StorageResult<SlotRow> {
        let sql = format!(
            "INSERT INTO appointment_slots (doctor_id, start_time, price, status) \
             VALUES ($1, $2, $3, 'available') \
             RETURNING {COLUMNS}"
        );

        let row: SlotTuple = sqlx_core::query_as::query_as(&sql)
            .bind(doctor_id)
            .bind(start_time)
            .bind(price)
            .fetch_one(self.pool)
            .await?;

        debug!(slot_id = row.0, "Created appointment slot");

        Ok(SlotRow::from_tuple(row))
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i64) -> StorageResult<Option<SlotRow>> {
        let sql = format!("SELECT {COLUMNS} FROM appointment_slots WHERE id = $1");
        let row: Option<SlotTuple> = sqlx_core::query_as::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(SlotRow::from_tuple))
    }

    /// Lists slots for one doctor, soonest first.
    #[instrument(skip(self))]
    pub async fn list_by_doctor(&self, doctor_id: i64) -> StorageResult<Vec<SlotRow>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM appointment_slots \
             WHERE doctor_id = $1 \
             ORDER BY start_time"
        );
        let rows: Vec<SlotTuple> = sqlx_core::query_as::query_as(&sql)
            .bind(doctor_id)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(SlotRow::from_tuple).collect())
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> StorageResult<Vec<SlotRow>> {
        let sql = format!("SELECT {COLUMNS} FROM appointment_slots ORDER BY start_time");
        let rows: Vec<SlotTuple> = sqlx_core::query_as::query_as(&sql)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(SlotRow::from_tuple).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_label_parsing() {
        let t = time::macros::datetime!(2025-06-01 09:30:00 UTC);
        let row = SlotRow::from_tuple((1, 2, t, Decimal::new(15050, 2), "booked".into()));
        assert_eq!(row.status, SlotStatus::Booked);

        let slot = row.into_slot();
        assert_eq!(slot.price, Decimal::new(15050, 2));
        assert_eq!(slot.status, SlotStatus::Booked);
    }
}
