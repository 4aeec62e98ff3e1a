//! Appointment storage, including the atomic booking transition.

use sqlx_postgres::PgPool;
use tracing::{debug, instrument};

use carebook_core::Appointment;

use crate::error::{StorageError, StorageResult};

type AppointmentTuple = (i64, i64, i64);

#[derive(Debug, Clone)]
pub struct AppointmentRow {
    pub id: i64,
    pub slot_id: i64,
    pub user_id: i64,
}

impl AppointmentRow {
    fn from_tuple(t: AppointmentTuple) -> Self {
        Self {
            id: t.0,
            slot_id: t.1,
            user_id: t.2,
        }
    }

    pub fn into_appointment(self) -> Appointment {
        Appointment {
            id: self.id,
            slot_id: self.slot_id,
            user_id: self.user_id,
        }
    }
}

/// Storage for appointments.
pub struct AppointmentStorage<'a> {
    pool: &'a PgPool,
}

impl<'a> AppointmentStorage<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Books a slot for a user.
    ///
    /// The slot is claimed with a conditional update and the appointment row
    /// is inserted in the same transaction, so two concurrent bookings of one
    /// slot cannot both succeed. Returns a conflict when the slot is already
    /// booked and not-found when it does not exist.
    #[instrument(skip(self))]
    pub async fn book(&self, slot_id: i64, user_id: i64) -> StorageResult<AppointmentRow> {
        let mut tx = self.pool.begin().await?;

        let claimed: Option<(i64,)> = sqlx_core::query_as::query_as(
            "UPDATE appointment_slots \
             SET status = 'booked' \
             WHERE id = $1 AND status = 'available' \
             RETURNING id",
        )
        .bind(slot_id)
        .fetch_optional(&mut *tx)
        .await?;

        if claimed.is_none() {
            tx.rollback().await?;

            let exists: Option<(i64,)> = sqlx_core::query_as::query_as(
                "SELECT id FROM appointment_slots WHERE id = $1",
            )
            .bind(slot_id)
            .fetch_optional(self.pool)
            .await?;

            return Err(if exists.is_some() {
                StorageError::conflict("Slot is already booked.")
            } else {
                StorageError::not_found("Slot", slot_id)
            });
        }

        let row: AppointmentTuple = sqlx_core::query_as::query_as(
            "INSERT INTO appointments (slot_id, user_id) \
             VALUES ($1, $2) \
             RETURNING id, slot_id, user_id",
        )
        .bind(slot_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(appointment_id = row.0, slot_id, "Booked appointment");

        Ok(AppointmentRow::from_tuple(row))
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i64) -> StorageResult<Option<AppointmentRow>> {
        let row: Option<AppointmentTuple> = sqlx_core::query_as::query_as(
            "SELECT id, slot_id, user_id FROM appointments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(AppointmentRow::from_tuple))
    }

    #[instrument(skip(self))]
    pub async fn list_by_user(&self, user_id: i64) -> StorageResult<Vec<AppointmentRow>> {
        let rows: Vec<AppointmentTuple> = sqlx_core::query_as::query_as(
            "SELECT id, slot_id, user_id FROM appointments WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(AppointmentRow::from_tuple).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_appointment() {
        let appointment = AppointmentRow::from_tuple((5, 11, 9)).into_appointment();
        assert_eq!(appointment.id, 5);
        assert_eq!(appointment.slot_id, 11);
        assert_eq!(appointment.user_id, 9);
    }
}
