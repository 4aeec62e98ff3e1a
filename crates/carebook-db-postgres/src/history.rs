//! Appointment history storage.

use rust_decimal::Decimal;
use sqlx_postgres::PgPool;
use time::OffsetDateTime;
use tracing::{debug, instrument};

use carebook_core::AppointmentHistory;

use crate::error::StorageResult;

const COLUMNS: &str = "id, user_id, doctor_id, price, date";

type HistoryTuple = (i64, i64, i64, Decimal, OffsetDateTime);

#[derive(Debug, Clone)]
pub struct HistoryRow {
    pub id: i64,
    pub user_id: i64,
    pub doctor_id: i64,
    pub price: Decimal,
    pub date: OffsetDateTime,
}

impl HistoryRow {
    fn from_tuple(t: HistoryTuple) -> Self {
        Self {
            id: t.0,
            user_id: t.1,
            doctor_id: t.2,
            price: t.3,
            date: t.4,
        }
    }

    pub fn into_history(self) -> AppointmentHistory {
        AppointmentHistory {
            id: self.id,
            user_id: self.user_id,
            doctor_id: self.doctor_id,
            price: self.price,
            date: self.date,
        }
    }
}

/// Storage for recorded past consultations.
pub struct HistoryStorage<'a> {
    pool: &'a PgPool,
}

impl<'a> HistoryStorage<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self, price, date))]
    pub async fn create(
        &self,
        user_id: i64,
        doctor_id: i64,
        price: Decimal,
        date: OffsetDateTime,
    ) -> StorageResult<HistoryRow> {
        let sql = format!(
            "INSERT INTO appointment_histories (user_id, doctor_id, price, date) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );

        let row: HistoryTuple = sqlx_core::query_as::query_as(&sql)
            .bind(user_id)
            .bind(doctor_id)
            .bind(price)
            .bind(date)
            .fetch_one(self.pool)
            .await?;

        debug!(history_id = row.0, "Created appointment history");

        Ok(HistoryRow::from_tuple(row))
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i64) -> StorageResult<Option<HistoryRow>> {
        let sql = format!("SELECT {COLUMNS} FROM appointment_histories WHERE id = $1");
        let row: Option<HistoryTuple> = sqlx_core::query_as::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(HistoryRow::from_tuple))
    }

    /// Lists a user's history, most recent first.
    #[instrument(skip(self))]
    pub async fn list_by_user(&self, user_id: i64) -> StorageResult<Vec<HistoryRow>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM appointment_histories \
             WHERE user_id = $1 \
             ORDER BY date DESC"
        );
        let rows: Vec<HistoryTuple> = sqlx_core::query_as::query_as(&sql)
            .bind(user_id)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(HistoryRow::from_tuple).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_history() {
        let date = time::macros::datetime!(2025-05-20 14:00:00 UTC);
        let history =
            HistoryRow::from_tuple((8, 1, 2, Decimal::new(20000, 2), date)).into_history();

        assert_eq!(history.id, 8);
        assert_eq!(history.price, Decimal::new(20000, 2));
        assert_eq!(history.date, date);
    }
}
