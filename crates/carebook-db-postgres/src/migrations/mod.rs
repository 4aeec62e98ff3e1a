//! Database migration management for the PostgreSQL storage backend.
//!
//! Migrations are embedded in the binary at compile time so no filesystem
//! access is needed at startup.

use std::borrow::Cow;

use sqlx_core::migrate::{Migration, MigrationType};
use sqlx_postgres::PgPool;
use tracing::{info, instrument};

use crate::error::{StorageError, StorageResult};

/// Embedded migrations in chronological order.
///
/// Each entry is a tuple of (version, description, sql).
macro_rules! embedded_migrations {
    () => {
        &[(
            20250301000001i64,
            "initial_schema",
            include_str!("../../migrations/20250301000001_initial_schema.sql"),
        )]
    };
}

fn build_migrations() -> Vec<Migration> {
    embedded_migrations!()
        .iter()
        .map(|(version, description, sql)| Migration {
            version: *version,
            description: Cow::Borrowed(description),
            migration_type: MigrationType::Simple,
            sql: Cow::Borrowed(sql),
            checksum: Cow::Borrowed(&[]),
            no_tx: false,
        })
        .collect()
}

/// Runs all pending database migrations.
///
/// Applied migrations are tracked in the `_sqlx_migrations` table, so
/// calling this on every startup is safe.
///
/// To add a new migration:
/// 1. Create the SQL file in the migrations/ directory
/// 2. Add an entry to the `embedded_migrations!()` macro above
///
/// # Errors
///
/// Returns an error if a migration fails to execute.
#[instrument(skip(pool))]
pub async fn run(pool: &PgPool) -> StorageResult<()> {
    let migrations = build_migrations();
    info!("Running {} embedded migration(s)", migrations.len());

    let migrator = sqlx_core::migrate::Migrator {
        migrations: Cow::Owned(migrations),
        ignore_missing: false,
        locking: true,
        no_tx: false,
    };

    migrator
        .run(pool)
        .await
        .map_err(|e| StorageError::Migration(format!("Migration failed: {e}")))?;

    info!("Database migrations completed");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_migrations_are_ordered() {
        let migrations = build_migrations();
        assert!(!migrations.is_empty());
        assert!(
            migrations
                .windows(2)
                .all(|pair| pair[0].version < pair[1].version)
        );
    }

    #[test]
    fn test_initial_schema_creates_all_tables() {
        let sql = build_migrations()[0].sql.to_string();
        for table in [
            "users",
            "hospitals",
            "doctors",
            "appointment_slots",
            "appointments",
            "appointment_histories",
            "prescriptions",
            "medications",
            "medicine_prescriptions",
            "sessions",
        ] {
            assert!(
                sql.contains(&format!("CREATE TABLE {table} (")),
                "missing table {table}"
            );
        }
    }
}
