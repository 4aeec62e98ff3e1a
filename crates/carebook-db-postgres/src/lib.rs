//! PostgreSQL storage backend for Carebook.
//!
//! One storage struct per entity, each borrowing the shared connection pool.
//! All rows are plain relational columns; enumerated columns are stored as
//! their string labels and validated by CHECK constraints in the schema.

pub mod appointment;
pub mod config;
pub mod doctor;
pub mod error;
pub mod history;
pub mod hospital;
pub mod medication;
pub mod medicine_prescription;
pub mod migrations;
pub mod pool;
pub mod prescription;
pub mod session;
pub mod slot;
pub mod user;

pub use sqlx_postgres::PgPool;

pub use appointment::{AppointmentRow, AppointmentStorage};
pub use config::PostgresConfig;
pub use doctor::{DoctorRow, DoctorStorage};
pub use error::{StorageError, StorageResult};
pub use history::{HistoryRow, HistoryStorage};
pub use hospital::{HospitalRow, HospitalStorage};
pub use medication::{MedicationRow, MedicationStorage};
pub use medicine_prescription::{MedicinePrescriptionRow, MedicinePrescriptionStorage};
pub use pool::{create_pool, test_connection};
pub use prescription::{PrescriptionRow, PrescriptionStorage};
pub use session::{SessionRow, SessionStorage};
pub use slot::{SlotRow, SlotStorage};
pub use user::{NewUser, UserRow, UserStorage};
