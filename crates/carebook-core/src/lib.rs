//! Core domain model for Carebook.
//!
//! Defines the entities of the appointment-booking domain (users, hospitals,
//! doctors, slots, appointments, prescriptions, medications) and the shared
//! error taxonomy. All persistence and HTTP concerns live in other crates.

pub mod error;
pub mod model;

pub use error::{CoreError, ErrorCategory, Result};
pub use model::{
    Appointment, AppointmentHistory, AppointmentSlot, Doctor, DosageForm, Frequency, Gender,
    Hospital, Indication, Medication, MedicinePrescription, Prescription, Role, SlotStatus,
    TimeOfDay, User,
};
