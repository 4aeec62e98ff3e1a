//! Domain entities and enumerations.
//!
//! These types are the canonical shapes exchanged between the storage layer
//! and the HTTP handlers. Enumerated columns are stored as their string
//! labels, so every enum here round-trips through `as_str`/`FromStr` as well
//! as serde.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::error::CoreError;

time::serde::format_description!(date_format, Date, "[year]-[month]-[day]");

// =============================================================================
// Enumerations
// =============================================================================

/// Gender recorded on a user profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Self::Male),
            "Female" => Ok(Self::Female),
            "Other" => Ok(Self::Other),
            _ => Err(CoreError::invalid_value("gender", s)),
        }
    }
}

/// Lifecycle of an appointment slot. A slot moves available -> booked at
/// most once; the transition is enforced by the storage layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    #[default]
    Available,
    Booked,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Booked => "booked",
        }
    }
}

impl std::str::FromStr for SlotStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "booked" => Ok(Self::Booked),
            _ => Err(CoreError::invalid_value("status", s)),
        }
    }
}

/// Dosage form of a catalog medication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DosageForm {
    Cream,
    Injection,
    Ointment,
    Syrup,
    #[default]
    Tablet,
    Inhaler,
    Capsule,
    Drops,
}

impl DosageForm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cream => "Cream",
            Self::Injection => "Injection",
            Self::Ointment => "Ointment",
            Self::Syrup => "Syrup",
            Self::Tablet => "Tablet",
            Self::Inhaler => "Inhaler",
            Self::Capsule => "Capsule",
            Self::Drops => "Drops",
        }
    }
}

impl std::str::FromStr for DosageForm {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Cream" => Ok(Self::Cream),
            "Injection" => Ok(Self::Injection),
            "Ointment" => Ok(Self::Ointment),
            "Syrup" => Ok(Self::Syrup),
            "Tablet" => Ok(Self::Tablet),
            "Inhaler" => Ok(Self::Inhaler),
            "Capsule" => Ok(Self::Capsule),
            "Drops" => Ok(Self::Drops),
            _ => Err(CoreError::invalid_value("dosage_form", s)),
        }
    }
}

/// Primary indication of a catalog medication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Indication {
    Virus,
    Infection,
    Wound,
    #[default]
    Pain,
    Fungus,
    Diabetes,
    Depression,
    Fever,
}

impl Indication {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Virus => "Virus",
            Self::Infection => "Infection",
            Self::Wound => "Wound",
            Self::Pain => "Pain",
            Self::Fungus => "Fungus",
            Self::Diabetes => "Diabetes",
            Self::Depression => "Depression",
            Self::Fever => "Fever",
        }
    }
}

impl std::str::FromStr for Indication {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Virus" => Ok(Self::Virus),
            "Infection" => Ok(Self::Infection),
            "Wound" => Ok(Self::Wound),
            "Pain" => Ok(Self::Pain),
            "Fungus" => Ok(Self::Fungus),
            "Diabetes" => Ok(Self::Diabetes),
            "Depression" => Ok(Self::Depression),
            "Fever" => Ok(Self::Fever),
            _ => Err(CoreError::invalid_value("indication", s)),
        }
    }
}

/// Dosing frequency for a prescribed medicine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Frequency {
    #[default]
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "Morning",
            Self::Afternoon => "Afternoon",
            Self::Evening => "Evening",
            Self::Night => "Night",
        }
    }
}

impl std::str::FromStr for Frequency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Morning" => Ok(Self::Morning),
            "Afternoon" => Ok(Self::Afternoon),
            "Evening" => Ok(Self::Evening),
            "Night" => Ok(Self::Night),
            _ => Err(CoreError::invalid_value("frequency", s)),
        }
    }
}

/// Time-of-day label for the multi-valued "when" field of a medicine
/// prescription. Same labels as [`Frequency`] but selected zero-or-more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "Morning",
            Self::Afternoon => "Afternoon",
            Self::Evening => "Evening",
            Self::Night => "Night",
        }
    }
}

impl std::str::FromStr for TimeOfDay {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Morning" => Ok(Self::Morning),
            "Afternoon" => Ok(Self::Afternoon),
            "Evening" => Ok(Self::Evening),
            "Night" => Ok(Self::Night),
            _ => Err(CoreError::invalid_value("when", s)),
        }
    }
}

/// Caller role, resolved once at login and carried on the session.
///
/// A user is a doctor iff a doctor row linked to their account exists at
/// login time; the role is never re-derived per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Patient,
    Doctor { doctor_id: i64 },
}

impl Role {
    /// Single-letter code used in session rows and login responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Patient => "P",
            Self::Doctor { .. } => "D",
        }
    }

    /// Reconstruct a role from its stored code and optional doctor id.
    pub fn from_parts(code: &str, doctor_id: Option<i64>) -> Result<Self, CoreError> {
        match (code, doctor_id) {
            ("P", _) => Ok(Self::Patient),
            ("D", Some(id)) => Ok(Self::Doctor { doctor_id: id }),
            ("D", None) => Err(CoreError::invalid_value("role", "D without doctor id")),
            (other, _) => Err(CoreError::invalid_value("role", other)),
        }
    }

    pub fn doctor_id(&self) -> Option<i64> {
        match self {
            Self::Patient => None,
            Self::Doctor { doctor_id } => Some(*doctor_id),
        }
    }
}

// =============================================================================
// Entities
// =============================================================================

/// A registered account. The password hash is deliberately not part of this
/// type; it never leaves the storage layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, with = "date_format::option")]
    pub date_of_birth: Option<Date>,
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hospital {
    pub id: i64,
    pub name: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

/// One-to-one extension of a user. The existence of this row is what makes
/// a user "a doctor".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    pub user_id: i64,
    pub license_number: String,
    pub years_of_experience: i32,
    pub qualification: String,
    pub hospital_id: i64,
}

/// A bookable time period offered by a doctor at a fixed price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentSlot {
    pub id: i64,
    pub doctor_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    pub price: Decimal,
    pub status: SlotStatus,
}

/// The binding of one user to one slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub slot_id: i64,
    pub user_id: i64,
}

/// An independently recorded past consultation; anchor for prescriptions.
/// Not derived from [`Appointment`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentHistory {
    pub id: i64,
    pub user_id: i64,
    pub doctor_id: i64,
    pub price: Decimal,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    pub id: i64,
    pub appointment_history_id: i64,
    pub notes: String,
}

/// Catalog entry for a known medicine, independent of any prescription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub dosage_form: DosageForm,
    pub strength: String,
    pub manufacturer: String,
    pub indication: Indication,
    pub classification: String,
}

/// Join of a prescription and a catalog medication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicinePrescription {
    pub id: i64,
    pub prescription_id: i64,
    pub medication_id: i64,
    pub dosage: String,
    pub frequency: Frequency,
    pub when: Vec<TimeOfDay>,
}
