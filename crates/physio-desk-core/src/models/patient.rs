//! Patient models.

use serde::{Deserialize, Serialize};

/// A registered patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub date_of_birth: Option<String>,
    pub medical_notes: Option<String>,
    pub created_at: String,
}

impl Patient {
    /// Display name, "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Fields for creating a patient, or fully replacing the mutable fields of
/// an existing one. Name and phone are mandatory; the rest optional. There
/// is deliberately no uniqueness constraint on phone or email.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewPatient {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub date_of_birth: Option<String>,
    pub medical_notes: Option<String>,
}

impl NewPatient {
    /// Create with the mandatory fields; optional fields start empty.
    pub fn new(first_name: &str, last_name: &str, phone: &str) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            phone: phone.to_string(),
            ..Default::default()
        }
    }
}
