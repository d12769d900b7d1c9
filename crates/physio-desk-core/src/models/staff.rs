//! Staff account models and role capabilities.

use serde::{Deserialize, Serialize};

/// Staff role. A closed set of exactly three values; access decisions go
/// through the capability methods rather than string comparison at call
/// sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Receptionist,
    Physiotherapist,
    Admin,
}

impl Role {
    /// Stored string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Receptionist => "Receptionist",
            Role::Physiotherapist => "Physiotherapist",
            Role::Admin => "Admin",
        }
    }

    /// Parse the stored string form.
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "Receptionist" => Some(Role::Receptionist),
            "Physiotherapist" => Some(Role::Physiotherapist),
            "Admin" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Staff accounts may only be created, deleted or reset by an admin.
    pub fn can_manage_staff(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Treatment outcomes (completed / no-show) are recorded by clinicians
    /// and admins; receptionists only book and cancel.
    pub fn can_record_outcomes(&self) -> bool {
        matches!(self, Role::Physiotherapist | Role::Admin)
    }
}

/// A staff login account. The password hash is intentionally not part of
/// this type; only the authentication path reads it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StaffAccount {
    pub id: i64,
    /// External 5-digit staff identifier, unique across the clinic.
    pub staff_id: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: String,
}

/// The identity returned by a successful login. There is no session or
/// token layer; the caller holds this for the remainder of its run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StaffIdentity {
    pub id: i64,
    pub staff_id: String,
    pub role: Role,
}
