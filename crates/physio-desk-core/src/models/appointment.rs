//! Appointment models and the booking status state machine.

use serde::{Deserialize, Serialize};

/// Appointment status.
///
/// Created as `Scheduled`; moves to exactly one of the three terminal
/// states. Terminal states never transition back — the store enforces this,
/// not just the screens that happen to hide the buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    /// Stored string form, matching the data file vocabulary.
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::NoShow => "no-show",
        }
    }

    /// Parse the stored string form.
    pub fn parse(s: &str) -> Option<AppointmentStatus> {
        match s {
            "scheduled" => Some(AppointmentStatus::Scheduled),
            "completed" => Some(AppointmentStatus::Completed),
            "cancelled" => Some(AppointmentStatus::Cancelled),
            "no-show" => Some(AppointmentStatus::NoShow),
            _ => None,
        }
    }

    /// Whether no further transition is allowed from this state.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AppointmentStatus::Scheduled)
    }
}

/// A booked appointment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: i64,
    pub patient_id: i64,
    /// Assigned physiotherapist, if any.
    pub physio_id: Option<i64>,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Time of day, 24-hour `HH:MM`.
    pub time: String,
    pub service_type: String,
    pub duration_minutes: Option<i64>,
    pub price: Option<f64>,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    /// Staff account that made the booking.
    pub created_by: Option<i64>,
    pub created_at: String,
}

/// Booking request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewAppointment {
    pub patient_id: i64,
    pub physio_id: Option<i64>,
    pub date: String,
    pub time: String,
    pub service_type: String,
    pub duration_minutes: Option<i64>,
    pub price: Option<f64>,
    pub notes: Option<String>,
    pub created_by: i64,
}

impl NewAppointment {
    /// Create with the mandatory fields; optional fields start empty.
    pub fn new(patient_id: i64, date: &str, time: &str, service_type: &str, created_by: i64) -> Self {
        Self {
            patient_id,
            physio_id: None,
            date: date.to_string(),
            time: time.to_string(),
            service_type: service_type.to_string(),
            duration_minutes: None,
            price: None,
            notes: None,
            created_by,
        }
    }
}

/// An appointment row joined with display names, as returned by the
/// filtered listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppointmentDetail {
    pub id: i64,
    pub date: String,
    pub time: String,
    pub patient_id: i64,
    pub patient_name: String,
    /// Assigned physiotherapist's staff ID, if any.
    pub physio: Option<String>,
    pub service_type: String,
    pub duration_minutes: Option<i64>,
    pub price: Option<f64>,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
}

/// Optional filters for the appointment listing. All filters compose with
/// AND; an empty filter returns everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentFilter {
    /// Case-insensitive substring of the patient's full name.
    pub patient_name: Option<String>,
    /// Exact calendar date.
    pub date: Option<String>,
    pub status: Option<AppointmentStatus>,
    pub physio_id: Option<i64>,
}
