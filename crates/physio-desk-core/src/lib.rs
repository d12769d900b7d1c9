//! Physio Desk core library.
//!
//! Data integrity and workflow layer for a clinic front-desk system: staff
//! authentication with role gating, the patient/appointment/invoice
//! relational model, the appointment status state machine, and the
//! aggregate queries built on top of it. Screens and input handling are
//! the caller's problem; everything here is an in-process call against a
//! single embedded SQLite file.
//!
//! # Modules
//!
//! - [`db`]: SQLite store, schema migration, seeding and CRUD operations
//! - [`models`]: domain types (StaffAccount, Patient, Appointment, Invoice)
//! - [`auth`]: password hashing and staff authentication
//! - [`reports`]: read-only aggregates for dashboards
//! - [`config`]: database location
//!
//! # Usage
//!
//! A caller opens the store once, seeds defaults at process start,
//! authenticates through [`auth::AuthService`], and holds the returned
//! [`models::StaffIdentity`] for the rest of its run while reading and
//! writing through [`db::Database`]:
//!
//! ```
//! use physio_desk_core::{AuthService, Database, NewPatient};
//!
//! let db = Database::open_in_memory().unwrap();
//! db.seed_defaults();
//!
//! let staff = AuthService::new(&db)
//!     .authenticate("10003", "password3", physio_desk_core::db::DEFAULT_ACCESS_KEY)
//!     .unwrap();
//!
//! let patient = db
//!     .create_patient(&NewPatient::new("Sarah", "Johnson", "07700 900123"))
//!     .unwrap();
//! assert!(db.get_patient(patient).unwrap().is_some());
//! assert!(staff.role.can_manage_staff());
//! ```

pub mod auth;
pub mod config;
pub mod db;
pub mod models;
pub mod reports;

// Re-export commonly used types
pub use auth::{AuthError, AuthService};
pub use config::Config;
pub use db::{Database, DbError, DbResult};
pub use models::{
    Appointment, AppointmentDetail, AppointmentFilter, AppointmentStatus, Invoice, InvoiceDetail,
    InvoiceStatus, NewAppointment, NewInvoice, NewPatient, Patient, Role, ServiceOffering,
    StaffAccount, StaffIdentity,
};
pub use reports::{AppointmentStats, DashboardSummary, ReportService};
