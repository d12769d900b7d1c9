//! SQLite schema definition and default-data seeding.

use rusqlite::params;
use tracing::{info, warn};

use super::{Database, DbResult};
use crate::auth;
use crate::models::Role;

/// Complete database schema for physio-desk. Every statement is idempotent;
/// the batch runs on every startup.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Staff accounts
-- ============================================================================

CREATE TABLE IF NOT EXISTS staff (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    staff_id TEXT UNIQUE NOT NULL,
    password_hash TEXT NOT NULL,
    role TEXT NOT NULL CHECK (role IN ('Receptionist', 'Physiotherapist', 'Admin')),
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    phone TEXT NOT NULL,
    email TEXT,
    date_of_birth TEXT,
    medical_notes TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_patients_last_name ON patients(last_name);

-- ============================================================================
-- Appointments
-- ============================================================================

CREATE TABLE IF NOT EXISTS appointments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    patient_id INTEGER NOT NULL REFERENCES patients(id) ON DELETE CASCADE,
    physio_id INTEGER REFERENCES staff(id) ON DELETE SET NULL,
    appointment_date TEXT NOT NULL,
    appointment_time TEXT NOT NULL,
    service_type TEXT NOT NULL,
    duration INTEGER,
    price REAL,
    status TEXT NOT NULL DEFAULT 'scheduled'
        CHECK (status IN ('scheduled', 'completed', 'cancelled', 'no-show')),
    notes TEXT,
    created_by INTEGER REFERENCES staff(id) ON DELETE SET NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_appointments_patient ON appointments(patient_id);
CREATE INDEX IF NOT EXISTS idx_appointments_physio ON appointments(physio_id);
CREATE INDEX IF NOT EXISTS idx_appointments_date ON appointments(appointment_date);
CREATE INDEX IF NOT EXISTS idx_appointments_status ON appointments(status);

-- ============================================================================
-- Invoices
-- ============================================================================

-- patient_id cascades: a patient's invoices go with the patient.
-- appointment_id only nulls: an invoice outlives its appointment.
CREATE TABLE IF NOT EXISTS invoices (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    patient_id INTEGER NOT NULL REFERENCES patients(id) ON DELETE CASCADE,
    appointment_id INTEGER REFERENCES appointments(id) ON DELETE SET NULL,
    amount REAL NOT NULL,
    description TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'Unpaid' CHECK (status IN ('Paid', 'Unpaid')),
    created_by INTEGER REFERENCES staff(id) ON DELETE SET NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_invoices_patient ON invoices(patient_id);
CREATE INDEX IF NOT EXISTS idx_invoices_status ON invoices(status);

-- ============================================================================
-- Treatment service catalog
-- ============================================================================

CREATE TABLE IF NOT EXISTS services (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    service_name TEXT NOT NULL,
    description TEXT,
    duration INTEGER NOT NULL,
    price REAL NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 1
);

-- ============================================================================
-- Company access key
-- ============================================================================

CREATE TABLE IF NOT EXISTS company_access (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    access_key TEXT UNIQUE NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 1
);
"#;

/// Shared access key installed on first run.
pub const DEFAULT_ACCESS_KEY: &str = "PHYSIO2024";

/// Development staff accounts seeded into an empty database.
const DEFAULT_STAFF: &[(&str, &str, Role)] = &[
    ("10001", "password1", Role::Receptionist),
    ("10002", "password2", Role::Physiotherapist),
    ("10003", "password3", Role::Admin),
];

const DEFAULT_SERVICES: &[(&str, &str, i64, f64)] = &[
    ("Initial Consultation", "First-time patient assessment and treatment plan", 60, 75.00),
    ("Standard Physiotherapy", "Regular treatment session", 45, 55.00),
    ("Sports Massage", "Deep tissue massage for athletes", 60, 65.00),
    ("Back Pain Treatment", "Specialized back pain therapy", 45, 60.00),
    ("Post-Surgery Rehabilitation", "Recovery therapy after surgery", 60, 70.00),
    ("Acupuncture", "Traditional acupuncture treatment", 30, 45.00),
];

impl Database {
    /// Create all tables if absent. Safe to call on every startup.
    pub(crate) fn ensure_schema(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Populate default staff accounts, the company access key and the
    /// treatment catalog — each only if its table is empty. Existing rows
    /// are never overwritten. Individual failures are logged and non-fatal;
    /// callers invoke this once at process start after `open`.
    pub fn seed_defaults(&self) {
        if let Err(e) = self.seed_staff() {
            warn!("staff seeding failed: {e}");
        }
        if let Err(e) = self.seed_services() {
            warn!("service catalog seeding failed: {e}");
        }
        if let Err(e) = self.seed_access_key() {
            warn!("access key seeding failed: {e}");
        }
    }

    fn seed_staff(&self) -> DbResult<()> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM staff", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(());
        }
        for (staff_id, password, role) in DEFAULT_STAFF {
            self.conn.execute(
                "INSERT INTO staff (staff_id, password_hash, role) VALUES (?1, ?2, ?3)",
                params![staff_id, auth::hash_password(password), role.as_str()],
            )?;
        }
        info!("seeded {} default staff accounts", DEFAULT_STAFF.len());
        Ok(())
    }

    fn seed_services(&self) -> DbResult<()> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM services", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(());
        }
        for (name, description, duration, price) in DEFAULT_SERVICES {
            self.conn.execute(
                "INSERT INTO services (service_name, description, duration, price)
                 VALUES (?1, ?2, ?3, ?4)",
                params![name, description, duration, price],
            )?;
        }
        info!("seeded {} catalog services", DEFAULT_SERVICES.len());
        Ok(())
    }

    fn seed_access_key(&self) -> DbResult<()> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM company_access", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(());
        }
        self.conn.execute(
            "INSERT INTO company_access (access_key) VALUES (?1)",
            [DEFAULT_ACCESS_KEY],
        )?;
        info!("installed default company access key");
        Ok(())
    }
}
