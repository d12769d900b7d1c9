//! Database layer for physio-desk.
//!
//! One [`Database`] value owns the single SQLite connection for the life of
//! the process and is injected wherever store access is needed; there is no
//! ambient global handle and no per-call connection churn.

mod appointments;
mod catalog;
mod company;
mod invoices;
mod patients;
mod schema;
mod staff;

pub use schema::*;
#[allow(unused_imports)]
pub use staff::*;

use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;

/// Database errors.
///
/// `Sqlite` is the only fatal class (the store itself failed); everything
/// else is recoverable by the caller and mutates no state.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Record not found: {0}")]
    NotFound(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Translate a SQLite constraint failure into a caller-facing constraint
/// error; any other failure stays a raw store error.
pub(crate) fn constraint(e: rusqlite::Error, message: &str) -> DbError {
    match e {
        rusqlite::Error::SqliteFailure(f, _)
            if f.code == rusqlite::ffi::ErrorCode::ConstraintViolation =>
        {
            DbError::Constraint(message.to_string())
        }
        other => DbError::Sqlite(other),
    }
}

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `path`, creating the file and schema if needed.
    /// A schema failure here is fatal to the caller: nothing else works
    /// without the tables.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.ensure_schema()?;
        Ok(db)
    }

    /// Create an in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.ensure_schema()?;
        Ok(db)
    }

    /// Get raw connection (for aggregate queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Begin a transaction.
    pub fn transaction(&mut self) -> DbResult<rusqlite::Transaction<'_>> {
        Ok(self.conn.transaction()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn test_open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("physio_desk.db");

        let db = Database::open(&path).unwrap();
        drop(db);

        // Reopening an existing file must be a no-op for the schema.
        let db = Database::open(&path);
        assert!(db.is_ok());
    }

    #[test]
    fn test_schema_initialized() {
        let db = Database::open_in_memory().unwrap();

        let tables: Vec<String> = db
            .conn()
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"staff".to_string()));
        assert!(tables.contains(&"patients".to_string()));
        assert!(tables.contains(&"appointments".to_string()));
        assert!(tables.contains(&"invoices".to_string()));
        assert!(tables.contains(&"services".to_string()));
        assert!(tables.contains(&"company_access".to_string()));
    }

    #[test]
    fn test_foreign_keys_enforced() {
        let db = Database::open_in_memory().unwrap();

        let result = db.conn().execute(
            "INSERT INTO appointments (patient_id, appointment_date, appointment_time, service_type)
             VALUES (999, '2026-03-01', '09:00', 'Assessment')",
            [],
        );
        assert!(result.is_err());
    }
}
