//! Patient registry operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{NewPatient, Patient};

fn validate(new: &NewPatient) -> DbResult<()> {
    if new.first_name.trim().is_empty() || new.last_name.trim().is_empty() {
        return Err(DbError::Validation("patient name is required".into()));
    }
    if new.phone.trim().is_empty() {
        return Err(DbError::Validation("patient phone number is required".into()));
    }
    Ok(())
}

fn patient_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        phone: row.get(3)?,
        email: row.get(4)?,
        date_of_birth: row.get(5)?,
        medical_notes: row.get(6)?,
        created_at: row.get(7)?,
    })
}

const PATIENT_COLUMNS: &str =
    "id, first_name, last_name, phone, email, date_of_birth, medical_notes, created_at";

impl Database {
    /// Register a patient. Name and phone are mandatory; duplicates of
    /// phone or email are allowed.
    pub fn create_patient(&self, new: &NewPatient) -> DbResult<i64> {
        validate(new)?;
        self.conn.execute(
            "INSERT INTO patients (first_name, last_name, phone, email, date_of_birth, medical_notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                new.first_name,
                new.last_name,
                new.phone,
                new.email,
                new.date_of_birth,
                new.medical_notes,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, id: i64) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?1"),
                [id],
                patient_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Fully replace a patient's mutable fields. ID and creation timestamp
    /// never change.
    pub fn update_patient(&self, id: i64, fields: &NewPatient) -> DbResult<bool> {
        validate(fields)?;
        let rows = self.conn.execute(
            "UPDATE patients SET
                first_name = ?2,
                last_name = ?3,
                phone = ?4,
                email = ?5,
                date_of_birth = ?6,
                medical_notes = ?7
             WHERE id = ?1",
            params![
                id,
                fields.first_name,
                fields.last_name,
                fields.phone,
                fields.email,
                fields.date_of_birth,
                fields.medical_notes,
            ],
        )?;
        Ok(rows > 0)
    }

    /// Delete a patient. Their appointments and invoices go too; invoices
    /// that referenced those appointments from another patient's ledger
    /// keep the row and lose the reference.
    pub fn delete_patient(&self, id: i64) -> DbResult<bool> {
        let rows = self.conn.execute("DELETE FROM patients WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    /// List all patients, ordered by last then first name.
    pub fn list_patients(&self) -> DbResult<Vec<Patient>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PATIENT_COLUMNS} FROM patients ORDER BY last_name, first_name"
        ))?;
        let rows = stmt.query_map([], patient_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Search patients by case-insensitive substring of the full name or
    /// phone number.
    pub fn search_patients(&self, query: &str) -> DbResult<Vec<Patient>> {
        let pattern = format!("%{}%", query);
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PATIENT_COLUMNS}
             FROM patients
             WHERE first_name || ' ' || last_name LIKE ?1 OR phone LIKE ?1
             ORDER BY last_name, first_name"
        ))?;
        let rows = stmt.query_map([pattern], patient_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_create_and_get() {
        let db = setup_db();

        let mut new = NewPatient::new("Sarah", "Johnson", "07700 900123");
        new.email = Some("sarah@example.com".into());
        new.medical_notes = Some("Lower back pain".into());

        let id = db.create_patient(&new).unwrap();
        let patient = db.get_patient(id).unwrap().unwrap();

        assert_eq!(patient.full_name(), "Sarah Johnson");
        assert_eq!(patient.phone, "07700 900123");
        assert_eq!(patient.email, Some("sarah@example.com".into()));
        assert_eq!(patient.date_of_birth, None);
    }

    #[test]
    fn test_mandatory_fields() {
        let db = setup_db();

        let result = db.create_patient(&NewPatient::new("", "Johnson", "07700 900123"));
        assert!(matches!(result, Err(DbError::Validation(_))));

        let result = db.create_patient(&NewPatient::new("Sarah", "Johnson", "  "));
        assert!(matches!(result, Err(DbError::Validation(_))));
    }

    #[test]
    fn test_duplicates_allowed() {
        let db = setup_db();

        let new = NewPatient::new("Sarah", "Johnson", "07700 900123");
        db.create_patient(&new).unwrap();
        // Same name and phone again: allowed by design.
        assert!(db.create_patient(&new).is_ok());
    }

    #[test]
    fn test_update_is_full_replace() {
        let db = setup_db();

        let mut new = NewPatient::new("Sarah", "Johnson", "07700 900123");
        new.email = Some("sarah@example.com".into());
        let id = db.create_patient(&new).unwrap();

        // Replacement without email clears the stored one.
        let replacement = NewPatient::new("Sarah", "Johnson-Smith", "07700 900999");
        assert!(db.update_patient(id, &replacement).unwrap());

        let patient = db.get_patient(id).unwrap().unwrap();
        assert_eq!(patient.last_name, "Johnson-Smith");
        assert_eq!(patient.phone, "07700 900999");
        assert_eq!(patient.email, None);

        assert!(!db.update_patient(9999, &replacement).unwrap());
    }

    #[test]
    fn test_list_ordered_by_name() {
        let db = setup_db();

        db.create_patient(&NewPatient::new("Emma", "Williams", "1")).unwrap();
        db.create_patient(&NewPatient::new("Michael", "Chen", "2")).unwrap();
        db.create_patient(&NewPatient::new("Alice", "Chen", "3")).unwrap();

        let all = db.list_patients().unwrap();
        let names: Vec<String> = all.iter().map(|p| p.full_name()).collect();
        assert_eq!(names, ["Alice Chen", "Michael Chen", "Emma Williams"]);
    }

    #[test]
    fn test_search_substring_case_insensitive() {
        let db = setup_db();

        db.create_patient(&NewPatient::new("Sarah", "Johnson", "07700 900123")).unwrap();
        db.create_patient(&NewPatient::new("James", "O'Neill", "07700 111222")).unwrap();

        // Unanchored, case-insensitive, across the full name.
        assert_eq!(db.search_patients("john").unwrap().len(), 1);
        assert_eq!(db.search_patients("NEILL").unwrap().len(), 1);
        assert_eq!(db.search_patients("ah Joh").unwrap().len(), 1);
        assert_eq!(db.search_patients("07700").unwrap().len(), 2);
        assert_eq!(db.search_patients("zzz").unwrap().len(), 0);
    }

    #[test]
    fn test_delete_missing_is_false() {
        let db = setup_db();
        assert!(!db.delete_patient(42).unwrap());
    }
}
