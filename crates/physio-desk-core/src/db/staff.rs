//! Staff directory operations. Admin-gated at the caller via
//! `Role::can_manage_staff`; the store enforces the data rules.

use rusqlite::{params, OptionalExtension};

use super::{constraint, Database, DbError, DbResult};
use crate::auth;
use crate::models::{Role, StaffAccount};

/// External staff identifiers are exactly this many ASCII digits.
pub const STAFF_ID_LEN: usize = 5;

/// Minimum password length accepted at creation and reset.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Credential row used by the authentication path. Not exported: the
/// password hash never leaves the crate.
pub(crate) struct StaffAuthRow {
    pub id: i64,
    pub staff_id: String,
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
}

fn validate_staff_id(staff_id: &str) -> DbResult<()> {
    if staff_id.len() != STAFF_ID_LEN || !staff_id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DbError::Validation(format!(
            "staff ID must be exactly {} digits",
            STAFF_ID_LEN
        )));
    }
    Ok(())
}

fn validate_password(password: &str) -> DbResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DbError::Validation(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

fn parse_role(s: &str) -> Result<Role, rusqlite::Error> {
    Role::parse(s).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            format!("unknown role: {s}").into(),
        )
    })
}

fn account_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StaffAccount> {
    Ok(StaffAccount {
        id: row.get(0)?,
        staff_id: row.get(1)?,
        role: parse_role(&row.get::<_, String>(2)?)?,
        is_active: row.get(3)?,
        created_at: row.get(4)?,
    })
}

impl Database {
    /// Create a staff account. The identifier must be unused; a duplicate
    /// fails with a constraint error and leaves the existing account
    /// untouched.
    pub fn create_staff(&self, staff_id: &str, password: &str, role: Role) -> DbResult<i64> {
        validate_staff_id(staff_id)?;
        validate_password(password)?;

        self.conn
            .execute(
                "INSERT INTO staff (staff_id, password_hash, role) VALUES (?1, ?2, ?3)",
                params![staff_id, auth::hash_password(password), role.as_str()],
            )
            .map_err(|e| constraint(e, "staff ID already exists"))?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get a staff account by external identifier.
    pub fn get_staff(&self, staff_id: &str) -> DbResult<Option<StaffAccount>> {
        self.conn
            .query_row(
                "SELECT id, staff_id, role, is_active, created_at FROM staff WHERE staff_id = ?1",
                [staff_id],
                account_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all staff accounts, ordered by role then staff identifier.
    pub fn list_staff(&self) -> DbResult<Vec<StaffAccount>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, staff_id, role, is_active, created_at
             FROM staff
             ORDER BY role, staff_id",
        )?;
        let rows = stmt.query_map([], account_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// List active staff holding a given role. The booking screen uses this
    /// to offer the physiotherapist choice.
    pub fn list_staff_by_role(&self, role: Role) -> DbResult<Vec<StaffAccount>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, staff_id, role, is_active, created_at
             FROM staff
             WHERE role = ?1 AND is_active = 1
             ORDER BY staff_id",
        )?;
        let rows = stmt.query_map([role.as_str()], account_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete a staff account. The acting identity may not delete itself;
    /// that check is a precondition here, not a caller courtesy.
    pub fn delete_staff(&self, staff_id: &str, acting_staff_id: &str) -> DbResult<bool> {
        if staff_id == acting_staff_id {
            return Err(DbError::Validation(
                "cannot delete the account you are logged in as".into(),
            ));
        }
        let rows = self
            .conn
            .execute("DELETE FROM staff WHERE staff_id = ?1", [staff_id])?;
        Ok(rows > 0)
    }

    /// Replace a staff member's password.
    pub fn reset_password(&self, staff_id: &str, new_password: &str) -> DbResult<bool> {
        validate_password(new_password)?;
        let rows = self.conn.execute(
            "UPDATE staff SET password_hash = ?1 WHERE staff_id = ?2",
            params![auth::hash_password(new_password), staff_id],
        )?;
        Ok(rows > 0)
    }

    /// Activate or deactivate an account. Deactivated accounts keep their
    /// credentials but are refused at login with a distinct reason.
    pub fn set_staff_active(&self, staff_id: &str, active: bool) -> DbResult<bool> {
        let rows = self.conn.execute(
            "UPDATE staff SET is_active = ?1 WHERE staff_id = ?2",
            params![active, staff_id],
        )?;
        Ok(rows > 0)
    }

    /// Credential lookup for authentication.
    pub(crate) fn staff_auth_row(&self, staff_id: &str) -> DbResult<Option<StaffAuthRow>> {
        self.conn
            .query_row(
                "SELECT id, staff_id, password_hash, role, is_active
                 FROM staff
                 WHERE staff_id = ?1",
                [staff_id],
                |row| {
                    Ok(StaffAuthRow {
                        id: row.get(0)?,
                        staff_id: row.get(1)?,
                        password_hash: row.get(2)?,
                        role: parse_role(&row.get::<_, String>(3)?)?,
                        is_active: row.get(4)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
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

        let id = db.create_staff("10001", "secret99", Role::Receptionist).unwrap();
        assert!(id > 0);

        let account = db.get_staff("10001").unwrap().unwrap();
        assert_eq!(account.staff_id, "10001");
        assert_eq!(account.role, Role::Receptionist);
        assert!(account.is_active);
    }

    #[test]
    fn test_staff_id_must_be_five_digits() {
        let db = setup_db();

        for bad in ["1234", "123456", "1234a", "abcde", ""] {
            let result = db.create_staff(bad, "secret99", Role::Admin);
            assert!(matches!(result, Err(DbError::Validation(_))), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_password_minimum_length() {
        let db = setup_db();

        let result = db.create_staff("10001", "short", Role::Admin);
        assert!(matches!(result, Err(DbError::Validation(_))));

        let result = db.reset_password("10001", "tiny");
        assert!(matches!(result, Err(DbError::Validation(_))));
    }

    #[test]
    fn test_duplicate_staff_id_rejected() {
        let db = setup_db();

        db.create_staff("10001", "secret99", Role::Receptionist).unwrap();
        let result = db.create_staff("10001", "other-password", Role::Admin);
        assert!(matches!(result, Err(DbError::Constraint(_))));

        // The original account is untouched.
        let account = db.get_staff("10001").unwrap().unwrap();
        assert_eq!(account.role, Role::Receptionist);
    }

    #[test]
    fn test_list_ordered_by_role_then_id() {
        let db = setup_db();

        db.create_staff("20002", "secret99", Role::Receptionist).unwrap();
        db.create_staff("10001", "secret99", Role::Admin).unwrap();
        db.create_staff("30003", "secret99", Role::Physiotherapist).unwrap();
        db.create_staff("10002", "secret99", Role::Admin).unwrap();

        let all = db.list_staff().unwrap();
        let ids: Vec<&str> = all.iter().map(|a| a.staff_id.as_str()).collect();
        assert_eq!(ids, ["10001", "10002", "30003", "20002"]);
    }

    #[test]
    fn test_list_by_role_skips_inactive() {
        let db = setup_db();

        db.create_staff("10001", "secret99", Role::Physiotherapist).unwrap();
        db.create_staff("10002", "secret99", Role::Physiotherapist).unwrap();
        db.set_staff_active("10002", false).unwrap();

        let physios = db.list_staff_by_role(Role::Physiotherapist).unwrap();
        assert_eq!(physios.len(), 1);
        assert_eq!(physios[0].staff_id, "10001");
    }

    #[test]
    fn test_self_deletion_refused() {
        let db = setup_db();

        db.create_staff("10001", "secret99", Role::Admin).unwrap();
        let result = db.delete_staff("10001", "10001");
        assert!(matches!(result, Err(DbError::Validation(_))));
        assert!(db.get_staff("10001").unwrap().is_some());
    }

    #[test]
    fn test_delete_staff() {
        let db = setup_db();

        db.create_staff("10001", "secret99", Role::Admin).unwrap();
        db.create_staff("10002", "secret99", Role::Receptionist).unwrap();

        assert!(db.delete_staff("10002", "10001").unwrap());
        assert!(db.get_staff("10002").unwrap().is_none());

        // Deleting a missing account reports false, not an error.
        assert!(!db.delete_staff("10002", "10001").unwrap());
    }

    #[test]
    fn test_reset_password_changes_hash() {
        let db = setup_db();

        db.create_staff("10001", "secret99", Role::Admin).unwrap();
        let before = db.staff_auth_row("10001").unwrap().unwrap().password_hash;

        assert!(db.reset_password("10001", "newsecret").unwrap());
        let after = db.staff_auth_row("10001").unwrap().unwrap().password_hash;

        assert_ne!(before, after);
        assert!(auth::verify_password("newsecret", &after));
    }
}
