//! Company access key checks.

use super::{Database, DbResult};

impl Database {
    /// Whether `key` matches an active company access key. Shared secret
    /// checked before any credential lookup at login and on its own during
    /// first-time setup.
    pub fn verify_access_key(&self, key: &str) -> DbResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM company_access WHERE access_key = ?1 AND is_active = 1",
            [key],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}
