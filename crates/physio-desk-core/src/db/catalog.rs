//! Treatment service catalog reads.

use super::{Database, DbResult};
use crate::models::ServiceOffering;

impl Database {
    /// List active treatment services, alphabetically. Seeded reference
    /// data; booking callers read duration and price from here.
    pub fn list_services(&self) -> DbResult<Vec<ServiceOffering>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, service_name, description, duration, price, is_active
             FROM services
             WHERE is_active = 1
             ORDER BY service_name",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(ServiceOffering {
                id: row.get(0)?,
                service_name: row.get(1)?,
                description: row.get(2)?,
                duration_minutes: row.get(3)?,
                price: row.get(4)?,
                is_active: row.get(5)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
