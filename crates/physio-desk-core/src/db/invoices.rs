//! Invoice ledger operations.

use rusqlite::{params, OptionalExtension};

use super::{constraint, Database, DbError, DbResult};
use crate::models::{AppointmentStatus, Invoice, InvoiceDetail, InvoiceStatus, NewInvoice};

fn parse_status(s: &str) -> Result<InvoiceStatus, rusqlite::Error> {
    InvoiceStatus::parse(s).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            format!("unknown invoice status: {s}").into(),
        )
    })
}

fn invoice_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Invoice> {
    Ok(Invoice {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        appointment_id: row.get(2)?,
        amount: row.get(3)?,
        description: row.get(4)?,
        status: parse_status(&row.get::<_, String>(5)?)?,
        created_by: row.get(6)?,
        created_at: row.get(7)?,
    })
}

const INVOICE_COLUMNS: &str =
    "id, patient_id, appointment_id, amount, description, status, created_by, created_at";

impl Database {
    /// Raise an invoice. Amount must be strictly positive and the
    /// description non-empty; status starts Unpaid.
    pub fn create_invoice(&self, new: &NewInvoice) -> DbResult<i64> {
        if !(new.amount > 0.0) {
            return Err(DbError::Validation("invoice amount must be positive".into()));
        }
        if new.description.trim().is_empty() {
            return Err(DbError::Validation("invoice description is required".into()));
        }

        self.conn
            .execute(
                "INSERT INTO invoices (patient_id, appointment_id, amount, description, created_by)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    new.patient_id,
                    new.appointment_id,
                    new.amount,
                    new.description,
                    new.created_by,
                ],
            )
            .map_err(|e| constraint(e, "patient or appointment reference does not exist"))?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Raise an invoice from a completed appointment, priced at the
    /// appointment's price. Read and insert happen in one transaction, so
    /// a concurrent appointment deletion cannot leave a half-billed state.
    pub fn invoice_for_appointment(&mut self, appointment_id: i64, created_by: i64) -> DbResult<i64> {
        let tx = self.conn.transaction()?;

        let row = tx
            .query_row(
                "SELECT patient_id, service_type, appointment_date, price, status
                 FROM appointments
                 WHERE id = ?1",
                [appointment_id],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, Option<f64>>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .optional()?;

        let (patient_id, service_type, date, price, status) =
            row.ok_or_else(|| DbError::NotFound(format!("appointment {appointment_id}")))?;

        if AppointmentStatus::parse(&status) != Some(AppointmentStatus::Completed) {
            return Err(DbError::Constraint(
                "only completed appointments can be invoiced".into(),
            ));
        }
        let amount = match price {
            Some(p) if p > 0.0 => p,
            _ => {
                return Err(DbError::Validation(
                    "appointment has no price to invoice".into(),
                ))
            }
        };

        tx.execute(
            "INSERT INTO invoices (patient_id, appointment_id, amount, description, created_by)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                patient_id,
                appointment_id,
                amount,
                format!("{service_type} on {date}"),
                created_by,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(id)
    }

    /// Mark an invoice Paid or Unpaid. Togglable in both directions.
    pub fn set_invoice_status(&self, id: i64, status: InvoiceStatus) -> DbResult<bool> {
        let rows = self.conn.execute(
            "UPDATE invoices SET status = ?1 WHERE id = ?2",
            params![status.as_str(), id],
        )?;
        Ok(rows > 0)
    }

    /// Delete an invoice.
    pub fn delete_invoice(&self, id: i64) -> DbResult<bool> {
        let rows = self.conn.execute("DELETE FROM invoices WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    /// List invoices, newest first, joined with patient names. Pass a
    /// status to restrict to Paid or Unpaid.
    pub fn list_invoices(&self, status: Option<InvoiceStatus>) -> DbResult<Vec<InvoiceDetail>> {
        let mut sql = String::from(
            "SELECT i.id, i.patient_id, p.first_name || ' ' || p.last_name,
                    i.appointment_id, i.amount, i.description, i.status, i.created_at
             FROM invoices i
             JOIN patients p ON i.patient_id = p.id",
        );
        if status.is_some() {
            sql.push_str(" WHERE i.status = ?1");
        }
        sql.push_str(" ORDER BY i.created_at DESC, i.id DESC");

        let map = |row: &rusqlite::Row<'_>| {
            Ok(InvoiceDetail {
                id: row.get(0)?,
                patient_id: row.get(1)?,
                patient_name: row.get(2)?,
                appointment_id: row.get(3)?,
                amount: row.get(4)?,
                description: row.get(5)?,
                status: parse_status(&row.get::<_, String>(6)?)?,
                created_at: row.get(7)?,
            })
        };

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = match status {
            Some(status) => stmt.query_map([status.as_str()], map)?,
            None => stmt.query_map([], map)?,
        };
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// All invoices for a patient, newest first.
    pub fn list_invoices_by_patient(&self, patient_id: i64) -> DbResult<Vec<Invoice>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {INVOICE_COLUMNS}
             FROM invoices
             WHERE patient_id = ?1
             ORDER BY created_at DESC, id DESC"
        ))?;
        let rows = stmt.query_map([patient_id], invoice_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Sum of all Unpaid invoice amounts. Always recomputed from the live
    /// rows; zero when there are none.
    pub fn outstanding_total(&self) -> DbResult<f64> {
        let total: f64 = self.conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM invoices WHERE status = ?1",
            [InvoiceStatus::Unpaid.as_str()],
            |row| row.get(0),
        )?;
        Ok(total)
    }
}
