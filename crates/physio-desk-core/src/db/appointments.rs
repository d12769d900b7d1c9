//! Appointment scheduling and the status state machine.

use chrono::{NaiveDate, NaiveTime};
use rusqlite::{params, OptionalExtension, ToSql};

use super::{constraint, Database, DbError, DbResult};
use crate::models::{
    Appointment, AppointmentDetail, AppointmentFilter, AppointmentStatus, NewAppointment,
};

fn validate_date(s: &str) -> DbResult<()> {
    // Round-trip equality rejects non-canonical forms like "2026-2-3" as
    // well as impossible dates like "2026-02-30".
    match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        Ok(d) if d.format("%Y-%m-%d").to_string() == s => Ok(()),
        _ => Err(DbError::Validation(format!(
            "invalid appointment date {s:?}, expected YYYY-MM-DD"
        ))),
    }
}

fn validate_time(s: &str) -> DbResult<()> {
    match NaiveTime::parse_from_str(s, "%H:%M") {
        Ok(t) if t.format("%H:%M").to_string() == s => Ok(()),
        _ => Err(DbError::Validation(format!(
            "invalid appointment time {s:?}, expected 24-hour HH:MM"
        ))),
    }
}

fn parse_status(s: &str) -> Result<AppointmentStatus, rusqlite::Error> {
    AppointmentStatus::parse(s).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            format!("unknown appointment status: {s}").into(),
        )
    })
}

fn appointment_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Appointment> {
    Ok(Appointment {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        physio_id: row.get(2)?,
        date: row.get(3)?,
        time: row.get(4)?,
        service_type: row.get(5)?,
        duration_minutes: row.get(6)?,
        price: row.get(7)?,
        status: parse_status(&row.get::<_, String>(8)?)?,
        notes: row.get(9)?,
        created_by: row.get(10)?,
        created_at: row.get(11)?,
    })
}

const APPOINTMENT_COLUMNS: &str = "id, patient_id, physio_id, appointment_date, \
     appointment_time, service_type, duration, price, status, notes, created_by, created_at";

impl Database {
    /// Book an appointment. The date must be a real calendar date and the
    /// time a valid 24-hour HH:MM; neither is required to lie in the
    /// future, and nothing checks the physio's qualification for the
    /// service. Two bookings may share patient, physio, date and time —
    /// there is no conflict detection.
    pub fn book_appointment(&self, new: &NewAppointment) -> DbResult<i64> {
        validate_date(&new.date)?;
        validate_time(&new.time)?;
        if new.service_type.trim().is_empty() {
            return Err(DbError::Validation("service type is required".into()));
        }

        self.conn
            .execute(
                "INSERT INTO appointments
                    (patient_id, physio_id, appointment_date, appointment_time,
                     service_type, duration, price, notes, created_by)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    new.patient_id,
                    new.physio_id,
                    new.date,
                    new.time,
                    new.service_type,
                    new.duration_minutes,
                    new.price,
                    new.notes,
                    new.created_by,
                ],
            )
            .map_err(|e| constraint(e, "patient or staff reference does not exist"))?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get an appointment by ID.
    pub fn get_appointment(&self, id: i64) -> DbResult<Option<Appointment>> {
        self.conn
            .query_row(
                &format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?1"),
                [id],
                appointment_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Move an appointment to a new status.
    ///
    /// Completed, Cancelled and NoShow are terminal: once there, the status
    /// never changes again (re-asserting the current status is a no-op).
    /// Callers are expected to have confirmed intent; the write itself asks
    /// no further questions.
    pub fn set_appointment_status(&self, id: i64, status: AppointmentStatus) -> DbResult<()> {
        let current = self
            .get_appointment(id)?
            .ok_or_else(|| DbError::NotFound(format!("appointment {id}")))?;

        if current.status == status {
            return Ok(());
        }
        if current.status.is_terminal() {
            return Err(DbError::Constraint(format!(
                "appointment {} is {} and can no longer change status",
                id,
                current.status.as_str()
            )));
        }

        self.conn.execute(
            "UPDATE appointments SET status = ?1 WHERE id = ?2",
            params![status.as_str(), id],
        )?;
        Ok(())
    }

    /// List appointments matching the filter, joined with patient and
    /// physio display fields. Canonical order: ascending date, then time.
    pub fn list_appointments(&self, filter: &AppointmentFilter) -> DbResult<Vec<AppointmentDetail>> {
        let mut sql = String::from(
            "SELECT a.id, a.appointment_date, a.appointment_time,
                    a.patient_id, p.first_name || ' ' || p.last_name,
                    s.staff_id, a.service_type, a.duration, a.price, a.status, a.notes
             FROM appointments a
             JOIN patients p ON a.patient_id = p.id
             LEFT JOIN staff s ON a.physio_id = s.id
             WHERE 1=1",
        );
        let mut args: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(name) = &filter.patient_name {
            sql.push_str(&format!(
                " AND p.first_name || ' ' || p.last_name LIKE ?{}",
                args.len() + 1
            ));
            args.push(Box::new(format!("%{}%", name)));
        }
        if let Some(date) = &filter.date {
            sql.push_str(&format!(" AND a.appointment_date = ?{}", args.len() + 1));
            args.push(Box::new(date.clone()));
        }
        if let Some(status) = filter.status {
            sql.push_str(&format!(" AND a.status = ?{}", args.len() + 1));
            args.push(Box::new(status.as_str()));
        }
        if let Some(physio_id) = filter.physio_id {
            sql.push_str(&format!(" AND a.physio_id = ?{}", args.len() + 1));
            args.push(Box::new(physio_id));
        }

        sql.push_str(" ORDER BY a.appointment_date, a.appointment_time");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(args.iter()), |row| {
            Ok(AppointmentDetail {
                id: row.get(0)?,
                date: row.get(1)?,
                time: row.get(2)?,
                patient_id: row.get(3)?,
                patient_name: row.get(4)?,
                physio: row.get(5)?,
                service_type: row.get(6)?,
                duration_minutes: row.get(7)?,
                price: row.get(8)?,
                status: parse_status(&row.get::<_, String>(9)?)?,
                notes: row.get(10)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// All appointments for a patient, ascending date then time.
    pub fn list_appointments_by_patient(&self, patient_id: i64) -> DbResult<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {APPOINTMENT_COLUMNS}
             FROM appointments
             WHERE patient_id = ?1
             ORDER BY appointment_date, appointment_time"
        ))?;
        let rows = stmt.query_map([patient_id], appointment_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Appointments assigned to a physio, optionally restricted to one day.
    pub fn list_appointments_by_staff(
        &self,
        physio_id: i64,
        date: Option<&str>,
    ) -> DbResult<Vec<Appointment>> {
        match date {
            Some(date) => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {APPOINTMENT_COLUMNS}
                     FROM appointments
                     WHERE physio_id = ?1 AND appointment_date = ?2
                     ORDER BY appointment_date, appointment_time"
                ))?;
                let rows = stmt.query_map(params![physio_id, date], appointment_from_row)?;
                rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
            }
            None => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {APPOINTMENT_COLUMNS}
                     FROM appointments
                     WHERE physio_id = ?1
                     ORDER BY appointment_date, appointment_time"
                ))?;
                let rows = stmt.query_map([physio_id], appointment_from_row)?;
                rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
            }
        }
    }

    /// Delete an appointment. Invoices that referenced it keep their rows
    /// with the reference nulled.
    pub fn delete_appointment(&self, id: i64) -> DbResult<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM appointments WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
