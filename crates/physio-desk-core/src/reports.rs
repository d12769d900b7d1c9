//! Read-only aggregate views over appointments and invoices.
//!
//! Every figure is recomputed from the live rows on each call; nothing is
//! cached, so the numbers always agree with the current tables.

use serde::Serialize;

use crate::db::{Database, DbResult};
use crate::models::{AppointmentStatus, Role};

/// Appointment counts by status plus completed-revenue figures.
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentStats {
    pub scheduled: i64,
    pub completed: i64,
    pub cancelled: i64,
    pub no_show: i64,
    /// Sum of prices of completed appointments.
    pub completed_revenue: f64,
    /// Average price of completed appointments; absent when none exist.
    pub average_price: Option<f64>,
}

impl AppointmentStats {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// The front-desk dashboard figures.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    /// Appointments still scheduled for today.
    pub appointments_today: i64,
    pub total_patients: i64,
    /// Active staff, admins excluded.
    pub active_staff: i64,
    /// Completed-appointment revenue over the trailing seven days.
    pub revenue_last_7_days: f64,
    /// Live sum of unpaid invoice amounts.
    pub outstanding_balance: f64,
}

impl DashboardSummary {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Aggregate reporting over the shared store.
pub struct ReportService<'a> {
    db: &'a Database,
}

impl<'a> ReportService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    fn status_count(&self, status: AppointmentStatus) -> DbResult<i64> {
        Ok(self.db.conn().query_row(
            "SELECT COUNT(*) FROM appointments WHERE status = ?1",
            [status.as_str()],
            |row| row.get(0),
        )?)
    }

    /// Counts by status and revenue over completed appointments.
    pub fn appointment_stats(&self) -> DbResult<AppointmentStats> {
        let completed_revenue: f64 = self.db.conn().query_row(
            "SELECT COALESCE(SUM(price), 0) FROM appointments WHERE status = ?1",
            [AppointmentStatus::Completed.as_str()],
            |row| row.get(0),
        )?;
        let average_price: Option<f64> = self.db.conn().query_row(
            "SELECT AVG(price) FROM appointments WHERE status = ?1",
            [AppointmentStatus::Completed.as_str()],
            |row| row.get(0),
        )?;

        Ok(AppointmentStats {
            scheduled: self.status_count(AppointmentStatus::Scheduled)?,
            completed: self.status_count(AppointmentStatus::Completed)?,
            cancelled: self.status_count(AppointmentStatus::Cancelled)?,
            no_show: self.status_count(AppointmentStatus::NoShow)?,
            completed_revenue,
            average_price,
        })
    }

    /// Today's workload and the money figures for the landing dashboard.
    pub fn dashboard_summary(&self) -> DbResult<DashboardSummary> {
        let conn = self.db.conn();

        let appointments_today: i64 = conn.query_row(
            "SELECT COUNT(*) FROM appointments
             WHERE appointment_date = date('now') AND status = ?1",
            [AppointmentStatus::Scheduled.as_str()],
            |row| row.get(0),
        )?;
        let total_patients: i64 =
            conn.query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;
        let active_staff: i64 = conn.query_row(
            "SELECT COUNT(*) FROM staff WHERE is_active = 1 AND role != ?1",
            [Role::Admin.as_str()],
            |row| row.get(0),
        )?;
        let revenue_last_7_days: f64 = conn.query_row(
            "SELECT COALESCE(SUM(price), 0) FROM appointments
             WHERE status = ?1 AND appointment_date >= date('now', '-7 days')",
            [AppointmentStatus::Completed.as_str()],
            |row| row.get(0),
        )?;

        Ok(DashboardSummary {
            appointments_today,
            total_patients,
            active_staff,
            revenue_last_7_days,
            outstanding_balance: self.db.outstanding_total()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewAppointment, NewInvoice, NewPatient, Role};

    fn setup_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.create_patient(&NewPatient::new("Sarah", "Johnson", "07700 900123"))
            .unwrap();
        db.create_staff("10001", "password1", Role::Receptionist).unwrap();
        db
    }

    fn book_with_price(db: &Database, date: &str, time: &str, price: f64) -> i64 {
        let mut booking = NewAppointment::new(1, date, time, "Assessment", 1);
        booking.price = Some(price);
        db.book_appointment(&booking).unwrap()
    }

    #[test]
    fn test_empty_stats() {
        let db = setup_db();
        let stats = ReportService::new(&db).appointment_stats().unwrap();

        assert_eq!(stats.scheduled, 0);
        assert_eq!(stats.completed, 0);
        assert_eq!(stats.completed_revenue, 0.0);
        assert_eq!(stats.average_price, None);
    }

    #[test]
    fn test_stats_follow_status_changes() {
        let db = setup_db();

        let a = book_with_price(&db, "2026-02-18", "09:00", 60.0);
        let b = book_with_price(&db, "2026-02-18", "10:00", 40.0);
        book_with_price(&db, "2026-02-19", "09:00", 55.0);

        db.set_appointment_status(a, AppointmentStatus::Completed).unwrap();
        db.set_appointment_status(b, AppointmentStatus::Completed).unwrap();

        let stats = ReportService::new(&db).appointment_stats().unwrap();
        assert_eq!(stats.scheduled, 1);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.cancelled, 0);
        assert_eq!(stats.no_show, 0);
        assert_eq!(stats.completed_revenue, 100.0);
        assert_eq!(stats.average_price, Some(50.0));
    }

    #[test]
    fn test_dashboard_summary() {
        let db = setup_db();
        db.create_staff("10002", "password2", Role::Physiotherapist).unwrap();
        db.create_staff("10003", "password3", Role::Admin).unwrap();

        let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
        book_with_price(&db, &today, "09:00", 60.0);
        let done = book_with_price(&db, &today, "10:00", 75.0);
        db.set_appointment_status(done, AppointmentStatus::Completed).unwrap();

        db.create_invoice(&NewInvoice::new(1, 45.0, "Assessment", 1)).unwrap();

        let summary = ReportService::new(&db).dashboard_summary().unwrap();
        assert_eq!(summary.appointments_today, 1);
        assert_eq!(summary.total_patients, 1);
        // Admin excluded from the active-staff count.
        assert_eq!(summary.active_staff, 2);
        assert_eq!(summary.revenue_last_7_days, 75.0);
        assert_eq!(summary.outstanding_balance, 45.0);
    }

    #[test]
    fn test_json_export() {
        let db = setup_db();
        let stats = ReportService::new(&db).appointment_stats().unwrap();

        let json = stats.to_json().unwrap();
        assert!(json.contains("\"scheduled\""));
        assert!(json.contains("\"completed_revenue\""));
    }
}
