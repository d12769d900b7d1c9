//! Invoice models.

use serde::{Deserialize, Serialize};

/// Invoice payment status. Freely togglable in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    Paid,
    Unpaid,
}

impl InvoiceStatus {
    /// Stored string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Unpaid => "Unpaid",
        }
    }

    /// Parse the stored string form.
    pub fn parse(s: &str) -> Option<InvoiceStatus> {
        match s {
            "Paid" => Some(InvoiceStatus::Paid),
            "Unpaid" => Some(InvoiceStatus::Unpaid),
            _ => None,
        }
    }
}

/// An issued invoice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Invoice {
    pub id: i64,
    pub patient_id: i64,
    /// The appointment this invoice was raised from, if any. Nulled when
    /// that appointment is deleted; the invoice itself survives.
    pub appointment_id: Option<i64>,
    pub amount: f64,
    pub description: String,
    pub status: InvoiceStatus,
    pub created_by: Option<i64>,
    pub created_at: String,
}

/// Fields for creating an invoice. Amount must be strictly positive and the
/// description non-empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewInvoice {
    pub patient_id: i64,
    pub appointment_id: Option<i64>,
    pub amount: f64,
    pub description: String,
    pub created_by: i64,
}

impl NewInvoice {
    pub fn new(patient_id: i64, amount: f64, description: &str, created_by: i64) -> Self {
        Self {
            patient_id,
            appointment_id: None,
            amount,
            description: description.to_string(),
            created_by,
        }
    }
}

/// An invoice row joined with the patient's display name, as returned by
/// the ledger listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvoiceDetail {
    pub id: i64,
    pub patient_id: i64,
    pub patient_name: String,
    pub appointment_id: Option<i64>,
    pub amount: f64,
    pub description: String,
    pub status: InvoiceStatus,
    pub created_at: String,
}
