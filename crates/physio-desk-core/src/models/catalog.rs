//! Treatment service catalog models.

use serde::{Deserialize, Serialize};

/// A bookable treatment type. Reference data seeded at first run; booking
/// callers read duration and price from here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceOffering {
    pub id: i64,
    pub service_name: String,
    pub description: Option<String>,
    pub duration_minutes: i64,
    pub price: f64,
    pub is_active: bool,
}
