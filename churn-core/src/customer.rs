//! Customer record - the validated input of a single prediction

use serde::{Deserialize, Serialize};

/// Typed customer attributes, already validated at the request boundary
/// (`monthly_charges > 0`, `total_services >= 0`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub customer_id: String,
    pub monthly_charges: f64,
    pub total_services: u32,
    pub contract_type: String,
}

impl CustomerRecord {
    pub fn new(
        customer_id: impl Into<String>,
        monthly_charges: f64,
        total_services: u32,
        contract_type: impl Into<String>,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            monthly_charges,
            total_services,
            contract_type: contract_type.into(),
        }
    }
}
