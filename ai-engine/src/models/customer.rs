//! Prediction request body

use churn_core::CustomerRecord;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CustomerData {
    /// Unique customer id
    pub customer_id: String,

    /// Monthly charges in dollars
    #[validate(range(exclusive_min = 0.0, message = "monthly_charges must be greater than 0"))]
    pub monthly_charges: f64,

    /// Number of contracted services
    #[validate(range(min = 0, message = "total_services must be greater than or equal to 0"))]
    pub total_services: i64,

    /// Month-to-month, One year, Two year
    pub contract_type: String,
}

impl CustomerData {
    pub fn into_record(self) -> Result<CustomerRecord, AppError> {
        let total_services = u32::try_from(self.total_services)
            .map_err(|_| AppError::Validation("total_services is out of range".to_string()))?;

        Ok(CustomerRecord {
            customer_id: self.customer_id,
            monthly_charges: self.monthly_charges,
            total_services,
            contract_type: self.contract_type,
        })
    }
}
