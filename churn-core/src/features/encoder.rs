//! Feature Encoder
//!
//! Pure mapping from a customer record to the model input. Training
//! (`crate::training`) builds its rows through the same function.

use crate::customer::CustomerRecord;
use super::contract::contract_code;
use super::vector::FeatureVector;

/// Encode a record as `(monthly_charges, total_services, contract_type_code)`
pub fn encode(record: &CustomerRecord) -> FeatureVector {
    encode_raw(
        record.monthly_charges,
        record.total_services,
        contract_code(&record.contract_type),
    )
}

/// Encode already-coded attributes
pub fn encode_raw(monthly_charges: f64, total_services: u32, contract_code: u8) -> FeatureVector {
    FeatureVector::from_values([
        monthly_charges as f32,
        total_services as f32,
        f32::from(contract_code),
    ])
}
