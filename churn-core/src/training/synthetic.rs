//! Synthetic customer dataset
//!
//! Customers are drawn uniformly and labelled by a rule-based churn score:
//! expensive plans, month-to-month contracts and single-service customers
//! churn more often.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::customer::CustomerRecord;
use crate::features::{encode, ContractType, FeatureVector};

pub const MIN_MONTHLY_CHARGES: f64 = 20.0;
pub const MAX_MONTHLY_CHARGES: f64 = 120.0;
pub const MAX_TOTAL_SERVICES: u32 = 4;

/// One labelled training row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    pub record: CustomerRecord,
    pub features: FeatureVector,
    pub churn: bool,
}

/// Rule score in 0..=8
pub fn churn_score(monthly_charges: f64, total_services: u32, contract_code: u8) -> u32 {
    let mut score = 0;
    if monthly_charges > 80.0 {
        score += 3;
    }
    if contract_code == 0 {
        score += 4;
    }
    if total_services == 1 {
        score += 1;
    }
    score
}

pub fn churn_probability(monthly_charges: f64, total_services: u32, contract_code: u8) -> f64 {
    f64::from(churn_score(monthly_charges, total_services, contract_code)) / 10.0
}

/// Draw `n` labelled customers. Deterministic for a seeded `rng`.
pub fn generate_dataset<R: Rng>(n: usize, rng: &mut R) -> Vec<TrainingSample> {
    (0..n)
        .map(|i| {
            let monthly_charges = rng.gen_range(MIN_MONTHLY_CHARGES..MAX_MONTHLY_CHARGES);
            let total_services = rng.gen_range(1..=MAX_TOTAL_SERVICES);
            let contract = ContractType::ALL[rng.gen_range(0..ContractType::ALL.len())];

            let record = CustomerRecord::new(
                format!("synthetic_{:05}", i),
                monthly_charges,
                total_services,
                contract.label(),
            );
            let features = encode(&record);

            let p = churn_probability(monthly_charges, total_services, contract.code());
            let churn = rng.gen::<f64>() < p;

            TrainingSample { record, features, churn }
        })
        .collect()
}
