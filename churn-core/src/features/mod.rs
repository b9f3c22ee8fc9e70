//! Features Module - Feature Encoding
//!
//! Turns a validated customer record into the fixed-order vector the
//! classifier was trained on.

pub mod layout;
pub mod vector;
pub mod contract;
pub mod encoder;

#[cfg(test)]
mod tests;

// Re-export common types
pub use layout::{FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION, LayoutInfo, LayoutMismatchError, layout_hash};
pub use vector::FeatureVector;
pub use contract::{ContractType, contract_code, UNKNOWN_CONTRACT_CODE};
pub use encoder::{encode, encode_raw};
