//! Contract type encoding
//!
//! The code table must stay identical to the one used when the training
//! data was produced.

use serde::{Deserialize, Serialize};

/// Code used for contract labels that are not in the table.
///
/// Unknown labels are encoded as Month-to-month, the highest-risk class.
/// This is intentional but risky: a typo in the caller's label silently
/// inflates the churn estimate instead of being rejected.
pub const UNKNOWN_CONTRACT_CODE: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractType {
    #[serde(rename = "Month-to-month")]
    MonthToMonth,
    #[serde(rename = "One year")]
    OneYear,
    #[serde(rename = "Two year")]
    TwoYear,
}

impl ContractType {
    pub const ALL: [ContractType; 3] = [Self::MonthToMonth, Self::OneYear, Self::TwoYear];

    /// Exact, case-sensitive label lookup
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Month-to-month" => Some(Self::MonthToMonth),
            "One year" => Some(Self::OneYear),
            "Two year" => Some(Self::TwoYear),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::MonthToMonth => "Month-to-month",
            Self::OneYear => "One year",
            Self::TwoYear => "Two year",
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Self::MonthToMonth => 0,
            Self::OneYear => 1,
            Self::TwoYear => 2,
        }
    }
}

/// Map a contract label to its integer code, falling back to
/// [`UNKNOWN_CONTRACT_CODE`] for labels outside the table.
pub fn contract_code(label: &str) -> u8 {
    match ContractType::from_label(label) {
        Some(contract) => contract.code(),
        None => {
            log::debug!("Unknown contract type {:?}, encoding as {}", label, UNKNOWN_CONTRACT_CODE);
            UNKNOWN_CONTRACT_CODE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_labels() {
        assert_eq!(contract_code("Month-to-month"), 0);
        assert_eq!(contract_code("One year"), 1);
        assert_eq!(contract_code("Two year"), 2);
    }

    #[test]
    fn test_unknown_labels_fall_back_to_zero() {
        for label in ["Foo", "", "two year", " One year", "Two-year"] {
            assert_eq!(contract_code(label), UNKNOWN_CONTRACT_CODE, "label {:?}", label);
        }
    }

    #[test]
    fn test_label_roundtrip() {
        for contract in ContractType::ALL {
            assert_eq!(ContractType::from_label(contract.label()), Some(contract));
        }
    }
}
