//! Risk tiers and recommended actions
//!
//! Fixed mapping from a churn probability to a tier and a retention
//! action. Thresholds are exclusive lower bounds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Probabilities strictly above this are Critical
pub const CRITICAL_THRESHOLD: f64 = 0.85;

/// Probabilities strictly above this (and not Critical) are High
pub const HIGH_THRESHOLD: f64 = 0.6;

pub const CRITICAL_ACTION: &str = "Immediate contact: offer a retention discount of up to 30%";
pub const HIGH_ACTION: &str = "Offer a plan upgrade or a free add-on service";
pub const LOW_ACTION: &str = "Standard monitoring";
pub const DEFAULT_ACTION: &str = "No action required";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    High,
    Critical,
}

impl RiskTier {
    pub fn from_probability(probability: f64) -> Self {
        if probability > CRITICAL_THRESHOLD {
            Self::Critical
        } else if probability > HIGH_THRESHOLD {
            Self::High
        } else {
            Self::Low
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Low" => Some(Self::Low),
            "High" => Some(Self::High),
            "Critical" => Some(Self::Critical),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }

    pub fn recommended_action(&self) -> &'static str {
        match self {
            Self::Critical => CRITICAL_ACTION,
            Self::High => HIGH_ACTION,
            Self::Low => LOW_ACTION,
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action for a tier given by name; unknown names get [`DEFAULT_ACTION`]
pub fn action_for_label(label: &str) -> &'static str {
    RiskTier::from_label(label)
        .map(|tier| tier.recommended_action())
        .unwrap_or(DEFAULT_ACTION)
}

/// Round to 2 decimals, half up on the shortest decimal form of the value
/// (0.125 → 0.13, 0.145 → 0.15).
///
/// Rounding `p * 100` directly would follow the binary error of each
/// input, so 0.145 (stored as 0.14499...) would go down while 0.615 goes up.
pub fn round_probability(probability: f64) -> f64 {
    let repr = probability.clamp(0.0, 1.0).to_string();
    let (whole, fraction) = repr.split_once('.').unwrap_or((repr.as_str(), ""));

    let digits = fraction.as_bytes();
    let digit = |i: usize| digits.get(i).map_or(0, |d| u64::from(d - b'0'));

    let mut hundredths = whole.parse::<u64>().unwrap_or(0) * 100 + digit(0) * 10 + digit(1);
    if digit(2) >= 5 {
        hundredths += 1;
    }

    (hundredths as f64 / 100.0).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(RiskTier::from_probability(0.0), RiskTier::Low);
        assert_eq!(RiskTier::from_probability(0.60), RiskTier::Low);
        assert_eq!(RiskTier::from_probability(0.6001), RiskTier::High);
        assert_eq!(RiskTier::from_probability(0.85), RiskTier::High);
        assert_eq!(RiskTier::from_probability(0.8501), RiskTier::Critical);
        assert_eq!(RiskTier::from_probability(1.0), RiskTier::Critical);
    }

    #[test]
    fn test_actions() {
        assert_eq!(RiskTier::Critical.recommended_action(), CRITICAL_ACTION);
        assert_eq!(RiskTier::High.recommended_action(), HIGH_ACTION);
        assert_eq!(RiskTier::Low.recommended_action(), LOW_ACTION);
        assert_eq!(action_for_label("High"), HIGH_ACTION);
        assert_eq!(action_for_label("Medium"), DEFAULT_ACTION);
    }

    #[test]
    fn test_tier_serializes_as_label() {
        assert_eq!(serde_json::to_string(&RiskTier::Critical).unwrap(), "\"Critical\"");
        for tier in [RiskTier::Low, RiskTier::High, RiskTier::Critical] {
            assert_eq!(RiskTier::from_label(&tier.to_string()), Some(tier));
        }
    }

    #[test]
    fn test_rounding_half_up() {
        assert_eq!(round_probability(0.125), 0.13);
        assert_eq!(round_probability(0.375), 0.38);
        assert_eq!(round_probability(0.875), 0.88);
        assert_eq!(round_probability(0.124), 0.12);
        assert_eq!(round_probability(0.9), 0.9);
    }

    #[test]
    fn test_rounding_decimal_midpoints_go_up() {
        let cases = [
            (0.015, 0.02),
            (0.105, 0.11),
            (0.145, 0.15),
            (0.285, 0.29),
            (0.575, 0.58),
            (0.615, 0.62),
            (0.845, 0.85),
        ];
        for (input, expected) in cases {
            assert_eq!(round_probability(input), expected, "input {}", input);
        }
    }

    #[test]
    fn test_rounding_below_midpoint_goes_down() {
        assert_eq!(round_probability(0.1449999), 0.14);
        assert_eq!(round_probability(0.604), 0.6);
        assert_eq!(round_probability(1e-20), 0.0);
    }

    #[test]
    fn test_rounding_stays_in_unit_interval() {
        assert_eq!(round_probability(0.0), 0.0);
        assert_eq!(round_probability(1.0), 1.0);
        assert_eq!(round_probability(0.999), 1.0);
        assert_eq!(round_probability(0.004), 0.0);
    }
}
