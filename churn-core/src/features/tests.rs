//! Encoder tests across layout, contract table and vector

use crate::customer::CustomerRecord;
use crate::features::{encode, encode_raw, FEATURE_COUNT, FEATURE_VERSION, layout_hash};
use crate::features::layout::validate_layout;

fn record(contract: &str) -> CustomerRecord {
    CustomerRecord::new("c1", 90.0, 1, contract)
}

#[test]
fn test_encode_field_order() {
    let vector = encode(&CustomerRecord::new("c1", 75.5, 3, "One year"));

    assert_eq!(vector.values, [75.5, 3.0, 1.0]);
    assert_eq!(vector.get_by_name("monthly_charges"), Some(75.5));
    assert_eq!(vector.get_by_name("total_services"), Some(3.0));
    assert_eq!(vector.get_by_name("contract_type_code"), Some(1.0));
    assert_eq!(vector.as_slice().len(), FEATURE_COUNT);
}

#[test]
fn test_encode_is_deterministic() {
    let a = encode(&record("Two year"));
    let b = encode(&record("Two year"));

    assert_eq!(a, b);
    let bytes_a: Vec<u8> = a.values.iter().flat_map(|v| v.to_le_bytes()).collect();
    let bytes_b: Vec<u8> = b.values.iter().flat_map(|v| v.to_le_bytes()).collect();
    assert_eq!(bytes_a, bytes_b);
}

#[test]
fn test_encode_unknown_contract() {
    assert_eq!(encode(&record("Foo")).values[2], 0.0);
    assert_eq!(encode(&record("Foo")), encode(&record("Month-to-month")));
}

#[test]
fn test_encode_ignores_customer_id() {
    let a = encode(&CustomerRecord::new("a", 20.0, 0, "Two year"));
    let b = encode(&CustomerRecord::new("b", 20.0, 0, "Two year"));
    assert_eq!(a, b);
}

#[test]
fn test_encode_matches_raw_encoding() {
    assert_eq!(encode(&record("Two year")), encode_raw(90.0, 1, 2));
}

#[test]
fn test_vector_carries_current_layout() {
    let vector = encode(&record("One year"));
    assert_eq!(vector.version, FEATURE_VERSION);
    assert_eq!(vector.layout_hash, layout_hash());
    assert!(validate_layout(vector.version, vector.layout_hash).is_ok());
}

#[test]
fn test_log_entry_names_values() {
    let entry = encode(&record("Two year")).to_log_entry();
    assert_eq!(entry["named_values"]["contract_type_code"], 2.0);
    assert_eq!(entry["feature_version"], FEATURE_VERSION);
}
