use automation_path_lookup as apl;
use apl::{DatePathLookup, ErrorKind, LookupPolicy, NumberPathLookup, Provider, ProviderContext};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use serde_json::json;

#[test]
fn test_not_found_raises_by_default() {
    let err = apl::lookup::<i64>(&json!({"a": 1}), "/b").unwrap_err();
    assert_eq!(err.code(), "automation.providers.path.not.found");
}

#[test]
fn test_not_found_fallback() {
    let policy = LookupPolicy::builder().value_if_not_found(json!(42)).build();
    assert_eq!(apl::lookup_with_policy::<i64>(&json!({}), "/b", policy).unwrap(), 42);
}

#[test]
fn test_null_raises_by_default() {
    let err = apl::lookup::<bool>(&json!({"c": null}), "/c").unwrap_err();
    assert_eq!(err.code(), "automation.providers.path.query.value.if.null");
}

#[test]
fn test_type_mismatch_fallback() {
    let policy = LookupPolicy::builder().value_if_type_mismatch(json!(0)).build();
    assert_eq!(apl::lookup_with_policy::<i64>(&json!({"n": "x"}), "/n", policy).unwrap(), 0);
}

#[test]
fn test_fallbacks_do_not_apply_to_structural_errors() {
    let policy = LookupPolicy::builder()
        .value_if_not_found(json!(1))
        .value_if_null(json!(1))
        .value_if_type_mismatch(json!(1))
        .build();
    let data = json!({"list": [1, 2], "leaf": 5});
    let oob = apl::lookup_with_policy::<i64>(&data, "/list/7", policy.clone()).unwrap_err();
    assert_eq!(oob.kind(), ErrorKind::IndexOutOfRange);
    assert_eq!((oob.data().index, oob.data().length), (Some(7), Some(2)));
    let prim = apl::lookup_with_policy::<i64>(&data, "/leaf/x", policy).unwrap_err();
    assert_eq!(prim.kind(), ErrorKind::PrimitiveEncounteredMidPath);
}

#[test]
fn test_value_lookup_never_mismatches() {
    let policy = LookupPolicy::builder().raise_error_if_type_mismatch(true).build();
    let out = apl::lookup_with_policy::<apl::WrappedValue>(&json!({"v": [1]}), "/v", policy).unwrap();
    assert_eq!(out.type_name(), "list");
}

#[test]
fn test_number_accepts_integers_and_decimals() {
    let ctx = ProviderContext::new(json!({"premium": 100, "tax": 9.95}));
    let premium = NumberPathLookup::parse("/premium").unwrap().resolve(&ctx).unwrap();
    let tax = NumberPathLookup::parse("/tax").unwrap().resolve(&ctx).unwrap();
    assert_eq!(premium + tax, Decimal::new(10995, 2));
}

#[test]
fn test_date_fallback_string_is_parsed() {
    let lookup = DatePathLookup::parse("/inception")
        .unwrap()
        .with_policy(LookupPolicy::builder().value_if_not_found(json!("2025-01-01")).build());
    let ctx = ProviderContext::new(json!({}));
    assert_eq!(lookup.resolve(&ctx).unwrap(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
}

#[test]
fn test_date_with_alternate_format() {
    let settings = apl::JsonSettings::from_json(r#"{"dateFormats": ["%d/%m/%Y"]}"#).unwrap();
    let ctx = ProviderContext::new(json!({"d": "15/08/2024"})).with_settings(settings);
    let date = DatePathLookup::parse("/d").unwrap().resolve(&ctx).unwrap();
    assert_eq!(date, NaiveDate::from_ymd_opt(2024, 8, 15).unwrap());
}

#[test]
fn test_null_error_document() {
    let err = apl::lookup::<bool>(&json!({"c": null}), "/c").unwrap_err();
    let doc = err.to_json();
    assert_eq!(doc["code"], json!("automation.providers.path.query.value.if.null"));
    assert_eq!(doc["title"], json!("Path query value is null"));
    assert_eq!(doc["data"]["path"], json!("/c"));
}

#[test]
fn test_date_type_mismatch_fallback() {
    let lookup = DatePathLookup::parse("/d")
        .unwrap()
        .with_policy(LookupPolicy::builder().value_if_type_mismatch(json!("2024-01-01")).build());
    let ctx = ProviderContext::new(json!({"d": 5}));
    assert_eq!(lookup.resolve(&ctx).unwrap(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
}

#[test]
fn test_number_type_mismatch_fallback() {
    let lookup = NumberPathLookup::parse("/n")
        .unwrap()
        .with_policy(LookupPolicy::builder().value_if_type_mismatch(json!(1.5)).build());
    let ctx = ProviderContext::new(json!({"n": "x"}));
    assert_eq!(lookup.resolve(&ctx).unwrap(), Decimal::new(15, 1));
}

#[test]
fn test_large_decimal_keeps_its_digits() {
    let data: serde_json::Value = serde_json::from_str(r#"{"sum": 12345678901234.123456}"#).unwrap();
    let sum = NumberPathLookup::parse("/sum").unwrap().resolve(&ProviderContext::new(data)).unwrap();
    assert_eq!(sum, Decimal::from_str_exact("12345678901234.123456").unwrap());
}

#[test]
fn test_local_date_time_resolves_as_date() {
    let ctx = ProviderContext::new(json!({"d": "2024-02-29T10:00:00"}));
    let date = DatePathLookup::parse("/d").unwrap().resolve(&ctx).unwrap();
    assert_eq!(date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
}

#[test]
fn test_unrepresentable_values_are_conversion_errors() {
    let policy = LookupPolicy::builder().value_if_type_mismatch(json!(0)).build();
    let big = apl::lookup_with_policy::<i64>(&json!({"n": u64::MAX}), "/n", policy).unwrap_err();
    assert_eq!(big.kind(), ErrorKind::ValueConversion);
    assert_eq!(big.code(), "automation.providers.value.conversion.failed");

    let bytes = apl::lookup::<apl::WrappedValue>(&json!({"file": {"$base64": "!!"}}), "/file").unwrap_err();
    assert_eq!(bytes.kind(), ErrorKind::ValueConversion);
    assert_eq!(bytes.data().path.as_deref(), Some("/file"));
}
