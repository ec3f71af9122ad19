use automation_path_lookup as apl;
use apl::{
    AndCondition, BoxedProvider, ComparisonCondition, ComparisonOp, NotCondition, PathLookupConfig, Provider,
    ProviderContext, ValuePathLookup,
};
use serde_json::json;

fn value(path: &str) -> ValuePathLookup {
    ValuePathLookup::parse(path).unwrap()
}

#[test]
fn test_compare_two_lookups() {
    let ctx = ProviderContext::new(json!({"sumInsured": 500000, "limit": 1000000}));
    let within = ComparisonCondition::new(ComparisonOp::Lte, value("/sumInsured"), value("/limit"));
    assert!(within.resolve(&ctx).unwrap());
}

#[test]
fn test_condition_tree_from_config() {
    let ctx = ProviderContext::new(json!({"quote": {"declined": false, "state": "approved"}}));
    let declined = PathLookupConfig::from_json(r#"{"path": "/quote/declined"}"#)
        .unwrap()
        .build::<bool>()
        .unwrap();
    let approved = ComparisonCondition::new(
        ComparisonOp::Eq,
        value("/quote/state"),
        apl::StaticProvider::new(apl::WrappedValue::from("approved")),
    );
    let conditions: Vec<BoxedProvider<bool>> = vec![Box::new(NotCondition::new(declined)), Box::new(approved)];
    assert!(AndCondition::new(conditions).resolve(&ctx).unwrap());
}

#[test]
fn test_lookup_errors_propagate_through_conditions() {
    let ctx = ProviderContext::new(json!({}));
    let cond = ComparisonCondition::new(ComparisonOp::Eq, value("/missing"), value(""));
    let err = cond.resolve(&ctx).unwrap_err();
    assert_eq!(err.code(), "automation.providers.path.not.found");
}

#[test]
fn test_integer_and_decimal_compare_numerically() {
    let ctx = ProviderContext::new(json!({"premium": 100, "threshold": 99.5, "count": 5, "limit": 5.0}));
    let above = ComparisonCondition::new(ComparisonOp::Gt, value("/premium"), value("/threshold"));
    assert!(above.resolve(&ctx).unwrap());
    let same = ComparisonCondition::new(ComparisonOp::Eq, value("/count"), value("/limit"));
    assert!(same.resolve(&ctx).unwrap());
}
