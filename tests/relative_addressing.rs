use automation_path_lookup as apl;
use apl::{ErrorKind, IntegerPathLookup, LookupPolicy, ObjectPathLookup, Provider, ProviderContext, StaticProvider};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn running_automation() -> ProviderContext {
    ProviderContext::new(json!({"trigger": {"httpRequest": {"content": {"id": 9}}}}))
        .with_tenant("carl")
        .with_trail(vec![
            json!({"alias": "loadQuote", "quote": {"premium": 120}}),
            json!({
                "alias": "iterateRisks",
                "currentIteration": {"item": {"risk": "fire"}, "count": 3, "index": 1},
                "notifyBroker": {"alias": "notifyBroker", "sent": true}
            }),
        ])
}

#[test]
fn test_iteration_scope() {
    let ctx = running_automation();
    let count = IntegerPathLookup::parse("0/currentIteration/count").unwrap().resolve(&ctx).unwrap();
    assert_eq!(count, 3);
    let item = ObjectPathLookup::parse("0/currentIteration/item").unwrap().resolve(&ctx).unwrap();
    assert_eq!(item, json!({"risk": "fire"}));
}

#[test]
fn test_named_child_action() {
    let ctx = running_automation();
    let sent = apl::ConditionPathLookup::parse("0/notifyBroker/sent").unwrap().resolve(&ctx).unwrap();
    assert!(sent);
}

#[test]
fn test_steps_back() {
    let ctx = running_automation();
    let premium = IntegerPathLookup::parse("1/quote/premium").unwrap().resolve(&ctx).unwrap();
    assert_eq!(premium, 120);
}

#[test]
fn test_relative_paths_ignore_the_source_object() {
    let ctx = running_automation();
    let lookup = apl::TextPathLookup::parse("1/alias")
        .unwrap()
        .with_source(StaticProvider::new(Value::Null));
    assert_eq!(lookup.resolve(&ctx).unwrap(), "loadQuote");
}

#[test]
fn test_step_beyond_trail_always_raises() {
    let ctx = running_automation();
    let lookup = IntegerPathLookup::parse("5/alias")
        .unwrap()
        .with_policy(LookupPolicy::builder().value_if_not_found(json!(0)).build());
    let err = lookup.resolve(&ctx).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IndexOutOfRange);
    assert_eq!(err.data().tenant.as_deref(), Some("carl"));
    assert_eq!(err.data().path.as_deref(), Some("5/alias"));
}

#[test]
fn test_absolute_path_reads_automation_data() {
    let ctx = running_automation();
    let id = IntegerPathLookup::parse("/trigger/httpRequest/content/id").unwrap().resolve(&ctx).unwrap();
    assert_eq!(id, 9);
}
