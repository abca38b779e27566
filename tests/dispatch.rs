//! Integration tests for rule dispatch, auto-fake properties and call history.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use dotfake::{
    prelude::*,
    rules::{AnyCallMatcher, ArgumentValuesMatcher, PropertyBehaviorRule},
    Result,
};
use proptest::prelude::*;

fn create_catalog() -> InterfaceCatalog {
    let catalog = InterfaceCatalog::new();
    catalog.register(
        InterfaceDef::new("IFoo")
            .method("Bar", vec![TypeSig::I32], TypeSig::String)
            .method("Baz", vec![], TypeSig::I32)
            .method("DoWork", vec![TypeSig::String], TypeSig::Void)
            .method("CreateBar", vec![], TypeSig::interface("IBar"))
            .property("Nested", TypeSig::interface("IBar"))
            .property("Name", TypeSig::String)
            .read_only_property("Count", TypeSig::I32),
    );
    catalog.register(
        InterfaceDef::new("IBar")
            .property("Value", TypeSig::I32)
            .property("Next", TypeSig::interface("IBar")),
    );
    catalog
}

#[derive(Debug)]
struct WorkFailed;

impl std::fmt::Display for WorkFailed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "work failed")
    }
}

impl std::error::Error for WorkFailed {}

#[test]
fn test_most_recent_rule_wins() -> Result<()> {
    let foo = create_catalog().fake("IFoo")?;

    foo.add_rule(ConfiguredRule::new("old").match_method_name("Baz").returns(1))?;
    foo.add_rule(ConfiguredRule::new("new").match_method_name("Baz").returns(2))?;

    assert_eq!(foo.call("Baz", vec![])?, FakeValue::I32(2));
    Ok(())
}

#[test]
fn test_inapplicable_newer_rule_does_not_shadow() -> Result<()> {
    let foo = create_catalog().fake("IFoo")?;

    foo.add_rule(ConfiguredRule::new("any-bar").match_method_name("Bar").returns("any"))?;
    foo.add_rule(
        ConfiguredRule::new("bar-5")
            .match_method_name("Bar")
            .match_argument_values(vec![FakeValue::I32(5)])
            .returns("five"),
    )?;

    assert_eq!(foo.call("Bar", vec![FakeValue::I32(5)])?, FakeValue::string("five"));
    assert_eq!(foo.call("Bar", vec![FakeValue::I32(6)])?, FakeValue::string("any"));
    Ok(())
}

#[test]
fn test_limited_rule_falls_through_after_limit() -> Result<()> {
    let foo = create_catalog().fake("IFoo")?;

    foo.add_rule(ConfiguredRule::new("base").match_method_name("Baz").returns(10))?;
    foo.add_rule(ConfiguredRule::new("twice").match_method_name("Baz").returns(20).twice())?;

    let results: Vec<FakeValue> = (0..4)
        .map(|_| foo.call("Baz", vec![]))
        .collect::<Result<_>>()?;
    assert_eq!(
        results,
        vec![
            FakeValue::I32(20),
            FakeValue::I32(20),
            FakeValue::I32(10),
            FakeValue::I32(10)
        ]
    );
    Ok(())
}

#[test]
fn test_exhausted_rule_falls_back_to_default() -> Result<()> {
    let foo = create_catalog().fake("IFoo")?;

    foo.add_rule(ConfiguredRule::new("once").match_method_name("Baz").returns(3).once())?;

    assert_eq!(foo.call("Baz", vec![])?, FakeValue::I32(3));
    assert_eq!(foo.call("Baz", vec![])?, FakeValue::I32(0));
    Ok(())
}

#[test]
fn test_failed_action_consumes_call_budget() -> Result<()> {
    let foo = create_catalog().fake("IFoo")?;

    foo.add_rule(
        ConfiguredRule::new("fail-once")
            .match_method_name("Baz")
            .throws(|_| Error::user(WorkFailed))
            .once(),
    )?;

    assert!(foo.call("Baz", vec![]).is_err());
    assert_eq!(foo.call("Baz", vec![])?, FakeValue::I32(0));
    Ok(())
}

#[test]
fn test_action_error_propagates_unchanged() -> Result<()> {
    let foo = create_catalog().fake("IFoo")?;
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);

    foo.add_rule(
        ConfiguredRule::new("work")
            .match_method_name("DoWork")
            .invokes(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(Error::user(WorkFailed))
            }),
    )?;

    let error = foo.call("DoWork", vec![FakeValue::string("x")]).unwrap_err();
    assert!(error.downcast_user_ref::<WorkFailed>().is_some());
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    let history = foo.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history.get(0).and_then(|c| c.result()), None);
    Ok(())
}

#[test]
fn test_returns_lazily_sees_arguments() -> Result<()> {
    let foo = create_catalog().fake("IFoo")?;

    foo.add_rule(
        ConfiguredRule::new("echo")
            .match_method_name("Bar")
            .returns_lazily(|call| {
                let n = call.argument(0).and_then(FakeValue::as_i32).unwrap_or_default();
                FakeValue::string(&format!("#{n}"))
            }),
    )?;

    assert_eq!(foo.call("Bar", vec![FakeValue::I32(9)])?, FakeValue::string("#9"));
    Ok(())
}

#[test]
fn test_auto_fake_property_is_populated_once() -> Result<()> {
    let foo = create_catalog().fake("IFoo")?;
    let rules_before = foo.rules()?.len();

    let first = foo.get("Nested")?;
    let second = foo.get("Nested")?;

    let nested = first.as_fake().expect("nested fake");
    assert_eq!(nested.fake_type(), &TypeSig::interface("IBar"));
    assert_eq!(first, second);
    assert_eq!(foo.rules()?.len(), rules_before + 1);
    Ok(())
}

#[test]
fn test_auto_fake_recurses_through_nested_fakes() -> Result<()> {
    let foo = create_catalog().fake("IFoo")?;

    let nested = foo.get("Nested")?;
    let bar = nested.as_fake().expect("nested fake");
    let next = bar.get("Next")?;

    assert!(next.as_fake().is_some());
    assert_eq!(bar.get("Next")?, next);
    assert_eq!(bar.get("Value")?, FakeValue::I32(0));
    Ok(())
}

#[test]
fn test_configured_getter_overrides_auto_fake() -> Result<()> {
    let foo = create_catalog().fake("IFoo")?;

    foo.add_rule(
        ConfiguredRule::new("no-nested")
            .match_property_getter("Nested")
            .returns(FakeValue::Null),
    )?;

    assert_eq!(foo.get("Nested")?, FakeValue::Null);
    Ok(())
}

#[test]
fn test_auto_fake_disabled_returns_fresh_fakes() -> Result<()> {
    let catalog = InterfaceCatalog::with_config(FakeConfig::default().with_auto_fake_properties(false));
    catalog.register(InterfaceDef::new("IBar"));
    catalog.register(InterfaceDef::new("IFoo").property("Nested", TypeSig::interface("IBar")));
    let foo = catalog.fake("IFoo")?;

    let first = foo.get("Nested")?;
    let second = foo.get("Nested")?;

    assert!(first.as_fake().is_some());
    assert_ne!(first, second);
    Ok(())
}

#[test]
fn test_method_returning_fakable_type_is_not_cached() -> Result<()> {
    let foo = create_catalog().fake("IFoo")?;

    let first = foo.call("CreateBar", vec![])?;
    let second = foo.call("CreateBar", vec![])?;

    assert!(first.as_fake().is_some() && second.as_fake().is_some());
    assert_ne!(first, second);
    Ok(())
}

#[test]
fn test_property_set_then_get() -> Result<()> {
    let foo = create_catalog().fake("IFoo")?;

    assert_eq!(foo.get("Name")?, FakeValue::string(""));
    foo.set("Name", "first")?;
    assert_eq!(foo.get("Name")?, FakeValue::string("first"));
    foo.set("Name", "second")?;
    assert_eq!(foo.get("Name")?, FakeValue::string("second"));
    Ok(())
}

#[test]
fn test_property_set_replaces_auto_fake() -> Result<()> {
    let foo = create_catalog().fake("IFoo")?;

    let auto = foo.get("Nested")?;
    foo.set("Nested", FakeValue::Null)?;

    assert_ne!(foo.get("Nested")?, auto);
    assert_eq!(foo.get("Nested")?, FakeValue::Null);
    Ok(())
}

#[test]
fn test_minimal_config_ignores_property_writes() -> Result<()> {
    let catalog = InterfaceCatalog::with_config(FakeConfig::minimal());
    catalog.register(InterfaceDef::new("IFoo").property("Name", TypeSig::String));
    let foo = catalog.fake("IFoo")?;

    foo.set("Name", "ignored")?;

    assert_eq!(foo.get("Name")?, FakeValue::string(""));
    assert_eq!(foo.rules()?, vec!["default return value".to_string()]);
    Ok(())
}

#[test]
fn test_custom_property_behavior_rule() -> Result<()> {
    let foo = create_catalog().fake("IFoo")?;
    let getter = foo.definition().getter("Count").expect("Count getter");

    foo.add_rule(PropertyBehaviorRule::new((**getter).clone(), FakeValue::I32(12)))?;

    assert_eq!(foo.get("Count")?, FakeValue::I32(12));
    Ok(())
}

#[test]
fn test_remove_rule_restores_previous_behavior() -> Result<()> {
    let foo = create_catalog().fake("IFoo")?;

    foo.add_rule(ConfiguredRule::new("one").match_method_name("Baz").returns(1))?;
    let id = foo.add_rule(ConfiguredRule::new("two").match_method_name("Baz").returns(2))?;
    assert_eq!(foo.call("Baz", vec![])?, FakeValue::I32(2));

    assert!(foo.remove_rule(id)?);
    assert_eq!(foo.call("Baz", vec![])?, FakeValue::I32(1));
    assert!(!foo.remove_rule(id)?);
    Ok(())
}

#[test]
fn test_add_rule_last_keeps_existing_priority() -> Result<()> {
    let foo = create_catalog().fake("IFoo")?;

    foo.add_rule(ConfiguredRule::new("first").match_method_name("Baz").returns(1))?;
    foo.add_rule_last(Arc::new(
        ConfiguredRule::new("fallback").match_method_name("Baz").returns(2),
    ))?;

    assert_eq!(foo.call("Baz", vec![])?, FakeValue::I32(1));
    Ok(())
}

#[test]
fn test_history_records_calls_in_order() -> Result<()> {
    let foo = create_catalog().fake("IFoo")?;

    foo.call("Bar", vec![FakeValue::I32(1)])?;
    foo.call("Baz", vec![])?;
    foo.call("Bar", vec![FakeValue::I32(2)])?;

    let history = foo.history();
    let names: Vec<&str> = history.iter().map(|c| &*c.method().name).collect();
    assert_eq!(names, vec!["Bar", "Baz", "Bar"]);
    assert_eq!(history.get(2).and_then(|c| c.argument(0)), Some(&FakeValue::I32(2)));
    assert_eq!(history.get(1).and_then(|c| c.result()), Some(&FakeValue::I32(0)));
    Ok(())
}

#[test]
fn test_history_is_repeatable() -> Result<()> {
    let foo = create_catalog().fake("IFoo")?;
    foo.call("Baz", vec![])?;
    foo.call("Baz", vec![])?;

    let first = foo.history();
    let second = foo.history();

    assert_eq!(first, second);
    assert_eq!(first.iter().count(), 2);
    assert_eq!(first.iter().count(), 2);
    assert_eq!(first.count_matching(&AnyCallMatcher), 2);
    assert_eq!(
        first.count_matching(&ArgumentValuesMatcher::new(vec![FakeValue::I32(1)])),
        0
    );
    Ok(())
}

#[test]
fn test_intercept_accepts_external_descriptors() -> Result<()> {
    let foo = create_catalog().fake("IFoo")?;
    let baz = Arc::clone(foo.definition().member("Baz").expect("Baz"));

    let call = foo.intercept(FakeCall::new(baz, Vec::new()))?;

    assert_eq!(call.result(), Some(&FakeValue::I32(0)));
    assert_eq!(foo.history().len(), 1);
    Ok(())
}

proptest! {
    #[test]
    fn prop_most_recent_applicable_rule_selected(
        rules in prop::collection::vec((0i32..3, any::<i32>()), 1..12),
        queried in 0i32..3,
    ) {
        let foo = create_catalog().fake("IFoo").unwrap();
        for (index, (argument, value)) in rules.iter().enumerate() {
            foo.add_rule(
                ConfiguredRule::new(format!("rule-{index}"))
                    .match_method_name("Bar")
                    .match_argument_values(vec![FakeValue::I32(*argument)])
                    .returns(FakeValue::string(&value.to_string())),
            )
            .unwrap();
        }

        let expected = rules
            .iter()
            .rev()
            .find(|(argument, _)| *argument == queried)
            .map_or_else(|| FakeValue::string(""), |(_, value)| FakeValue::string(&value.to_string()));
        prop_assert_eq!(foo.call("Bar", vec![FakeValue::I32(queried)]).unwrap(), expected);
    }

    #[test]
    fn prop_limited_rule_applied_at_most_n_times(limit in 0usize..6, calls in 0usize..12) {
        let foo = create_catalog().fake("IFoo").unwrap();
        foo.add_rule(ConfiguredRule::new("base").match_method_name("Baz").returns(1)).unwrap();
        foo.add_rule(
            ConfiguredRule::new("limited")
                .match_method_name("Baz")
                .returns(2)
                .number_of_times(limit),
        )
        .unwrap();

        let limited = (0..calls)
            .map(|_| foo.call("Baz", vec![]).unwrap())
            .filter(|value| *value == FakeValue::I32(2))
            .count();
        prop_assert_eq!(limited, limit.min(calls));
        prop_assert_eq!(foo.history().len(), calls);
    }
}
