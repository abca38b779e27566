//! Auto-fake properties: fakes all the way down.
//!
//! When a property whose type can itself be faked is read before anything was
//! configured for it, [`AutoFakePropertyRule`] creates a nested fake, installs a
//! [`PropertyBehaviorRule`] holding it ahead of all user rules, and completes the read
//! through that new rule. Later reads hit the installed rule and observe the same
//! nested fake.

use std::sync::Arc;

use tracing::debug;

use crate::{
    fake::ProxyFactory,
    model::{FakeCall, MethodSig, WritableCall},
    rules::{property::PropertyBehaviorRule, types::FakeCallRule},
    Result,
};

/// Built-in rule that populates fakable properties with nested fakes on first read.
pub struct AutoFakePropertyRule {
    factory: Arc<dyn ProxyFactory>,
}

impl AutoFakePropertyRule {
    /// Creates the rule.
    ///
    /// # Arguments
    ///
    /// * `factory` - Decides fakability and creates the nested fakes
    #[must_use]
    pub fn new(factory: Arc<dyn ProxyFactory>) -> Self {
        Self { factory }
    }
}

impl FakeCallRule for AutoFakePropertyRule {
    fn is_applicable_to(&self, call: &FakeCall) -> bool {
        call.method().is_property_getter() && self.factory.is_fakable(call.return_type())
    }

    fn apply(&self, call: &mut WritableCall<'_>) -> Result<()> {
        let value = self.factory.create_fake(call.return_type())?;
        debug!(
            method = %call.method(),
            fake = call.fake().id(),
            "auto-faking property"
        );

        let rule = PropertyBehaviorRule::new(MethodSig::clone(call.method()), value);
        let entry = call.install_first(Arc::new(rule), 1);
        entry.rule().apply(call)
    }

    fn installs_rules(&self) -> bool {
        true
    }

    fn description(&self) -> String {
        "auto-fake property".to_string()
    }
}

impl std::fmt::Debug for AutoFakePropertyRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoFakePropertyRule").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::TypeSig,
        test::create_catalog,
    };

    #[test]
    fn test_applicable_only_to_fakable_getters() {
        let rule = AutoFakePropertyRule::new(Arc::new(create_catalog()));

        let fakable = MethodSig::property_getter("IFoo", "Nested", TypeSig::interface("IBar"));
        let primitive = MethodSig::property_getter("IFoo", "Count", TypeSig::I32);
        let unknown = MethodSig::property_getter("IFoo", "Other", TypeSig::interface("IUnknown"));
        let method = MethodSig::new("IFoo", "CreateBar", vec![], TypeSig::interface("IBar"));

        assert!(rule.is_applicable_to(&FakeCall::new(Arc::new(fakable), vec![])));
        assert!(!rule.is_applicable_to(&FakeCall::new(Arc::new(primitive), vec![])));
        assert!(!rule.is_applicable_to(&FakeCall::new(Arc::new(unknown), vec![])));
        assert!(!rule.is_applicable_to(&FakeCall::new(Arc::new(method), vec![])));
    }

    #[test]
    fn test_fakability_check_is_repeatable() {
        let rule = AutoFakePropertyRule::new(Arc::new(create_catalog()));
        let getter = MethodSig::property_getter("IFoo", "Nested", TypeSig::interface("IBar"));
        let call = FakeCall::new(Arc::new(getter), vec![]);

        assert!(rule.is_applicable_to(&call));
        assert!(rule.is_applicable_to(&call));
        assert_eq!(call.result(), None);
        assert_eq!(rule.number_of_times_to_call(), None);
        assert!(rule.installs_rules());
    }
}
