//! Property behavior: fakes remember property values like auto-properties.
//!
//! - [`PropertyBehaviorRule`]: Backing store for a single property
//! - [`PropertySetterRule`]: Built-in rule that turns the first write of a property into
//!   an installed [`PropertyBehaviorRule`]

use std::sync::{Arc, RwLock};

use tracing::trace;

use crate::{
    model::{FakeCall, FakeValue, MethodSig, WritableCall},
    rules::types::FakeCallRule,
    Result,
};

/// Get/set backing store for a single property.
///
/// Applies to both accessors of the property it was created for: reads return the
/// stored value, writes replace it. The rule never runs out of calls.
///
/// # Examples
///
/// ```rust
/// use dotfake::{
///     model::{FakeValue, MethodSig, TypeSig},
///     rules::PropertyBehaviorRule,
/// };
///
/// let getter = MethodSig::property_getter("IFoo", "Count", TypeSig::I32);
/// let rule = PropertyBehaviorRule::new(getter, FakeValue::I32(3));
/// assert_eq!(rule.value().unwrap(), FakeValue::I32(3));
/// ```
pub struct PropertyBehaviorRule {
    property: MethodSig,
    value: RwLock<FakeValue>,
}

impl PropertyBehaviorRule {
    /// Creates a rule for the property `accessor` belongs to, holding `value`.
    ///
    /// # Arguments
    ///
    /// * `accessor` - Getter or setter of the property
    /// * `value` - Initial stored value
    #[must_use]
    pub fn new(accessor: MethodSig, value: FakeValue) -> Self {
        Self {
            property: accessor,
            value: RwLock::new(value),
        }
    }

    /// Returns the stored value.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::LockError`] if the store is poisoned.
    pub fn value(&self) -> Result<FakeValue> {
        Ok(read_lock!(self.value)?.clone())
    }

    /// Name of the property this rule backs.
    #[must_use]
    pub fn property_name(&self) -> Option<&str> {
        self.property.property_name()
    }
}

impl FakeCallRule for PropertyBehaviorRule {
    fn is_applicable_to(&self, call: &FakeCall) -> bool {
        call.method().is_same_property(&self.property)
    }

    fn apply(&self, call: &mut WritableCall<'_>) -> Result<()> {
        if call.method().is_property_getter() {
            let value = read_lock!(self.value)?.clone();
            call.set_return_value(value);
        } else if let Some(value) = call.argument(0).cloned() {
            *write_lock!(self.value)? = value;
            call.set_return_value(FakeValue::Void);
        }
        Ok(())
    }

    fn description(&self) -> String {
        format!(
            "property behavior {}.{}",
            self.property.declaring_type,
            self.property_name().unwrap_or("?")
        )
    }
}

/// Built-in rule that makes a written property readable.
///
/// On a property write it installs a [`PropertyBehaviorRule`] holding the written value
/// ahead of every other user rule, so later reads of that property return it.
#[derive(Debug, Default)]
pub struct PropertySetterRule;

impl FakeCallRule for PropertySetterRule {
    fn is_applicable_to(&self, call: &FakeCall) -> bool {
        call.method().is_property_setter()
    }

    fn apply(&self, call: &mut WritableCall<'_>) -> Result<()> {
        let value = call.argument(0).cloned().unwrap_or(FakeValue::Null);
        trace!(method = %call.method(), "installing property behavior from setter");

        let rule = PropertyBehaviorRule::new(MethodSig::clone(call.method()), value);
        call.install_first(Arc::new(rule), 1);
        call.set_return_value(FakeValue::Void);
        Ok(())
    }

    fn installs_rules(&self) -> bool {
        true
    }

    fn description(&self) -> String {
        "property setter".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TypeSig;

    fn setter_sig() -> MethodSig {
        MethodSig::property_setter("IFoo", "Count", TypeSig::I32)
    }

    fn call_to(method: MethodSig, args: Vec<FakeValue>) -> FakeCall {
        FakeCall::new(Arc::new(method), args)
    }

    #[test]
    fn test_applies_to_both_accessors() {
        let getter = MethodSig::property_getter("IFoo", "Count", TypeSig::I32);
        let setter = MethodSig::property_setter("IFoo", "Count", TypeSig::I32);
        let other = MethodSig::property_getter("IFoo", "Other", TypeSig::I32);
        let rule = PropertyBehaviorRule::new(getter.clone(), FakeValue::I32(0));

        assert!(rule.is_applicable_to(&call_to(getter, vec![])));
        assert!(rule.is_applicable_to(&call_to(setter, vec![FakeValue::I32(1)])));
        assert!(!rule.is_applicable_to(&call_to(other, vec![])));
        assert_eq!(rule.number_of_times_to_call(), None);
        assert_eq!(rule.property_name(), Some("Count"));
    }

    #[test]
    fn test_ignores_same_name_on_other_type() {
        let getter = MethodSig::property_getter("IFoo", "Count", TypeSig::I32);
        let foreign = MethodSig::property_getter("IBar", "Count", TypeSig::I32);
        let rule = PropertyBehaviorRule::new(getter, FakeValue::I32(0));
        assert!(!rule.is_applicable_to(&call_to(foreign, vec![])));
    }

    #[test]
    fn test_setter_rule_applicability() {
        let setter = MethodSig::property_setter("IFoo", "Count", TypeSig::I32);
        let getter = MethodSig::property_getter("IFoo", "Count", TypeSig::I32);
        assert!(PropertySetterRule.is_applicable_to(&call_to(setter, vec![FakeValue::I32(1)])));
        assert!(!PropertySetterRule.is_applicable_to(&call_to(getter, vec![])));
        assert!(PropertySetterRule.installs_rules());
        assert!(!PropertyBehaviorRule::new(setter_sig(), FakeValue::Null).installs_rules());
    }
}
