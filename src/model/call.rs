//! Call descriptors for intercepted invocations.
//!
//! - [`FakeCall`]: Snapshot of one intercepted invocation
//! - [`WritableCall`]: The view a rule receives while it handles a call

use std::{ops::Deref, sync::Arc};

use crate::{
    fake::ProxyFactory,
    model::{
        signature::{MethodSig, TypeSig},
        value::{FakeRef, FakeValue},
    },
    rules::{FakeCallRule, RuleEntry},
};

/// Snapshot of one intercepted invocation.
///
/// Method identity and arguments are fixed when the proxy layer creates the descriptor.
/// The only mutable slot is the result, which is written by whichever rule handles the
/// call through a [`WritableCall`].
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use dotfake::model::{FakeCall, FakeValue, MethodSig, TypeSig};
///
/// let method = Arc::new(MethodSig::new("IFoo", "Bar", vec![TypeSig::I32], TypeSig::String));
/// let call = FakeCall::new(method, vec![FakeValue::I32(1)]);
///
/// assert_eq!(&*call.method().name, "Bar");
/// assert_eq!(call.argument(0), Some(&FakeValue::I32(1)));
/// assert!(call.result().is_none());
/// ```
#[derive(Clone, Debug)]
pub struct FakeCall {
    method: Arc<MethodSig>,
    arguments: Arc<[FakeValue]>,
    result: Option<FakeValue>,
}

impl FakeCall {
    /// Creates a new call descriptor without a result.
    ///
    /// # Arguments
    ///
    /// * `method` - The intercepted member
    /// * `arguments` - Argument values in positional order
    #[must_use]
    pub fn new(method: Arc<MethodSig>, arguments: Vec<FakeValue>) -> Self {
        Self {
            method,
            arguments: Arc::from(arguments),
            result: None,
        }
    }

    /// The intercepted member.
    #[must_use]
    pub fn method(&self) -> &Arc<MethodSig> {
        &self.method
    }

    /// Argument values in positional order.
    #[must_use]
    pub fn arguments(&self) -> &[FakeValue] {
        &self.arguments
    }

    /// Argument at `index`, if present.
    #[must_use]
    pub fn argument(&self, index: usize) -> Option<&FakeValue> {
        self.arguments.get(index)
    }

    /// Declared return type of the intercepted member.
    #[must_use]
    pub fn return_type(&self) -> &TypeSig {
        &self.method.return_type
    }

    /// The result written by the handling rule, if any.
    #[must_use]
    pub fn result(&self) -> Option<&FakeValue> {
        self.result.as_ref()
    }

    /// Consumes the call and returns its result, or the default of its return type.
    #[must_use]
    pub fn into_result(self) -> FakeValue {
        match self.result {
            Some(value) => value,
            None => self.method.return_type.default_value(),
        }
    }

    pub(crate) fn set_result(&mut self, value: FakeValue) {
        self.result = Some(value);
    }
}

/// The view a rule receives while handling a call.
///
/// Besides read access to the call (via [`Deref`] to [`FakeCall`]) it lets the rule
/// write the return value, reach the fake that received the call and its proxy factory,
/// and stage new rules. Staged rules are inserted at the front of the fake's rule list
/// once the current dispatch has finished, so the list is never modified while it is
/// being searched.
pub struct WritableCall<'a> {
    call: &'a mut FakeCall,
    fake: &'a FakeRef,
    pending: &'a mut Vec<Arc<RuleEntry>>,
}

impl<'a> WritableCall<'a> {
    pub(crate) fn new(
        call: &'a mut FakeCall,
        fake: &'a FakeRef,
        pending: &'a mut Vec<Arc<RuleEntry>>,
    ) -> Self {
        Self {
            call,
            fake,
            pending,
        }
    }

    /// Sets the return value of the call.
    pub fn set_return_value(&mut self, value: impl Into<FakeValue>) {
        self.call.set_result(value.into());
    }

    /// The fake object that received the call.
    #[must_use]
    pub fn fake(&self) -> &FakeRef {
        self.fake
    }

    /// The proxy factory of the fake that received the call.
    #[must_use]
    pub fn factory(&self) -> &Arc<dyn ProxyFactory> {
        self.fake.factory()
    }

    /// Stages `rule` for insertion at the front of the fake's user rules.
    ///
    /// Only rules that return `true` from
    /// [`FakeCallRule::installs_rules`] may stage rules.
    ///
    /// # Arguments
    ///
    /// * `rule` - The rule to install
    /// * `called_number_of_times` - Initial call count of the new entry
    ///
    /// # Returns
    ///
    /// The staged entry, so the caller can apply it to the in-flight call.
    pub fn install_first(
        &mut self,
        rule: Arc<dyn FakeCallRule>,
        called_number_of_times: usize,
    ) -> Arc<RuleEntry> {
        let entry = Arc::new(RuleEntry::with_count(rule, called_number_of_times));
        self.pending.push(Arc::clone(&entry));
        entry
    }
}

impl Deref for WritableCall<'_> {
    type Target = FakeCall;

    fn deref(&self) -> &FakeCall {
        self.call
    }
}
