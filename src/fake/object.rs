//! The fake object: the target the proxy layer delivers intercepted calls to.

use std::{
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, RwLock,
    },
};

use tracing::trace;

use crate::{
    capture::{CallHistory, CallRecorder},
    events::EventHandler,
    fake::{
        config::FakeConfig,
        proxy::{InterfaceDef, ProxyFactory},
    },
    model::{FakeCall, FakeRef, FakeValue, MethodSig, TypeSig, WritableCall},
    rules::{FakeCallRule, RuleId, RuleSet},
    Error, Result,
};

static NEXT_FAKE_ID: AtomicU64 = AtomicU64::new(1);

/// A fake instance of an interface.
///
/// Owns the fake's [`RuleSet`] and [`CallRecorder`]. Fakes are always handled through
/// [`FakeRef`] (`Arc<FakeObject>`), since rules and event senders refer back to the
/// fake that received a call.
///
/// # Interception
///
/// [`intercept`](FakeObject::intercept) is the inbound contract with the proxy layer.
/// The helpers [`call`](FakeObject::call), [`get`](FakeObject::get),
/// [`set`](FakeObject::set), [`add_event_handler`](FakeObject::add_event_handler) and
/// [`remove_event_handler`](FakeObject::remove_event_handler) build the call descriptor
/// from the interface definition and validate the arguments first.
///
/// # Examples
///
/// ```rust
/// use dotfake::{
///     fake::{InterfaceCatalog, InterfaceDef},
///     model::{FakeValue, TypeSig},
///     rules::ConfiguredRule,
/// };
///
/// let catalog = InterfaceCatalog::new();
/// catalog.register(
///     InterfaceDef::new("IFoo")
///         .method("Bar", vec![TypeSig::I32], TypeSig::String)
///         .property("Name", TypeSig::String),
/// );
/// let foo = catalog.fake("IFoo")?;
///
/// foo.add_rule(ConfiguredRule::new("bar").match_method_name("Bar").returns("hello"))?;
/// assert_eq!(foo.call("Bar", vec![FakeValue::I32(1)])?, FakeValue::string("hello"));
///
/// foo.set("Name", FakeValue::string("x"))?;
/// assert_eq!(foo.get("Name")?, FakeValue::string("x"));
/// assert_eq!(foo.history().len(), 3);
/// # Ok::<(), dotfake::Error>(())
/// ```
pub struct FakeObject {
    id: u64,
    fake_type: TypeSig,
    definition: Arc<InterfaceDef>,
    factory: Arc<dyn ProxyFactory>,
    config: FakeConfig,
    rules: RwLock<RuleSet>,
    staging: Mutex<()>,
    recorder: CallRecorder,
}

impl FakeObject {
    /// Creates a fake of the interface `definition` describes.
    ///
    /// # Arguments
    ///
    /// * `definition` - Members of the faked interface
    /// * `factory` - Proxy factory nested fakes are created with
    /// * `config` - Selects built-in behaviors and call recording
    #[must_use]
    pub fn new(
        definition: Arc<InterfaceDef>,
        factory: Arc<dyn ProxyFactory>,
        config: FakeConfig,
    ) -> FakeRef {
        let rules = RuleSet::for_config(&config, &factory);
        Arc::new(Self {
            id: NEXT_FAKE_ID.fetch_add(1, Ordering::Relaxed),
            fake_type: TypeSig::interface(definition.name()),
            definition,
            factory,
            config,
            rules: RwLock::new(rules),
            staging: Mutex::new(()),
            recorder: CallRecorder::new(),
        })
    }

    /// Process-unique id of this fake.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The faked type.
    #[must_use]
    pub fn fake_type(&self) -> &TypeSig {
        &self.fake_type
    }

    /// Members of the faked interface.
    #[must_use]
    pub fn definition(&self) -> &Arc<InterfaceDef> {
        &self.definition
    }

    /// The proxy factory this fake creates nested fakes with.
    #[must_use]
    pub fn factory(&self) -> &Arc<dyn ProxyFactory> {
        &self.factory
    }

    /// The configuration this fake was created with.
    #[must_use]
    pub fn config(&self) -> &FakeConfig {
        &self.config
    }

    /// Handles an intercepted call.
    ///
    /// Exactly one rule handles the call. Rules the handling rule installs are put in
    /// front of all user rules before this returns. If the rule leaves the result
    /// unset, the default of the return type is filled in. The call takes its place in
    /// the history when it arrives and is recorded once the rule has finished, also
    /// when the rule failed.
    ///
    /// Dispatches whose rule installs rules (auto-fake properties, first property
    /// writes) are serialized per fake, so concurrent first reads of a property observe
    /// the same nested fake.
    ///
    /// # Errors
    ///
    /// Returns the handling rule's error unchanged; failures raised by user actions and
    /// event subscribers reach the caller as the same value they were created as.
    pub fn intercept(self: &Arc<Self>, mut call: FakeCall) -> Result<FakeCall> {
        let sequence = self.config.record_calls.then(|| self.recorder.reserve());

        let outcome = self.handle(&mut call);
        if outcome.is_ok() && call.result().is_none() {
            let default = call.return_type().default_value();
            call.set_result(default);
        }

        if let Some(sequence) = sequence {
            self.recorder.record_at(sequence, call.clone());
        }

        outcome?;
        Ok(call)
    }

    /// Calls method `method` with `arguments` and returns its result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MemberNotFound`] if the interface has no such method,
    /// [`Error::ArgumentCount`] or [`Error::ArgumentType`] if the arguments do not fit
    /// its signature, and otherwise whatever the handling rule fails with.
    pub fn call(self: &Arc<Self>, method: &str, arguments: Vec<FakeValue>) -> Result<FakeValue> {
        let sig = self.require(self.definition.member(method), method)?;
        self.dispatch(sig, arguments)
    }

    /// Reads property `property`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MemberNotFound`] if the property has no getter, otherwise
    /// whatever the handling rule fails with.
    pub fn get(self: &Arc<Self>, property: &str) -> Result<FakeValue> {
        let sig = self.require(self.definition.getter(property), property)?;
        self.dispatch(sig, Vec::new())
    }

    /// Writes property `property`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MemberNotFound`] if the property has no setter,
    /// [`Error::ArgumentType`] if `value` does not fit the property type, and otherwise
    /// whatever the handling rule fails with.
    pub fn set(self: &Arc<Self>, property: &str, value: impl Into<FakeValue>) -> Result<()> {
        let sig = self.require(self.definition.setter(property), property)?;
        self.dispatch(sig, vec![value.into()]).map(|_| ())
    }

    /// Attaches `handler` to event `event`.
    ///
    /// Attaching a handler produced by [`Raise::go`](crate::events::Raise::go) raises
    /// the event instead.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MemberNotFound`] if the interface has no such event, otherwise
    /// whatever the handling rule or a subscriber fails with.
    pub fn add_event_handler(self: &Arc<Self>, event: &str, handler: EventHandler) -> Result<()> {
        let sig = self.require(self.definition.adder(event), event)?;
        self.dispatch(sig, vec![FakeValue::Handler(handler)]).map(|_| ())
    }

    /// Detaches `handler` from event `event`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MemberNotFound`] if the interface has no such event, otherwise
    /// whatever the handling rule fails with.
    pub fn remove_event_handler(
        self: &Arc<Self>,
        event: &str,
        handler: EventHandler,
    ) -> Result<()> {
        let sig = self.require(self.definition.remover(event), event)?;
        self.dispatch(sig, vec![FakeValue::Handler(handler)]).map(|_| ())
    }

    /// Adds `rule` ahead of every existing user rule.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockError`] if the rule set is poisoned.
    pub fn add_rule<R: FakeCallRule + 'static>(&self, rule: R) -> Result<RuleId> {
        self.add_rule_first(Arc::new(rule))
    }

    /// Adds a shared rule ahead of every existing user rule.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockError`] if the rule set is poisoned.
    pub fn add_rule_first(&self, rule: Arc<dyn FakeCallRule>) -> Result<RuleId> {
        Ok(write_lock!(self.rules)?.add_first(rule))
    }

    /// Adds a shared rule behind every existing user rule.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockError`] if the rule set is poisoned.
    pub fn add_rule_last(&self, rule: Arc<dyn FakeCallRule>) -> Result<RuleId> {
        Ok(write_lock!(self.rules)?.add_last(rule))
    }

    /// Removes a user rule.
    ///
    /// # Returns
    ///
    /// `true` if the rule was installed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockError`] if the rule set is poisoned.
    pub fn remove_rule(&self, id: RuleId) -> Result<bool> {
        Ok(write_lock!(self.rules)?.remove(id))
    }

    /// Descriptions of all rules in evaluation order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockError`] if the rule set is poisoned.
    pub fn rules(&self) -> Result<Vec<String>> {
        Ok(read_lock!(self.rules)?
            .iter()
            .map(|entry| entry.rule().description())
            .collect())
    }

    /// Snapshot of the calls this fake received.
    #[must_use]
    pub fn history(&self) -> CallHistory {
        self.recorder.history()
    }

    fn handle(self: &Arc<Self>, call: &mut FakeCall) -> Result<()> {
        let mut entry = read_lock!(self.rules)?.resolve(call);

        // Rules that install rules run one at a time, against the rule set as left by
        // the previous one.
        let staging = if entry.rule().installs_rules() {
            let guard = lock!(self.staging)?;
            let current = read_lock!(self.rules)?.resolve(call);
            entry.release();
            entry = current;
            entry.rule().installs_rules().then_some(guard)
        } else {
            None
        };

        let mut pending = Vec::new();
        let outcome = {
            let mut writable = WritableCall::new(call, self, &mut pending);
            entry.rule().apply(&mut writable)
        };

        if !pending.is_empty() {
            let mut rules = write_lock!(self.rules)?;
            for staged in pending {
                rules.insert_entry_first(staged);
            }
        }

        drop(staging);
        outcome
    }

    fn require(&self, sig: Option<&Arc<MethodSig>>, name: &str) -> Result<Arc<MethodSig>> {
        sig.cloned().ok_or_else(|| Error::MemberNotFound {
            type_name: self.definition.name().to_string(),
            member: name.to_string(),
        })
    }

    fn dispatch(
        self: &Arc<Self>,
        sig: Arc<MethodSig>,
        arguments: Vec<FakeValue>,
    ) -> Result<FakeValue> {
        validate(&sig, &arguments)?;
        trace!(fake = self.id, method = %sig, "dispatching");
        Ok(self.intercept(FakeCall::new(sig, arguments))?.into_result())
    }
}

fn validate(sig: &MethodSig, arguments: &[FakeValue]) -> Result<()> {
    if sig.params.len() != arguments.len() {
        return Err(Error::ArgumentCount {
            method: format!("{}::{}", sig.declaring_type, sig.name),
            expected: sig.params.len(),
            actual: arguments.len(),
        });
    }

    for (index, (param, argument)) in sig.params.iter().zip(arguments).enumerate() {
        if !param.accepts(argument) {
            return Err(Error::ArgumentType {
                method: format!("{}::{}", sig.declaring_type, sig.name),
                index,
                expected: param.to_string(),
            });
        }
    }
    Ok(())
}

impl fmt::Debug for FakeObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeObject")
            .field("id", &self.id)
            .field("fake_type", &self.fake_type)
            .field("calls", &self.recorder.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{rules::ConfiguredRule, test::create_foo};

    #[test]
    fn test_unconfigured_calls_return_defaults() {
        let foo = create_foo();
        assert_eq!(foo.call("Baz", vec![]).unwrap(), FakeValue::I32(0));
        assert_eq!(
            foo.call("Bar", vec![FakeValue::I32(1)]).unwrap(),
            FakeValue::string("")
        );
        assert_eq!(
            foo.call("DoWork", vec![FakeValue::string("x")]).unwrap(),
            FakeValue::Void
        );
    }

    #[test]
    fn test_fakable_method_return_is_fresh_fake() {
        let foo = create_foo();
        let a = foo.call("CreateBar", vec![]).unwrap();
        let b = foo.call("CreateBar", vec![]).unwrap();
        assert!(a.as_fake().is_some());
        assert_ne!(a, b);
    }

    #[test]
    fn test_argument_validation() {
        let foo = create_foo();
        assert!(matches!(
            foo.call("Bar", vec![]),
            Err(Error::ArgumentCount { expected: 1, actual: 0, .. })
        ));
        assert!(matches!(
            foo.call("Bar", vec![FakeValue::string("x")]),
            Err(Error::ArgumentType { index: 0, .. })
        ));
        assert!(matches!(
            foo.call("Missing", vec![]),
            Err(Error::MemberNotFound { .. })
        ));
        assert!(matches!(foo.set("Count", 1), Err(Error::MemberNotFound { .. })));
        assert!(foo.history().is_empty());
    }

    #[test]
    fn test_missing_result_is_filled_with_default() {
        let foo = create_foo();
        foo.add_rule(ConfiguredRule::new("nothing").match_method_name("Baz").does_nothing())
            .unwrap();
        assert_eq!(foo.call("Baz", vec![]).unwrap(), FakeValue::I32(0));

        let recorded = foo.history();
        assert_eq!(recorded.get(0).and_then(|c| c.result()), Some(&FakeValue::I32(0)));
    }

    #[test]
    fn test_rule_descriptions_in_evaluation_order() {
        let foo = create_foo();
        let id = foo
            .add_rule(ConfiguredRule::new("baz").match_method_name("Baz"))
            .unwrap();
        let rules = foo.rules().unwrap();
        assert_eq!(rules.first().map(String::as_str), Some("baz [method=Baz]"));
        assert_eq!(rules.last().map(String::as_str), Some("default return value"));

        assert!(foo.remove_rule(id).unwrap());
        assert_eq!(foo.rules().unwrap().len(), rules.len() - 1);
    }

    #[test]
    fn test_record_calls_disabled() {
        let config = FakeConfig::default().with_record_calls(false);
        let catalog = crate::test::create_catalog_with(config);
        let foo = catalog.fake("IFoo").unwrap();
        foo.call("Baz", vec![]).unwrap();
        assert!(foo.history().is_empty());
    }

    #[test]
    fn test_property_writes_reuse_installed_rule() {
        let foo = create_foo();
        foo.set("Name", "a").unwrap();
        foo.set("Name", "b").unwrap();
        foo.get("Nested").unwrap();
        foo.get("Nested").unwrap();

        let rules = foo.rules().unwrap();
        let count = |name: &str| rules.iter().filter(|d| *d == name).count();
        assert_eq!(count("property behavior IFoo.Name"), 1);
        assert_eq!(count("property behavior IFoo.Nested"), 1);
        assert_eq!(foo.get("Name").unwrap(), FakeValue::string("b"));
    }

    #[test]
    fn test_ids_are_unique() {
        let a = create_foo();
        let b = create_foo();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.fake_type(), &TypeSig::interface("IFoo"));
    }
}
