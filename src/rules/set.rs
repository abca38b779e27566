//! Per-fake rule set and rule resolution.
//!
//! This module provides [`RuleSet`], which keeps a fake's rules in evaluation order and
//! selects the single rule that handles each intercepted call.

use std::{collections::VecDeque, sync::Arc};

use tracing::trace;

use crate::{
    fake::{FakeConfig, ProxyFactory},
    model::FakeCall,
    rules::{
        autofake::AutoFakePropertyRule,
        default::DefaultReturnValueRule,
        event::EventRule,
        property::PropertySetterRule,
        types::{FakeCallRule, RuleEntry, RuleId},
    },
};

/// Ordered collection of a fake's rules.
///
/// # Evaluation Order
///
/// ```text
/// ┌──────────────────────────────┐
/// │ user rules (newest first)    │  add_first / auto-fake installs push here
/// ├──────────────────────────────┤
/// │ built-in rules               │  event, property setter, auto-fake property
/// ├──────────────────────────────┤
/// │ default return value rule    │  always applicable, always last
/// └──────────────────────────────┘
/// ```
///
/// The first rule that is applicable to a call and still has call budget is selected.
/// Since the default rule applies to everything, resolution never comes up empty.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use dotfake::{
///     fake::InterfaceCatalog,
///     rules::{ConfiguredRule, DefaultReturnValueRule, RuleSet},
/// };
///
/// let factory = Arc::new(InterfaceCatalog::new());
/// let mut rules = RuleSet::new(Arc::new(DefaultReturnValueRule::new(factory)));
///
/// rules.add_first(Arc::new(ConfiguredRule::new("first").match_any()));
/// rules.add_first(Arc::new(ConfiguredRule::new("second").match_any()));
///
/// let names: Vec<String> = rules.iter().map(|e| e.rule().description()).collect();
/// assert_eq!(names[0], "second [any call]");
/// assert_eq!(names[1], "first [any call]");
/// ```
pub struct RuleSet {
    user: VecDeque<Arc<RuleEntry>>,
    built_in: Vec<Arc<RuleEntry>>,
    default: Arc<RuleEntry>,
}

impl RuleSet {
    /// Creates a rule set holding only the catch-all `default` rule.
    #[must_use]
    pub fn new(default: Arc<dyn FakeCallRule>) -> Self {
        Self {
            user: VecDeque::new(),
            built_in: Vec::new(),
            default: Arc::new(RuleEntry::new(default)),
        }
    }

    /// Creates the rule set a fake starts with under `config`.
    ///
    /// # Arguments
    ///
    /// * `config` - Selects the built-in rules
    /// * `factory` - Proxy factory the auto-fake and default rules create fakes with
    #[must_use]
    pub fn for_config(config: &FakeConfig, factory: &Arc<dyn ProxyFactory>) -> Self {
        let mut set = Self::new(Arc::new(DefaultReturnValueRule::new(Arc::clone(factory))));
        if config.event_behavior {
            set = set.with_built_in(Arc::new(EventRule::new()));
        }
        if config.property_behavior {
            set = set.with_built_in(Arc::new(PropertySetterRule));
        }
        if config.auto_fake_properties {
            set = set.with_built_in(Arc::new(AutoFakePropertyRule::new(Arc::clone(factory))));
        }
        set
    }

    /// Appends a built-in rule, evaluated after all user rules and before the default.
    #[must_use]
    pub fn with_built_in(mut self, rule: Arc<dyn FakeCallRule>) -> Self {
        self.built_in.push(Arc::new(RuleEntry::new(rule)));
        self
    }

    /// Adds a rule ahead of every existing user rule.
    pub fn add_first(&mut self, rule: Arc<dyn FakeCallRule>) -> RuleId {
        let entry = Arc::new(RuleEntry::new(rule));
        let id = entry.id();
        trace!(rule = %entry.rule().description(), "adding rule first");
        self.user.push_front(entry);
        id
    }

    /// Adds a rule behind every existing user rule, still ahead of the built-in rules.
    pub fn add_last(&mut self, rule: Arc<dyn FakeCallRule>) -> RuleId {
        let entry = Arc::new(RuleEntry::new(rule));
        let id = entry.id();
        trace!(rule = %entry.rule().description(), "adding rule last");
        self.user.push_back(entry);
        id
    }

    pub(crate) fn insert_entry_first(&mut self, entry: Arc<RuleEntry>) {
        trace!(rule = %entry.rule().description(), "installing rule");
        self.user.push_front(entry);
    }

    /// Removes a user rule.
    ///
    /// # Returns
    ///
    /// `true` if a rule with `id` was installed.
    pub fn remove(&mut self, id: RuleId) -> bool {
        let Some(position) = self.user.iter().position(|e| e.id() == id) else {
            return false;
        };
        if let Some(entry) = self.user.remove(position) {
            trace!(rule = %entry.rule().description(), "removed rule");
        }
        true
    }

    /// Selects the rule that handles `call` and attributes the call to it.
    ///
    /// Rules are scanned in evaluation order; the first applicable rule whose call
    /// budget is not used up wins. The default rule is returned when nothing else
    /// applies.
    #[must_use]
    pub fn resolve(&self, call: &FakeCall) -> Arc<RuleEntry> {
        for entry in self.user.iter().chain(self.built_in.iter()) {
            if !entry.rule().is_applicable_to(call) {
                continue;
            }
            if entry.try_claim() {
                trace!(
                    rule = %entry.rule().description(),
                    method = %call.method(),
                    "selected rule"
                );
                return Arc::clone(entry);
            }
            trace!(rule = %entry.rule().description(), "rule exhausted");
        }

        self.default.record_call();
        trace!(method = %call.method(), "selected default rule");
        Arc::clone(&self.default)
    }

    /// Iterates all entries in evaluation order, default rule last.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<RuleEntry>> {
        self.user
            .iter()
            .chain(self.built_in.iter())
            .chain(std::iter::once(&self.default))
    }

    /// Number of user rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.user.len()
    }

    /// Returns `true` if no user rule is installed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.user.is_empty()
    }
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleSet")
            .field("user_rules", &self.user.len())
            .field("built_in_rules", &self.built_in.len())
            .finish()
    }
}
