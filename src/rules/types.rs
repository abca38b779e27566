//! Core types for the rule system.
//!
//! - [`FakeCallRule`]: The capability set every behavior rule implements
//! - [`RuleId`]: Handle identifying an installed rule
//! - [`RuleEntry`]: An installed rule together with its call count

use std::sync::{
    atomic::{AtomicU64, AtomicUsize, Ordering},
    Arc,
};

use crate::{
    model::{FakeCall, WritableCall},
    Result,
};

/// A unit of behavior that may handle an intercepted call.
///
/// Rules are consulted in evaluation order; the first rule that is applicable and has
/// not used up its call budget handles the call. Exactly one rule handles each call.
///
/// # Implementing Custom Rules
///
/// ```rust
/// use dotfake::{
///     model::{FakeCall, FakeValue, WritableCall},
///     rules::FakeCallRule,
///     Result,
/// };
///
/// struct AnswerRule;
///
/// impl FakeCallRule for AnswerRule {
///     fn is_applicable_to(&self, call: &FakeCall) -> bool {
///         &*call.method().name == "Answer"
///     }
///
///     fn apply(&self, call: &mut WritableCall<'_>) -> Result<()> {
///         call.set_return_value(FakeValue::I32(42));
///         Ok(())
///     }
///
///     fn description(&self) -> String {
///         "answer".to_string()
///     }
/// }
/// ```
///
/// # Thread Safety
///
/// Rules must be `Send + Sync`; a fake may be shared between threads and rules are
/// applied without the rule-set lock held. A rule that stages new rules through
/// [`WritableCall::install_first`] must return `true` from
/// [`installs_rules`](FakeCallRule::installs_rules): the fake then serializes those
/// dispatches and resolves the call again once it has exclusive access, so two threads
/// never install rules for the same call. Such a rule must not call back into the fake
/// that received the call.
pub trait FakeCallRule: Send + Sync {
    /// Checks if this rule can handle `call`.
    fn is_applicable_to(&self, call: &FakeCall) -> bool;

    /// Handles the call: writes the return value, runs configured actions, or raises
    /// effects.
    ///
    /// # Errors
    ///
    /// Failures raised by user code are returned unchanged.
    fn apply(&self, call: &mut WritableCall<'_>) -> Result<()>;

    /// Maximum number of calls this rule handles, `None` for unlimited.
    fn number_of_times_to_call(&self) -> Option<usize> {
        None
    }

    /// Returns `true` if [`apply`](FakeCallRule::apply) may stage new rules.
    fn installs_rules(&self) -> bool {
        false
    }

    /// Returns a description of this rule for debugging.
    fn description(&self) -> String;
}

static NEXT_RULE_ID: AtomicU64 = AtomicU64::new(1);

/// Handle identifying an installed rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleId(u64);

impl RuleId {
    fn next() -> Self {
        RuleId(NEXT_RULE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw value of this id.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// An installed rule together with the number of calls it has handled.
///
/// Once a rule with a finite [`number_of_times_to_call`](FakeCallRule::number_of_times_to_call)
/// has handled that many calls, its entry can no longer be claimed. Exhausted entries
/// stay in the rule set but are never selected again.
pub struct RuleEntry {
    id: RuleId,
    rule: Arc<dyn FakeCallRule>,
    called_number_of_times: AtomicUsize,
}

impl RuleEntry {
    /// Creates a new entry that has not handled any call yet.
    #[must_use]
    pub fn new(rule: Arc<dyn FakeCallRule>) -> Self {
        Self::with_count(rule, 0)
    }

    /// Creates a new entry with a preset call count.
    ///
    /// # Arguments
    ///
    /// * `rule` - The rule to install
    /// * `called_number_of_times` - Number of calls already attributed to the rule
    #[must_use]
    pub fn with_count(rule: Arc<dyn FakeCallRule>, called_number_of_times: usize) -> Self {
        Self {
            id: RuleId::next(),
            rule,
            called_number_of_times: AtomicUsize::new(called_number_of_times),
        }
    }

    /// The id of this entry.
    #[must_use]
    pub fn id(&self) -> RuleId {
        self.id
    }

    /// The installed rule.
    #[must_use]
    pub fn rule(&self) -> &Arc<dyn FakeCallRule> {
        &self.rule
    }

    /// Number of calls attributed to this rule so far.
    #[must_use]
    pub fn called_number_of_times(&self) -> usize {
        self.called_number_of_times.load(Ordering::Acquire)
    }

    /// Claims one call on this entry.
    ///
    /// The check against the limit and the increment happen atomically, so two
    /// concurrent calls can never both take the last slot.
    ///
    /// # Returns
    ///
    /// `false` if the entry is exhausted.
    pub(crate) fn try_claim(&self) -> bool {
        let limit = self.rule.number_of_times_to_call();
        self.called_number_of_times
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |called| match limit {
                Some(limit) if called >= limit => None,
                _ => Some(called.saturating_add(1)),
            })
            .is_ok()
    }

    /// Gives back a claim that was taken for a call this entry did not handle.
    pub(crate) fn release(&self) {
        let _ = self
            .called_number_of_times
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |called| {
                called.checked_sub(1)
            });
    }

    /// Attributes one call to this entry regardless of its limit.
    pub(crate) fn record_call(&self) {
        self.called_number_of_times.fetch_add(1, Ordering::AcqRel);
    }
}

impl std::fmt::Debug for RuleEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEntry")
            .field("id", &self.id)
            .field("rule", &self.rule.description())
            .field("limit", &self.rule.number_of_times_to_call())
            .field("called", &self.called_number_of_times())
            .finish()
    }
}
