//! User-configured rule definition and builder.
//!
//! This module provides [`ConfiguredRule`], which combines matchers and actions to
//! define how a fake responds to the calls it intercepts.

use std::sync::Arc;

use crate::{
    model::{FakeCall, FakeValue, TypeSig, WritableCall},
    rules::{
        matcher::{
            AccessorKind, AccessorMatcher, AnyCallMatcher, ArgumentMatcher,
            ArgumentValuesMatcher, CallMatcher, NameMatcher, SignatureMatcher,
        },
        types::FakeCallRule,
    },
    Error, Result,
};

/// Side effect run when a configured rule handles a call.
pub type ActionFn = Arc<dyn Fn(&FakeCall) -> Result<()> + Send + Sync>;

/// Computes a return value from the call.
pub type ReturnFn = Arc<dyn Fn(&FakeCall) -> FakeValue + Send + Sync>;

/// Builds the error a configured rule fails with.
pub type ThrowFn = Arc<dyn Fn(&FakeCall) -> Error + Send + Sync>;

#[derive(Clone, Default)]
enum Outcome {
    #[default]
    Nothing,
    Returns(FakeValue),
    ReturnsLazily(ReturnFn),
    Throws(ThrowFn),
}

/// A configurable behavior rule.
///
/// Configured rules combine matchers (which calls they apply to) with actions (what
/// happens when they apply). Use the builder methods to configure both.
///
/// # Building Rules
///
/// ```rust
/// use dotfake::{model::FakeValue, rules::ConfiguredRule};
///
/// let rule = ConfiguredRule::new("bar-returns-hello")
///     .match_name("IFoo", "Bar")
///     .match_argument_values(vec![FakeValue::I32(1)])
///     .returns("hello")
///     .once();
/// ```
///
/// # Matcher Evaluation
///
/// All matchers on a rule must match for the rule to apply (AND semantics).
/// A rule with no matchers never matches; use [`match_any`](Self::match_any) to
/// configure a catch-all.
///
/// # Actions
///
/// When the rule handles a call, every [`invokes`](Self::invokes) action runs first, in
/// registration order. Then the outcome is produced:
///
/// | Outcome | Effect |
/// |---------|--------|
/// | [`returns`](Self::returns) | Fixed return value |
/// | [`returns_lazily`](Self::returns_lazily) | Return value computed from the call |
/// | [`throws`](Self::throws) | The call fails with the built error |
/// | [`does_nothing`](Self::does_nothing) | No return value; the fake supplies the default |
///
/// If an action fails, the outcome is skipped and the failure reaches the caller as-is.
#[derive(Clone)]
pub struct ConfiguredRule {
    name: String,
    matchers: Vec<Arc<dyn CallMatcher>>,
    actions: Vec<ActionFn>,
    outcome: Outcome,
    times: Option<usize>,
}

impl ConfiguredRule {
    /// Creates a new rule with the given name.
    ///
    /// The name is used for debugging and logging.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            matchers: Vec::new(),
            actions: Vec::new(),
            outcome: Outcome::Nothing,
            times: None,
        }
    }

    /// Returns the rule's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a custom matcher.
    #[must_use]
    pub fn add_matcher<M: CallMatcher + 'static>(mut self, matcher: M) -> Self {
        self.matchers.push(Arc::new(matcher));
        self
    }

    /// Matches every call.
    #[must_use]
    pub fn match_any(self) -> Self {
        self.add_matcher(AnyCallMatcher)
    }

    /// Matches a method by declaring type and method name.
    #[must_use]
    pub fn match_name(self, type_name: impl Into<String>, method_name: impl Into<String>) -> Self {
        self.add_matcher(NameMatcher::full(type_name, method_name))
    }

    /// Matches any method with the given name.
    #[must_use]
    pub fn match_method_name(self, method_name: impl Into<String>) -> Self {
        self.add_matcher(NameMatcher::new().method_name(method_name))
    }

    /// Matches reads of the named property.
    #[must_use]
    pub fn match_property_getter(self, property: impl Into<String>) -> Self {
        self.add_matcher(AccessorMatcher::new(AccessorKind::Getter).member(property))
    }

    /// Matches writes of the named property.
    #[must_use]
    pub fn match_property_setter(self, property: impl Into<String>) -> Self {
        self.add_matcher(AccessorMatcher::new(AccessorKind::Setter).member(property))
    }

    /// Matches methods by parameter types and, optionally, return type.
    #[must_use]
    pub fn match_signature(self, params: Vec<TypeSig>, return_type: Option<TypeSig>) -> Self {
        let mut matcher = SignatureMatcher::new().params(params);
        if let Some(ret) = return_type {
            matcher = matcher.returns(ret);
        }
        self.add_matcher(matcher)
    }

    /// Matches calls whose arguments satisfy `predicate`.
    ///
    /// # Arguments
    ///
    /// * `description` - Human-readable description for debugging
    /// * `predicate` - Function that returns `true` if the rule should match
    #[must_use]
    pub fn match_arguments<F>(self, description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&[FakeValue]) -> bool + Send + Sync + 'static,
    {
        self.add_matcher(ArgumentMatcher::new(description, predicate))
    }

    /// Matches calls whose arguments equal `values`.
    #[must_use]
    pub fn match_argument_values(self, values: Vec<FakeValue>) -> Self {
        self.add_matcher(ArgumentValuesMatcher::new(values))
    }

    /// Adds a side effect run whenever the rule handles a call.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::sync::{atomic::{AtomicUsize, Ordering}, Arc};
    /// use dotfake::rules::ConfiguredRule;
    ///
    /// let seen = Arc::new(AtomicUsize::new(0));
    /// let counter = Arc::clone(&seen);
    /// let rule = ConfiguredRule::new("count-work")
    ///     .match_method_name("DoWork")
    ///     .invokes(move |_call| {
    ///         counter.fetch_add(1, Ordering::SeqCst);
    ///         Ok(())
    ///     });
    /// ```
    #[must_use]
    pub fn invokes<F>(mut self, action: F) -> Self
    where
        F: Fn(&FakeCall) -> Result<()> + Send + Sync + 'static,
    {
        self.actions.push(Arc::new(action));
        self
    }

    /// Returns a fixed value.
    #[must_use]
    pub fn returns(mut self, value: impl Into<FakeValue>) -> Self {
        self.outcome = Outcome::Returns(value.into());
        self
    }

    /// Returns a value computed from the call.
    #[must_use]
    pub fn returns_lazily<F>(mut self, producer: F) -> Self
    where
        F: Fn(&FakeCall) -> FakeValue + Send + Sync + 'static,
    {
        self.outcome = Outcome::ReturnsLazily(Arc::new(producer));
        self
    }

    /// Fails the call with the error built by `error`.
    #[must_use]
    pub fn throws<F>(mut self, error: F) -> Self
    where
        F: Fn(&FakeCall) -> Error + Send + Sync + 'static,
    {
        self.outcome = Outcome::Throws(Arc::new(error));
        self
    }

    /// Produces no return value; the fake fills in the default for the return type.
    #[must_use]
    pub fn does_nothing(mut self) -> Self {
        self.outcome = Outcome::Nothing;
        self
    }

    /// Limits the rule to `times` calls. Later matching calls fall through to the next
    /// applicable rule.
    #[must_use]
    pub fn number_of_times(mut self, times: usize) -> Self {
        self.times = Some(times);
        self
    }

    /// Limits the rule to a single call.
    #[must_use]
    pub fn once(self) -> Self {
        self.number_of_times(1)
    }

    /// Limits the rule to two calls.
    #[must_use]
    pub fn twice(self) -> Self {
        self.number_of_times(2)
    }

    /// Checks if all matchers match the given call.
    ///
    /// Returns `false` if the rule has no matchers.
    #[must_use]
    pub fn matches(&self, call: &FakeCall) -> bool {
        if self.matchers.is_empty() {
            return false;
        }
        self.matchers.iter().all(|m| m.matches(call))
    }
}

impl FakeCallRule for ConfiguredRule {
    fn is_applicable_to(&self, call: &FakeCall) -> bool {
        self.matches(call)
    }

    fn apply(&self, call: &mut WritableCall<'_>) -> Result<()> {
        for action in &self.actions {
            action(&**call)?;
        }

        match &self.outcome {
            Outcome::Nothing => Ok(()),
            Outcome::Returns(value) => {
                call.set_return_value(value.clone());
                Ok(())
            }
            Outcome::ReturnsLazily(producer) => {
                let value = producer(&**call);
                call.set_return_value(value);
                Ok(())
            }
            Outcome::Throws(error) => Err(error(&**call)),
        }
    }

    fn number_of_times_to_call(&self) -> Option<usize> {
        self.times
    }

    fn description(&self) -> String {
        let matchers: Vec<String> = self.matchers.iter().map(|m| m.description()).collect();
        format!("{} [{}]", self.name, matchers.join("; "))
    }
}

impl std::fmt::Debug for ConfiguredRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfiguredRule")
            .field("name", &self.name)
            .field("matcher_count", &self.matchers.len())
            .field("action_count", &self.actions.len())
            .field("times", &self.times)
            .finish()
    }
}
