//! Matcher trait and implementations for configured rules.
//!
//! This module defines the [`CallMatcher`] trait and several implementations for
//! determining whether a configured rule applies to a given call. The verification side
//! reuses the same matchers to count recorded calls.
//!
//! # Available Matchers
//!
//! | Matcher | Description |
//! |---------|-------------|
//! | [`NameMatcher`] | Match by declaring type and/or method name |
//! | [`AccessorMatcher`] | Match property and event accessors |
//! | [`SignatureMatcher`] | Match by parameter and return types |
//! | [`ArgumentMatcher`] | Match by inspecting argument values |
//! | [`ArgumentValuesMatcher`] | Match exact argument values |
//! | [`AnyCallMatcher`] | Match every call |
//!
//! # Combining Matchers
//!
//! Multiple matchers can be added to a single rule. All matchers must match for
//! the rule to apply (AND semantics).
//!
//! ```rust
//! use dotfake::{model::FakeValue, rules::ConfiguredRule};
//!
//! // Requires both: method named "Bar", and first argument greater than 10
//! let rule = ConfiguredRule::new("large-bar")
//!     .match_method_name("Bar")
//!     .match_arguments("first > 10", |args| {
//!         matches!(args.first(), Some(FakeValue::I32(v)) if *v > 10)
//!     })
//!     .returns("large");
//! ```

use std::sync::Arc;

use crate::model::{FakeCall, FakeValue, TypeSig};

/// Type alias for argument predicates.
pub type ArgumentPredicate = dyn Fn(&[FakeValue]) -> bool + Send + Sync;

/// Trait for implementing call matchers.
///
/// Each matcher implements a single matching criterion.
///
/// # Thread Safety
///
/// Matchers must be `Send + Sync` so rules can be shared with the fake that owns them.
pub trait CallMatcher: Send + Sync {
    /// Checks if this matcher matches the given call.
    fn matches(&self, call: &FakeCall) -> bool;

    /// Returns a description of this matcher for debugging.
    ///
    /// This should be a concise description of what the matcher checks for,
    /// such as "type=IFoo, method=Bar".
    fn description(&self) -> String;
}

/// Matches calls by declaring type and/or method name.
///
/// Each component is optional. Unset components match anything.
///
/// # Examples
///
/// ```rust
/// use dotfake::rules::NameMatcher;
///
/// // Match all methods named "Bar" on any type
/// let matcher = NameMatcher::new().method_name("Bar");
///
/// // Match IFoo.Bar specifically
/// let matcher = NameMatcher::full("IFoo", "Bar");
/// ```
#[derive(Clone, Debug, Default)]
pub struct NameMatcher {
    type_name: Option<String>,
    method_name: Option<String>,
}

impl NameMatcher {
    /// Creates a new name matcher with all components optional.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the declaring type name to match.
    #[must_use]
    pub fn type_name(mut self, name: impl Into<String>) -> Self {
        self.type_name = Some(name.into());
        self
    }

    /// Sets the method name to match.
    #[must_use]
    pub fn method_name(mut self, name: impl Into<String>) -> Self {
        self.method_name = Some(name.into());
        self
    }

    /// Creates a matcher from both components.
    #[must_use]
    pub fn full(type_name: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            method_name: Some(method_name.into()),
        }
    }
}

impl CallMatcher for NameMatcher {
    fn matches(&self, call: &FakeCall) -> bool {
        let method = call.method();

        let type_matches = self
            .type_name
            .as_ref()
            .is_none_or(|t| t.as_str() == &*method.declaring_type);

        let method_matches = self
            .method_name
            .as_ref()
            .is_none_or(|m| m.as_str() == &*method.name);

        type_matches && method_matches
    }

    fn description(&self) -> String {
        let mut parts = Vec::new();
        if let Some(t) = &self.type_name {
            parts.push(format!("type={t}"));
        }
        if let Some(m) = &self.method_name {
            parts.push(format!("method={m}"));
        }
        if parts.is_empty() {
            "any".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Kind of accessor an [`AccessorMatcher`] looks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum AccessorKind {
    /// Property getter
    #[strum(to_string = "getter")]
    Getter,
    /// Property setter
    #[strum(to_string = "setter")]
    Setter,
    /// Event subscription
    #[strum(to_string = "event-add")]
    EventAdd,
    /// Event unsubscription
    #[strum(to_string = "event-remove")]
    EventRemove,
}

/// Matches property and event accessors, optionally restricted to one member.
///
/// # Examples
///
/// ```rust
/// use dotfake::rules::{AccessorKind, AccessorMatcher};
///
/// let any_getter = AccessorMatcher::new(AccessorKind::Getter);
/// let name_setter = AccessorMatcher::new(AccessorKind::Setter).member("Name");
/// ```
#[derive(Clone, Debug)]
pub struct AccessorMatcher {
    kind: AccessorKind,
    member: Option<String>,
}

impl AccessorMatcher {
    /// Creates a matcher for any accessor of the given kind.
    #[must_use]
    pub fn new(kind: AccessorKind) -> Self {
        Self { kind, member: None }
    }

    /// Restricts the matcher to the property or event named `name`.
    #[must_use]
    pub fn member(mut self, name: impl Into<String>) -> Self {
        self.member = Some(name.into());
        self
    }
}

impl CallMatcher for AccessorMatcher {
    fn matches(&self, call: &FakeCall) -> bool {
        let method = call.method();
        let member = match self.kind {
            AccessorKind::Getter if method.is_property_getter() => method.property_name(),
            AccessorKind::Setter if method.is_property_setter() => method.property_name(),
            AccessorKind::EventAdd if method.is_event_adder() => method.event_name(),
            AccessorKind::EventRemove if method.is_event_remover() => method.event_name(),
            _ => return false,
        };

        self.member
            .as_ref()
            .is_none_or(|expected| member == Some(expected.as_str()))
    }

    fn description(&self) -> String {
        match &self.member {
            Some(member) => format!("{}={member}", self.kind),
            None => self.kind.to_string(),
        }
    }
}

/// Matches calls by their parameter and return types.
///
/// # Examples
///
/// ```rust
/// use dotfake::{model::TypeSig, rules::SignatureMatcher};
///
/// // Match methods that take (i32, i32) and return i32
/// let matcher = SignatureMatcher::new()
///     .params(vec![TypeSig::I32, TypeSig::I32])
///     .returns(TypeSig::I32);
/// ```
#[derive(Clone, Debug, Default)]
pub struct SignatureMatcher {
    param_types: Option<Vec<TypeSig>>,
    return_type: Option<TypeSig>,
}

impl SignatureMatcher {
    /// Creates a new signature matcher without type constraints.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the expected parameter types. All must match exactly, in order.
    #[must_use]
    pub fn params(mut self, types: Vec<TypeSig>) -> Self {
        self.param_types = Some(types);
        self
    }

    /// Sets the expected return type.
    #[must_use]
    pub fn returns(mut self, return_type: TypeSig) -> Self {
        self.return_type = Some(return_type);
        self
    }
}

impl CallMatcher for SignatureMatcher {
    fn matches(&self, call: &FakeCall) -> bool {
        let method = call.method();

        if let Some(expected) = &self.param_types {
            if expected != &method.params {
                return false;
            }
        }

        self.return_type
            .as_ref()
            .is_none_or(|ret| ret == &method.return_type)
    }

    fn description(&self) -> String {
        let mut parts = Vec::new();
        if let Some(params) = &self.param_types {
            let params: Vec<String> = params.iter().map(ToString::to_string).collect();
            parts.push(format!("params=({})", params.join(", ")));
        }
        if let Some(ret) = &self.return_type {
            parts.push(format!("returns={ret}"));
        }
        if parts.is_empty() {
            "any signature".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Matches calls by inspecting argument values with a predicate.
pub struct ArgumentMatcher {
    predicate: Arc<ArgumentPredicate>,
    description: String,
}

impl ArgumentMatcher {
    /// Creates a new argument matcher.
    ///
    /// # Arguments
    ///
    /// * `description` - Human-readable description of what this matches
    /// * `predicate` - Function that inspects the arguments and returns `true` if matched
    pub fn new<F>(description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&[FakeValue]) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
            description: description.into(),
        }
    }
}

impl CallMatcher for ArgumentMatcher {
    fn matches(&self, call: &FakeCall) -> bool {
        (self.predicate)(call.arguments())
    }

    fn description(&self) -> String {
        self.description.clone()
    }
}

/// Matches calls whose arguments equal the expected values.
///
/// Reference values compare by identity, see [`FakeValue`].
#[derive(Clone, Debug)]
pub struct ArgumentValuesMatcher {
    expected: Vec<FakeValue>,
}

impl ArgumentValuesMatcher {
    /// Creates a matcher for exactly these argument values.
    #[must_use]
    pub fn new(expected: Vec<FakeValue>) -> Self {
        Self { expected }
    }
}

impl CallMatcher for ArgumentValuesMatcher {
    fn matches(&self, call: &FakeCall) -> bool {
        call.arguments() == self.expected.as_slice()
    }

    fn description(&self) -> String {
        format!("args={:?}", self.expected)
    }
}

/// Matches every call.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnyCallMatcher;

impl CallMatcher for AnyCallMatcher {
    fn matches(&self, _call: &FakeCall) -> bool {
        true
    }

    fn description(&self) -> String {
        "any call".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MethodSig;

    fn bar_call(arg: i32) -> FakeCall {
        let method = MethodSig::new("IFoo", "Bar", vec![TypeSig::I32], TypeSig::String);
        FakeCall::new(Arc::new(method), vec![FakeValue::I32(arg)])
    }

    fn getter_call(property: &str) -> FakeCall {
        let method = MethodSig::property_getter("IFoo", property, TypeSig::I32);
        FakeCall::new(Arc::new(method), vec![])
    }

    #[test]
    fn test_name_matcher() {
        let call = bar_call(1);
        assert!(NameMatcher::full("IFoo", "Bar").matches(&call));
        assert!(NameMatcher::new().method_name("Bar").matches(&call));
        assert!(!NameMatcher::new().type_name("IBar").matches(&call));
        assert_eq!(NameMatcher::full("IFoo", "Bar").description(), "type=IFoo, method=Bar");
        assert_eq!(NameMatcher::new().description(), "any");
    }

    #[test]
    fn test_accessor_matcher() {
        let call = getter_call("Count");
        assert!(AccessorMatcher::new(AccessorKind::Getter).matches(&call));
        assert!(AccessorMatcher::new(AccessorKind::Getter)
            .member("Count")
            .matches(&call));
        assert!(!AccessorMatcher::new(AccessorKind::Getter)
            .member("Other")
            .matches(&call));
        assert!(!AccessorMatcher::new(AccessorKind::Setter).matches(&call));
        assert!(!AccessorMatcher::new(AccessorKind::Getter).matches(&bar_call(1)));
        assert_eq!(
            AccessorMatcher::new(AccessorKind::Setter).member("Name").description(),
            "setter=Name"
        );
    }

    #[test]
    fn test_signature_matcher() {
        let call = bar_call(1);
        assert!(SignatureMatcher::new()
            .params(vec![TypeSig::I32])
            .returns(TypeSig::String)
            .matches(&call));
        assert!(!SignatureMatcher::new().returns(TypeSig::I32).matches(&call));
        assert!(!SignatureMatcher::new().params(vec![]).matches(&call));

        let desc = SignatureMatcher::new()
            .params(vec![TypeSig::I32, TypeSig::I32])
            .returns(TypeSig::I32)
            .description();
        assert_eq!(desc, "params=(I32, I32), returns=I32");
    }

    #[test]
    fn test_argument_matchers() {
        let large = ArgumentMatcher::new("large", |args| {
            matches!(args.first(), Some(FakeValue::I32(v)) if *v > 10)
        });
        assert!(large.matches(&bar_call(11)));
        assert!(!large.matches(&bar_call(3)));
        assert_eq!(large.description(), "large");

        let exact = ArgumentValuesMatcher::new(vec![FakeValue::I32(3)]);
        assert!(exact.matches(&bar_call(3)));
        assert!(!exact.matches(&bar_call(4)));
        assert!(AnyCallMatcher.matches(&bar_call(4)));
    }
}
