//! Behavior rules and rule dispatch.
//!
//! Every call a fake intercepts is handled by exactly one rule. Rules live in a
//! per-fake [`RuleSet`]; the set scans them in evaluation order and picks the first
//! one that is applicable and still has call budget left.
//!
//! # Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | `types` | The [`FakeCallRule`] trait, [`RuleId`] and [`RuleEntry`] |
//! | `matcher` | [`CallMatcher`] trait and implementations |
//! | `configured` | The [`ConfiguredRule`] builder for user configuration |
//! | `property` | [`PropertyBehaviorRule`] and the built-in [`PropertySetterRule`] |
//! | `autofake` | The built-in [`AutoFakePropertyRule`] |
//! | `event` | The built-in [`EventRule`] |
//! | `default` | The catch-all [`DefaultReturnValueRule`] |
//! | `set` | [`RuleSet`] resolution |
//!
//! # Dispatch Flow
//!
//! ```text
//! FakeObject::intercept(call)
//!         │
//!         ▼
//! ┌───────────────────┐
//! │ RuleSet::resolve  │  first applicable, non-exhausted entry; claims one call
//! └───────────────────┘
//!         │
//!         ▼
//! ┌───────────────────┐
//! │ rule.apply        │  no lock held; new rules are staged
//! └───────────────────┘
//!         │
//!         ▼
//! ┌───────────────────┐
//! │ commit staged     │  pushed to the front of the user rules
//! └───────────────────┘
//!         │
//!         ▼
//!   record the call
//! ```
//!
//! # Call Budgets
//!
//! A rule reporting `Some(n)` from
//! [`number_of_times_to_call`](FakeCallRule::number_of_times_to_call) handles at most
//! `n` calls. The `n + 1`-th matching call falls through to the next applicable rule,
//! and the exhausted rule is never selected again.

mod autofake;
mod configured;
mod default;
mod event;
mod matcher;
mod property;
mod set;
mod types;

pub use autofake::AutoFakePropertyRule;
pub use configured::{ActionFn, ConfiguredRule, ReturnFn, ThrowFn};
pub use default::DefaultReturnValueRule;
pub use event::EventRule;
pub use matcher::{
    AccessorKind, AccessorMatcher, AnyCallMatcher, ArgumentMatcher, ArgumentPredicate,
    ArgumentValuesMatcher, CallMatcher, NameMatcher, SignatureMatcher,
};
pub use property::{PropertyBehaviorRule, PropertySetterRule};
pub use set::RuleSet;
pub use types::{FakeCallRule, RuleEntry, RuleId};
