// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # dotfake
//!
//! A call-interception and rule-dispatch engine for test doubles. Callers request a
//! fake implementation of an interface, configure how it behaves, and afterwards
//! inspect how it was used.
//!
//! ## Features
//!
//! - **Ordered, overridable rules** - The most recently added applicable rule handles a call
//! - **Call budgets** - Rules limited to `n` calls fall through once used up
//! - **Fakes all the way down** - Fakable properties auto-populate with nested fakes
//! - **Property behavior** - Written properties read back like auto-properties
//! - **Event raising** - Raise expressions fire a fake's event when attached to it
//! - **Call recording** - Every intercepted call is logged in order for verification
//! - **Transparent failures** - Errors from user actions and subscribers reach the caller untouched
//!
//! ## Quick Start
//!
//! ```rust
//! use dotfake::prelude::*;
//!
//! let catalog = InterfaceCatalog::new();
//! catalog.register(
//!     InterfaceDef::new("IFoo")
//!         .method("Bar", vec![TypeSig::I32], TypeSig::String)
//!         .event("SomethingHappened"),
//! );
//!
//! let foo = catalog.fake("IFoo")?;
//! foo.add_rule(ConfiguredRule::new("bar").match_method_name("Bar").returns("hi"))?;
//! assert_eq!(foo.call("Bar", vec![FakeValue::I32(1)])?, FakeValue::string("hi"));
//!
//! foo.add_event_handler("SomethingHappened", EventHandler::new("log", |_sender, _args| Ok(())))?;
//! foo.add_event_handler("SomethingHappened", Raise::with_empty().go())?;
//!
//! assert_eq!(foo.history().len(), 3);
//! # Ok::<(), dotfake::Error>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! proxy layer ──► FakeObject::intercept(call)
//!                        │
//!                        ▼
//!                 RuleSet::resolve ──► rule.apply(WritableCall)
//!                        │                   │
//!                        │                   └─► staged rules committed to the front
//!                        ▼
//!                 CallRecorder::record
//! ```
//!
//! - [`model`] - Type signatures, runtime values and call descriptors
//! - [`rules`] - The rule trait, built-in rules, configured rules and the rule set
//! - [`events`] - Event handlers and raise expressions
//! - [`capture`] - Call recording and history snapshots
//! - [`fake`] - Fake objects, configuration and the proxy factory
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (rule selection, installation, event raising) and
//! installs no subscriber; the host decides what to collect.

#[macro_use]
pub(crate) mod macros;

pub(crate) mod error;

#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types.
pub mod prelude;

/// Type signatures, runtime values and call descriptors.
pub mod model;

/// Behavior rules and rule dispatch.
pub mod rules;

/// Event handlers and raise expressions.
pub mod events;

/// Call recording for verification.
pub mod capture;

/// Fake objects and the proxy factory behind them.
pub mod fake;

/// `dotfake` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
/// This is used consistently throughout the crate for all fallible operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `dotfake` Error type
///
/// The main error type for all operations in this crate.
///
/// # Examples
///
/// ```rust
/// use dotfake::{events::Raise, Error};
///
/// match Raise::with_empty().now(None, None) {
///     Err(Error::NotSupported(message)) => println!("rejected: {message}"),
///     Err(e) => println!("Error: {e}"),
///     Ok(()) => unreachable!(),
/// }
/// ```
pub use error::{Error, UserError};
