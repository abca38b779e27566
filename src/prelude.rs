//! # dotfake Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the dotfake library. Import this module to get quick access to everything needed
//! to create, configure and inspect fakes.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all dotfake operations
pub use crate::Error;

/// The result type used throughout dotfake
pub use crate::Result;

// ================================================================================================
// Fakes
// ================================================================================================

/// Fake objects, their configuration and the interface catalog creating them
pub use crate::fake::{FakeConfig, FakeObject, InterfaceCatalog, InterfaceDef, ProxyFactory};

// ================================================================================================
// Data Model
// ================================================================================================

/// Values, signatures and call descriptors
pub use crate::model::{
    EventArgs, FakeCall, FakeRef, FakeValue, MethodSig, TypeSig, WritableCall,
};

// ================================================================================================
// Rules
// ================================================================================================

/// Rule trait, configured rules and matchers
pub use crate::rules::{CallMatcher, ConfiguredRule, FakeCallRule, NameMatcher, RuleId};

// ================================================================================================
// Events and Verification
// ================================================================================================

/// Event handlers and raise expressions
pub use crate::events::{EventHandler, EventRaiserArguments, Raise};

/// Recorded call history
pub use crate::capture::{CallHistory, RecordedCall};
