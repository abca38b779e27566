//! Data model shared by the dispatch engine.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`signature`] | Type signatures and member identity |
//! | [`value`] | Runtime values and event payloads |
//! | [`call`] | Call descriptors and their writable view |

mod call;
mod signature;
mod value;

pub use call::{FakeCall, WritableCall};
pub use signature::{
    MethodModifiers, MethodSig, PrimitiveKind, TypeSig, ADDER_PREFIX, GETTER_PREFIX,
    REMOVER_PREFIX, SETTER_PREFIX,
};
pub use value::{EventArgs, FakeRef, FakeValue};
