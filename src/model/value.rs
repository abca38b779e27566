//! Runtime values flowing through intercepted calls.

use std::{
    any::Any,
    fmt,
    sync::{Arc, OnceLock},
};

use crate::{events::EventHandler, fake::FakeObject, model::signature::PrimitiveKind};

/// Shared reference to a fake object.
pub type FakeRef = Arc<FakeObject>;

/// Value passed into or returned from an intercepted call.
///
/// Reference-like variants ([`FakeValue::Fake`], [`FakeValue::Object`],
/// [`FakeValue::EventArgs`], [`FakeValue::Handler`]) compare by identity, the way
/// object references do; the remaining variants compare by value.
///
/// | Declared type | Variant |
/// |---------------|---------|
/// | `void` | [`FakeValue::Void`] |
/// | primitives | [`FakeValue::Bool`], [`FakeValue::Char`], [`FakeValue::I32`], [`FakeValue::I64`], [`FakeValue::F64`] |
/// | `string` | [`FakeValue::String`] |
/// | interface | [`FakeValue::Fake`] |
/// | `object` | any variant, typically [`FakeValue::Object`] |
/// | `EventArgs` | [`FakeValue::EventArgs`] |
/// | `EventHandler` | [`FakeValue::Handler`] |
/// | any reference type | [`FakeValue::Null`] |
#[derive(Clone)]
pub enum FakeValue {
    /// No value (void return).
    Void,
    /// Null reference.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Unicode character.
    Char(char),
    /// 32-bit signed integer.
    I32(i32),
    /// 64-bit signed integer.
    I64(i64),
    /// 64-bit floating point.
    F64(f64),
    /// Immutable string.
    String(Arc<str>),
    /// A fake object, typically produced by a [`ProxyFactory`](crate::fake::ProxyFactory).
    Fake(FakeRef),
    /// An opaque object supplied by user code, compared by identity.
    Object(Arc<dyn Any + Send + Sync>),
    /// An event argument payload.
    EventArgs(EventArgs),
    /// An event handler delegate.
    Handler(EventHandler),
}

impl FakeValue {
    /// Creates a string value.
    #[must_use]
    pub fn string(value: &str) -> Self {
        FakeValue::String(Arc::from(value))
    }

    /// Wraps an arbitrary value as an opaque object reference.
    #[must_use]
    pub fn object<T: Any + Send + Sync>(value: T) -> Self {
        FakeValue::Object(Arc::new(value))
    }

    /// Returns the primitive kind of this value, if it is a primitive.
    #[must_use]
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            FakeValue::Bool(_) => Some(PrimitiveKind::Bool),
            FakeValue::Char(_) => Some(PrimitiveKind::Char),
            FakeValue::I32(_) => Some(PrimitiveKind::I32),
            FakeValue::I64(_) => Some(PrimitiveKind::I64),
            FakeValue::F64(_) => Some(PrimitiveKind::F64),
            _ => None,
        }
    }

    /// Returns the fake object if this value is one.
    #[must_use]
    pub fn as_fake(&self) -> Option<&FakeRef> {
        match self {
            FakeValue::Fake(fake) => Some(fake),
            _ => None,
        }
    }

    /// Returns the string slice if this value is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FakeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer if this value is an `I32`.
    #[must_use]
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            FakeValue::I32(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the handler if this value is one.
    #[must_use]
    pub fn as_handler(&self) -> Option<&EventHandler> {
        match self {
            FakeValue::Handler(handler) => Some(handler),
            _ => None,
        }
    }

    /// Returns the event arguments if this value carries them.
    #[must_use]
    pub fn as_event_args(&self) -> Option<&EventArgs> {
        match self {
            FakeValue::EventArgs(args) => Some(args),
            _ => None,
        }
    }

    /// Downcasts an opaque object reference.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            FakeValue::Object(obj) => obj.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Returns `true` if this value refers to `fake`.
    #[must_use]
    pub fn is_fake(&self, fake: &FakeRef) -> bool {
        self.as_fake().is_some_and(|f| Arc::ptr_eq(f, fake))
    }

    /// Returns `true` for [`FakeValue::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, FakeValue::Null)
    }
}

impl PartialEq for FakeValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FakeValue::Void, FakeValue::Void) | (FakeValue::Null, FakeValue::Null) => true,
            (FakeValue::Bool(a), FakeValue::Bool(b)) => a == b,
            (FakeValue::Char(a), FakeValue::Char(b)) => a == b,
            (FakeValue::I32(a), FakeValue::I32(b)) => a == b,
            (FakeValue::I64(a), FakeValue::I64(b)) => a == b,
            (FakeValue::F64(a), FakeValue::F64(b)) => a == b,
            (FakeValue::String(a), FakeValue::String(b)) => a == b,
            (FakeValue::Fake(a), FakeValue::Fake(b)) => Arc::ptr_eq(a, b),
            (FakeValue::Object(a), FakeValue::Object(b)) => Arc::ptr_eq(a, b),
            (FakeValue::EventArgs(a), FakeValue::EventArgs(b)) => a.ptr_eq(b),
            (FakeValue::Handler(a), FakeValue::Handler(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for FakeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FakeValue::Void => write!(f, "Void"),
            FakeValue::Null => write!(f, "Null"),
            FakeValue::Bool(v) => write!(f, "Bool({v})"),
            FakeValue::Char(v) => write!(f, "Char({v:?})"),
            FakeValue::I32(v) => write!(f, "I32({v})"),
            FakeValue::I64(v) => write!(f, "I64({v})"),
            FakeValue::F64(v) => write!(f, "F64({v})"),
            FakeValue::String(v) => write!(f, "String({v:?})"),
            FakeValue::Fake(fake) => write!(f, "Fake({} #{})", fake.fake_type(), fake.id()),
            FakeValue::Object(obj) => write!(f, "Object({:p})", Arc::as_ptr(obj)),
            FakeValue::EventArgs(args) => write!(f, "{args:?}"),
            FakeValue::Handler(handler) => write!(f, "{handler:?}"),
        }
    }
}

impl From<bool> for FakeValue {
    fn from(value: bool) -> Self {
        FakeValue::Bool(value)
    }
}

impl From<i32> for FakeValue {
    fn from(value: i32) -> Self {
        FakeValue::I32(value)
    }
}

impl From<i64> for FakeValue {
    fn from(value: i64) -> Self {
        FakeValue::I64(value)
    }
}

impl From<f64> for FakeValue {
    fn from(value: f64) -> Self {
        FakeValue::F64(value)
    }
}

impl From<&str> for FakeValue {
    fn from(value: &str) -> Self {
        FakeValue::string(value)
    }
}

impl From<FakeRef> for FakeValue {
    fn from(value: FakeRef) -> Self {
        FakeValue::Fake(value)
    }
}

impl From<EventArgs> for FakeValue {
    fn from(value: EventArgs) -> Self {
        FakeValue::EventArgs(value)
    }
}

impl From<EventHandler> for FakeValue {
    fn from(value: EventHandler) -> Self {
        FakeValue::Handler(value)
    }
}

/// Payload delivered to event subscribers.
///
/// Event arguments are reference values: clones share the payload and compare equal,
/// while two separately created instances never do. [`EventArgs::empty`] returns the
/// same shared instance every time.
///
/// # Examples
///
/// ```rust
/// use dotfake::model::EventArgs;
///
/// let args = EventArgs::new(42_u32);
/// assert_eq!(args.clone(), args);
/// assert_ne!(EventArgs::new(42_u32), args);
/// assert_eq!(EventArgs::empty(), EventArgs::empty());
/// assert_eq!(args.downcast_ref::<u32>(), Some(&42));
/// ```
#[derive(Clone)]
pub struct EventArgs {
    payload: Arc<dyn Any + Send + Sync>,
}

struct Empty;

static EMPTY: OnceLock<EventArgs> = OnceLock::new();

impl EventArgs {
    /// Creates event arguments carrying `payload`.
    #[must_use]
    pub fn new<T: Any + Send + Sync>(payload: T) -> Self {
        Self {
            payload: Arc::new(payload),
        }
    }

    /// Returns the shared empty instance.
    #[must_use]
    pub fn empty() -> Self {
        EMPTY
            .get_or_init(|| EventArgs::new(Empty))
            .clone()
    }

    /// Returns `true` if these are the shared empty arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payload.is::<Empty>()
    }

    /// Downcasts the payload.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    /// Returns `true` if both refer to the same payload.
    #[must_use]
    pub fn ptr_eq(&self, other: &EventArgs) -> bool {
        Arc::ptr_eq(&self.payload, &other.payload)
    }
}

impl Default for EventArgs {
    fn default() -> Self {
        EventArgs::empty()
    }
}

impl PartialEq for EventArgs {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for EventArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "EventArgs(empty)")
        } else {
            write!(f, "EventArgs({:p})", Arc::as_ptr(&self.payload))
        }
    }
}
