//! Event handlers attachable to a fake's events.

use std::{fmt, sync::Arc};

use crate::{
    events::raise::Raise,
    model::{EventArgs, FakeValue},
    Result,
};

/// Signature of a subscriber callback: `(sender, args)`.
pub type HandlerFn = dyn Fn(&FakeValue, &EventArgs) -> Result<()> + Send + Sync;

enum Target {
    Callback(Box<HandlerFn>),
    Raiser(Arc<Raise>),
}

struct HandlerInner {
    method_name: Arc<str>,
    target: Target,
}

/// A named callable that can be attached to an event.
///
/// Handlers compare by identity: clones of one handler are the same handler, two
/// handlers built from identical closures are not. Unsubscribing uses that identity.
///
/// # Examples
///
/// ```rust
/// use dotfake::{events::EventHandler, model::{EventArgs, FakeValue}};
///
/// let handler = EventHandler::new("on_something", |_sender, _args| Ok(()));
/// assert_eq!(handler.method_name(), "on_something");
/// assert!(handler.invoke(&FakeValue::Null, &EventArgs::empty()).is_ok());
/// assert!(handler.ptr_eq(&handler.clone()));
/// ```
#[derive(Clone)]
pub struct EventHandler {
    inner: Arc<HandlerInner>,
}

impl EventHandler {
    /// Creates a handler from a closure.
    ///
    /// # Arguments
    ///
    /// * `method_name` - Name reported by [`method_name`](Self::method_name)
    /// * `callback` - Invoked with `(sender, args)` when the event fires
    pub fn new<F>(method_name: impl Into<Arc<str>>, callback: F) -> Self
    where
        F: Fn(&FakeValue, &EventArgs) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(HandlerInner {
                method_name: method_name.into(),
                target: Target::Callback(Box::new(callback)),
            }),
        }
    }

    pub(crate) fn for_raiser(raiser: Arc<Raise>) -> Self {
        Self {
            inner: Arc::new(HandlerInner {
                method_name: Arc::from("now"),
                target: Target::Raiser(raiser),
            }),
        }
    }

    /// Name of the method this handler is bound to.
    #[must_use]
    pub fn method_name(&self) -> &str {
        &self.inner.method_name
    }

    /// Invokes the handler.
    ///
    /// # Errors
    ///
    /// Returns whatever the callback returns. A handler produced by [`Raise::go`] is not
    /// meant to be called; invoking it directly fails with [`crate::Error::NotSupported`].
    pub fn invoke(&self, sender: &FakeValue, args: &EventArgs) -> Result<()> {
        match &self.inner.target {
            Target::Callback(callback) => callback(sender, args),
            Target::Raiser(raiser) => raiser.now(Some(sender), Some(args)),
        }
    }

    /// The raiser this handler was produced by, if any.
    #[must_use]
    pub fn raiser(&self) -> Option<&Arc<Raise>> {
        match &self.inner.target {
            Target::Raiser(raiser) => Some(raiser),
            Target::Callback(_) => None,
        }
    }

    /// Returns `true` if both handles refer to the same handler.
    #[must_use]
    pub fn ptr_eq(&self, other: &EventHandler) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for EventHandler {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandler")
            .field("method_name", &self.method_name())
            .field("raiser", &self.raiser().is_some())
            .finish()
    }
}
