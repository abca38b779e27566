//! Raise expressions: deferred event invocations packaged as attachable handlers.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use tracing::debug;

use crate::{
    events::handler::EventHandler,
    model::{EventArgs, FakeRef, FakeValue},
    Error, Result,
};

/// Read access to what a raise expression will deliver to subscribers.
pub trait EventRaiserArguments {
    /// Explicit sender, `None` when the fake raising the event is the sender.
    fn sender(&self) -> Option<&FakeValue>;

    /// Payload delivered to every subscriber.
    fn event_arguments(&self) -> &EventArgs;
}

/// A raise expression.
///
/// Holds a sender and an event payload. [`go`](Raise::go) produces a handler that, when
/// attached to an event of a fake, fires that event synchronously instead of
/// subscribing: every current subscriber receives `(sender, args)` in subscription
/// order. Without an explicit sender the fake itself is delivered, resolved when the
/// event fires.
///
/// Attaching the same handler again fires again; each attachment is one dispatch.
///
/// # Examples
///
/// ```rust
/// use dotfake::{events::{EventRaiserArguments, Raise}, model::{EventArgs, FakeValue}};
///
/// let raiser = Raise::with_sender(FakeValue::I32(7), EventArgs::empty());
/// assert_eq!(raiser.sender(), Some(&FakeValue::I32(7)));
///
/// let handler = raiser.go();
/// assert_eq!(handler.method_name(), "now");
/// assert_eq!(raiser.times_fired(), 0);
/// ```
#[derive(Debug)]
pub struct Raise {
    sender: Option<FakeValue>,
    event_arguments: EventArgs,
    fired: AtomicUsize,
}

impl Raise {
    /// Creates a raise expression.
    ///
    /// # Arguments
    ///
    /// * `sender` - Explicit sender, or `None` for the fake raising the event
    /// * `event_arguments` - Payload for the subscribers
    #[must_use]
    pub fn new(sender: Option<FakeValue>, event_arguments: EventArgs) -> Arc<Self> {
        Arc::new(Self {
            sender,
            event_arguments,
            fired: AtomicUsize::new(0),
        })
    }

    /// Raises with `event_arguments`; the fake is the sender.
    #[must_use]
    pub fn with(event_arguments: EventArgs) -> Arc<Self> {
        Self::new(None, event_arguments)
    }

    /// Raises with an explicit sender.
    #[must_use]
    pub fn with_sender(sender: impl Into<FakeValue>, event_arguments: EventArgs) -> Arc<Self> {
        Self::new(Some(sender.into()), event_arguments)
    }

    /// Raises with [`EventArgs::empty`]; the fake is the sender.
    #[must_use]
    pub fn with_empty() -> Arc<Self> {
        Self::with(EventArgs::empty())
    }

    /// Returns a handler bound to this raiser.
    ///
    /// Has no side effect; every returned handler fires the same way.
    #[must_use]
    pub fn go(self: &Arc<Self>) -> EventHandler {
        EventHandler::for_raiser(Arc::clone(self))
    }

    /// The firing method behind [`go`](Raise::go).
    ///
    /// It only runs when a fake's event dispatch recognizes the handler; calling it
    /// directly is misuse.
    ///
    /// # Errors
    ///
    /// Always returns [`Error::NotSupported`].
    pub fn now(&self, _sender: Option<&FakeValue>, _args: Option<&EventArgs>) -> Result<()> {
        Err(Error::NotSupported(
            "a raiser can only be fired by attaching its handler to an event".to_string(),
        ))
    }

    /// Number of times this raiser has been dispatched.
    #[must_use]
    pub fn times_fired(&self) -> usize {
        self.fired.load(Ordering::Acquire)
    }

    /// Delivers the payload to `subscribers` in order.
    ///
    /// The first subscriber failure stops the dispatch and is returned untouched.
    pub(crate) fn fire(
        &self,
        fake: &FakeRef,
        event: &str,
        subscribers: &[EventHandler],
    ) -> Result<()> {
        self.fired.fetch_add(1, Ordering::AcqRel);
        debug!(
            fake = fake.id(),
            event,
            subscribers = subscribers.len(),
            "raising event"
        );

        let sender = match &self.sender {
            Some(sender) => sender.clone(),
            None => FakeValue::Fake(Arc::clone(fake)),
        };
        for subscriber in subscribers {
            subscriber.invoke(&sender, &self.event_arguments)?;
        }
        Ok(())
    }
}

impl EventRaiserArguments for Raise {
    fn sender(&self) -> Option<&FakeValue> {
        self.sender.as_ref()
    }

    fn event_arguments(&self) -> &EventArgs {
        &self.event_arguments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_rejects_direct_calls() {
        let raiser = Raise::new(None, EventArgs::empty());
        assert!(matches!(raiser.now(None, None), Err(Error::NotSupported(_))));
        assert!(matches!(
            raiser.now(Some(&FakeValue::Null), Some(&EventArgs::empty())),
            Err(Error::NotSupported(_))
        ));
        assert_eq!(raiser.times_fired(), 0);
    }

    #[test]
    fn test_go_handler_is_guarded() {
        let raiser = Raise::with_empty();
        let handler = raiser.go();
        assert!(handler.raiser().is_some_and(|r| Arc::ptr_eq(r, &raiser)));
        assert!(matches!(
            handler.invoke(&FakeValue::Null, &EventArgs::empty()),
            Err(Error::NotSupported(_))
        ));
    }

    #[test]
    fn test_go_is_repeatable() {
        let raiser = Raise::with_empty();
        let first = raiser.go();
        let second = raiser.go();
        assert_eq!(first.method_name(), second.method_name());
        assert!(Arc::ptr_eq(first.raiser().unwrap(), second.raiser().unwrap()));
    }

    #[test]
    fn test_with_empty_arguments() {
        let raiser = Raise::with_empty();
        assert!(raiser.event_arguments().ptr_eq(&EventArgs::empty()));
        assert!(raiser.sender().is_none());
    }
}
