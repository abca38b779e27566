//! Event subscription bookkeeping for fakes.

use std::{collections::HashMap, sync::Mutex};

use tracing::trace;

use crate::{
    events::EventHandler,
    model::{FakeCall, FakeValue, WritableCall},
    rules::types::FakeCallRule,
    Result,
};

/// Built-in rule handling event adders and removers.
///
/// Keeps one subscriber list per event. Adding a handler produced by
/// [`Raise::go`](crate::events::Raise::go) does not subscribe it: it fires the event
/// with the raiser's sender and payload instead. Subscribers are invoked on a snapshot
/// of the list, so they may themselves subscribe, unsubscribe, or call into the fake.
///
/// Null handlers are ignored, as is removing a handler that was never added.
#[derive(Debug, Default)]
pub struct EventRule {
    subscribers: Mutex<HashMap<String, Vec<EventHandler>>>,
}

impl EventRule {
    /// Creates the rule with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handlers currently subscribed to `event`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::LockError`] if the subscriber table is poisoned.
    pub fn subscriber_count(&self, event: &str) -> Result<usize> {
        Ok(lock!(self.subscribers)?.get(event).map_or(0, Vec::len))
    }

    fn subscribe(&self, event: &str, handler: EventHandler) -> Result<()> {
        lock!(self.subscribers)?
            .entry(event.to_string())
            .or_default()
            .push(handler);
        Ok(())
    }

    fn unsubscribe(&self, event: &str, handler: &EventHandler) -> Result<()> {
        let mut subscribers = lock!(self.subscribers)?;
        if let Some(list) = subscribers.get_mut(event) {
            if let Some(position) = list.iter().rposition(|h| h.ptr_eq(handler)) {
                list.remove(position);
            }
        }
        Ok(())
    }

    fn snapshot(&self, event: &str) -> Result<Vec<EventHandler>> {
        Ok(lock!(self.subscribers)?
            .get(event)
            .cloned()
            .unwrap_or_default())
    }
}

impl FakeCallRule for EventRule {
    fn is_applicable_to(&self, call: &FakeCall) -> bool {
        let method = call.method();
        method.is_event_adder() || method.is_event_remover()
    }

    fn apply(&self, call: &mut WritableCall<'_>) -> Result<()> {
        call.set_return_value(FakeValue::Void);

        let Some(event) = call.method().event_name().map(str::to_string) else {
            return Ok(());
        };
        let Some(handler) = call.argument(0).and_then(FakeValue::as_handler).cloned() else {
            return Ok(());
        };

        if call.method().is_event_remover() {
            trace!(%event, handler = handler.method_name(), "unsubscribing");
            return self.unsubscribe(&event, &handler);
        }

        match handler.raiser() {
            Some(raiser) => {
                let subscribers = self.snapshot(&event)?;
                raiser.fire(call.fake(), &event, &subscribers)
            }
            None => {
                trace!(%event, handler = handler.method_name(), "subscribing");
                self.subscribe(&event, handler)
            }
        }
    }

    fn description(&self) -> String {
        "event subscription".to_string()
    }
}
