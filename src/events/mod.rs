//! Event subscription and raise expressions.
//!
//! Events on a fake are plain adder/remover accessors. The built-in
//! [`EventRule`](crate::rules::EventRule) keeps the subscriber list per event; this module
//! provides what gets attached:
//!
//! | Item | Description |
//! |------|-------------|
//! | [`EventHandler`] | Named callable with identity, attached to an event |
//! | [`Raise`] | Raise expression whose [`go`](Raise::go) handler fires the event when attached |
//! | [`EventRaiserArguments`] | Sender and payload carried by a raise expression |
//!
//! # Raising an Event
//!
//! ```rust,ignore
//! fake.add_event_handler("SomethingHappened", Raise::with(args).go())?;
//! ```

mod handler;
mod raise;

pub use handler::{EventHandler, HandlerFn};
pub use raise::{EventRaiserArguments, Raise};
