//! Append-only call recording.
//!
//! [`CallRecorder`] is the log a fake appends every intercepted call to. Recording is
//! lock-free; [`CallRecorder::history`] takes an immutable [`CallHistory`] snapshot for
//! the verification layer.

use std::{
    ops::Deref,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use crate::{
    model::{FakeCall, FakeValue, MethodSig},
    rules::CallMatcher,
};

/// Append-only, ordered log of intercepted calls.
///
/// There is no removal operation. A call takes its sequence number when it is
/// intercepted ([`reserve`](Self::reserve)) and is stored once its rule has finished
/// ([`record_at`](Self::record_at)), so history is ordered by interception even when a
/// call re-enters the fake before it completes. Calls still in flight are not part of a
/// snapshot.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use dotfake::{
///     capture::CallRecorder,
///     model::{FakeCall, MethodSig, TypeSig},
/// };
///
/// let recorder = CallRecorder::new();
/// let method = Arc::new(MethodSig::new("IFoo", "Baz", vec![], TypeSig::I32));
/// recorder.record(FakeCall::new(Arc::clone(&method), vec![]));
/// recorder.record(FakeCall::new(method, vec![]));
///
/// let history = recorder.history();
/// assert_eq!(history.len(), 2);
/// assert_eq!(history, recorder.history());
/// ```
#[derive(Default)]
pub struct CallRecorder {
    next_sequence: AtomicUsize,
    calls: boxcar::Vec<RecordedCall>,
}

impl CallRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the next sequence number for a call that is about to be handled.
    pub fn reserve(&self) -> usize {
        self.next_sequence.fetch_add(1, Ordering::Relaxed)
    }

    /// Stores a finished call under a sequence number taken with
    /// [`reserve`](Self::reserve).
    pub fn record_at(&self, sequence: usize, call: FakeCall) {
        self.calls.push(RecordedCall { sequence, call });
    }

    /// Appends a call.
    ///
    /// # Returns
    ///
    /// The sequence number assigned to the call.
    pub fn record(&self, call: FakeCall) -> usize {
        let sequence = self.reserve();
        self.record_at(sequence, call);
        sequence
    }

    /// Number of recorded calls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.count()
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Takes a snapshot of the calls recorded so far, in interception order.
    #[must_use]
    pub fn history(&self) -> CallHistory {
        let mut calls: Vec<RecordedCall> =
            self.calls.iter().map(|(_, call)| call.clone()).collect();
        calls.sort_by_key(RecordedCall::sequence);
        CallHistory {
            calls: Arc::from(calls),
        }
    }
}

impl std::fmt::Debug for CallRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallRecorder").field("calls", &self.len()).finish()
    }
}

/// One entry of a [`CallHistory`].
///
/// Derefs to the recorded [`FakeCall`], including the result the handling rule produced.
#[derive(Clone, Debug)]
pub struct RecordedCall {
    sequence: usize,
    call: FakeCall,
}

impl RecordedCall {
    /// Position of the call in the fake's call order, starting at 0.
    #[must_use]
    pub fn sequence(&self) -> usize {
        self.sequence
    }

    /// The recorded call.
    #[must_use]
    pub fn call(&self) -> &FakeCall {
        &self.call
    }
}

impl Deref for RecordedCall {
    type Target = FakeCall;

    fn deref(&self) -> &FakeCall {
        &self.call
    }
}

impl PartialEq for RecordedCall {
    fn eq(&self, other: &Self) -> bool {
        self.sequence == other.sequence
            && self.call.method() == other.call.method()
            && self.call.arguments() == other.call.arguments()
            && self.call.result() == other.call.result()
    }
}

/// Immutable snapshot of a fake's recorded calls.
///
/// Cheap to clone; iteration can be restarted any number of times.
#[derive(Clone, Debug, PartialEq)]
pub struct CallHistory {
    calls: Arc<[RecordedCall]>,
}

impl CallHistory {
    /// Number of calls in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    /// Returns `true` if the snapshot holds no calls.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Iterates calls in call order.
    pub fn iter(&self) -> std::slice::Iter<'_, RecordedCall> {
        self.calls.iter()
    }

    /// Call at position `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&RecordedCall> {
        self.calls.get(index)
    }

    /// Last recorded call.
    #[must_use]
    pub fn last(&self) -> Option<&RecordedCall> {
        self.calls.last()
    }

    /// Number of calls `matcher` matches.
    #[must_use]
    pub fn count_matching(&self, matcher: &dyn CallMatcher) -> usize {
        self.iter().filter(|c| matcher.matches(c)).count()
    }

    /// Calls made to methods named `method_name`.
    pub fn calls_to<'a>(
        &'a self,
        method_name: &'a str,
    ) -> impl Iterator<Item = &'a RecordedCall> + 'a {
        self.iter()
            .filter(move |c| &*c.method().name == method_name)
    }

    /// Returns `true` if any call was made to `method` with exactly `arguments`.
    #[must_use]
    pub fn was_called_with(&self, method: &MethodSig, arguments: &[FakeValue]) -> bool {
        self.iter()
            .any(|c| **c.method() == *method && c.arguments() == arguments)
    }
}

impl<'a> IntoIterator for &'a CallHistory {
    type Item = &'a RecordedCall;
    type IntoIter = std::slice::Iter<'a, RecordedCall>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::TypeSig, rules::NameMatcher};

    fn method(name: &str) -> Arc<MethodSig> {
        Arc::new(MethodSig::new("IFoo", name, vec![TypeSig::I32], TypeSig::Void))
    }

    #[test]
    fn test_history_keeps_call_order() {
        let recorder = CallRecorder::new();
        let bar = method("Bar");
        let baz = method("Baz");
        for i in 0..5 {
            let target = if i % 2 == 0 { &bar } else { &baz };
            let seq = recorder.record(FakeCall::new(Arc::clone(target), vec![FakeValue::I32(i)]));
            assert_eq!(seq, i as usize);
        }

        let history = recorder.history();
        assert_eq!(history.len(), 5);
        for (i, call) in history.iter().enumerate() {
            assert_eq!(call.sequence(), i);
            assert_eq!(call.argument(0), Some(&FakeValue::I32(i as i32)));
        }
        assert_eq!(history.calls_to("Bar").count(), 3);
        assert_eq!(history.count_matching(&NameMatcher::new().method_name("Baz")), 2);
    }

    #[test]
    fn test_history_is_restartable() {
        let recorder = CallRecorder::new();
        recorder.record(FakeCall::new(method("Bar"), vec![FakeValue::I32(1)]));

        let history = recorder.history();
        let first: Vec<_> = history.iter().map(RecordedCall::sequence).collect();
        let second: Vec<_> = (&history).into_iter().map(RecordedCall::sequence).collect();
        assert_eq!(first, second);
        assert_eq!(history, recorder.history());
    }

    #[test]
    fn test_history_follows_reservation_order() {
        let recorder = CallRecorder::new();
        let outer = recorder.reserve();
        let inner = recorder.reserve();
        recorder.record_at(inner, FakeCall::new(method("Baz"), vec![FakeValue::I32(2)]));
        recorder.record_at(outer, FakeCall::new(method("Bar"), vec![FakeValue::I32(1)]));

        let history = recorder.history();
        let names: Vec<&str> = history.iter().map(|c| &*c.method().name).collect();
        assert_eq!(names, vec!["Bar", "Baz"]);
        assert_eq!(history.get(0).map(RecordedCall::sequence), Some(0));
        assert_eq!(recorder.record(FakeCall::new(method("Bar"), vec![])), 2);
    }

    #[test]
    fn test_snapshot_is_immutable() {
        let recorder = CallRecorder::new();
        let bar = method("Bar");
        recorder.record(FakeCall::new(Arc::clone(&bar), vec![FakeValue::I32(1)]));
        let before = recorder.history();
        recorder.record(FakeCall::new(bar, vec![FakeValue::I32(2)]));

        assert_eq!(before.len(), 1);
        assert_eq!(recorder.history().len(), 2);
        assert_ne!(before, recorder.history());
    }

    #[test]
    fn test_was_called_with() {
        let recorder = CallRecorder::new();
        let bar = method("Bar");
        recorder.record(FakeCall::new(Arc::clone(&bar), vec![FakeValue::I32(1)]));

        let history = recorder.history();
        assert!(history.was_called_with(&bar, &[FakeValue::I32(1)]));
        assert!(!history.was_called_with(&bar, &[FakeValue::I32(2)]));
        assert!(recorder.history().last().is_some());
    }
}
