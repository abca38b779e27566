//! Call capture for verification.
//!
//! Every fake owns a [`CallRecorder`]. Assertion code reads the recorded calls through
//! [`CallHistory`] snapshots and never writes to the log.

mod recorder;

pub use recorder::{CallHistory, CallRecorder, RecordedCall};
