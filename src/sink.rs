//! Destinations for lowered input records.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::RawInput;

/// Something that accepts input records and merges them into an input
/// stream. On Windows this is `SendInput`.
pub trait InputSink {
    /// Submit the records in order and return how many of them were accepted
    fn send(&mut self, inputs: &[RawInput]) -> u32;
}

impl<S: InputSink + ?Sized> InputSink for Box<S> {
    fn send(&mut self, inputs: &[RawInput]) -> u32 {
        (**self).send(inputs)
    }
}

/// A sink that keeps every record it accepts in memory instead of injecting
/// it. Clones share the same log, so a test can keep one handle while the
/// injector owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    inputs: Arc<Mutex<Vec<RawInput>>>,
    rejecting: Arc<AtomicBool>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// While rejecting, submissions are dropped and reported as zero
    /// accepted records
    pub fn set_rejecting(&self, rejecting: bool) {
        self.rejecting.store(rejecting, Ordering::SeqCst);
    }

    /// Copy of everything recorded so far
    #[must_use]
    pub fn inputs(&self) -> Vec<RawInput> {
        self.inputs.lock().clone()
    }

    /// Remove and return everything recorded so far
    pub fn take(&self) -> Vec<RawInput> {
        std::mem::take(&mut *self.inputs.lock())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inputs.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl InputSink for RecordingSink {
    fn send(&mut self, inputs: &[RawInput]) -> u32 {
        if self.rejecting.load(Ordering::SeqCst) {
            return 0;
        }
        self.inputs.lock().extend_from_slice(inputs);
        u32::try_from(inputs.len()).unwrap_or(u32::MAX)
    }
}
