//! Record id generators.

use crate::model::RecordId;
use chrono::Utc;

/// Source of fresh record ids, injected into the store.
pub trait IdGenerator {
    /// Produce the next id.
    fn next_id(&mut self) -> RecordId;

    /// Report an id that already exists so it is never handed out again.
    fn observe(&mut self, _id: &RecordId) {}
}

impl<T: IdGenerator + ?Sized> IdGenerator for Box<T> {
    fn next_id(&mut self) -> RecordId {
        (**self).next_id()
    }

    fn observe(&mut self, id: &RecordId) {
        (**self).observe(id);
    }
}

/// Millisecond Unix timestamps rendered as decimal strings.
///
/// Ids are strictly increasing: two ids in the same millisecond, or after the
/// clock steps backwards, still differ.
#[derive(Debug, Clone, Default)]
pub struct TimestampIdGenerator {
    last: i64,
}

impl TimestampIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for TimestampIdGenerator {
    fn next_id(&mut self) -> RecordId {
        let now = Utc::now().timestamp_millis();
        self.last = now.max(self.last.saturating_add(1));
        RecordId::new(self.last.to_string())
    }

    fn observe(&mut self, id: &RecordId) {
        if let Ok(value) = id.as_str().parse::<i64>() {
            self.last = self.last.max(value);
        }
    }
}

/// Deterministic counter, mostly for tests and reproducible imports.
///
/// Only ids still present in the slot are observed on open, so after a
/// restart the id of a deleted trailing record is handed out again. Within
/// one store session deleted ids stay retired.
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    next: u64,
}

impl SequentialIdGenerator {
    /// Start counting at `start`.
    pub fn starting_at(start: u64) -> Self {
        Self { next: start }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> RecordId {
        let id = self.next;
        self.next = self.next.saturating_add(1);
        RecordId::new(id.to_string())
    }

    fn observe(&mut self, id: &RecordId) {
        if let Ok(value) = id.as_str().parse::<u64>() {
            self.next = self.next.max(value.saturating_add(1));
        }
    }
}
