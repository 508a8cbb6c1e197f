use healthlog_rs_core::{HealthRecord, MemoryStorage, RecordStorage, StoreError};
use std::cell::Cell;
use std::rc::Rc;

/// Memory slot that counts how often it was written.
#[derive(Clone, Default)]
pub struct CountingStorage {
    inner: MemoryStorage,
    saves: Rc<Cell<usize>>,
}

impl CountingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            inner: MemoryStorage::with_raw(raw),
            saves: Rc::default(),
        }
    }

    pub fn saves(&self) -> usize {
        self.saves.get()
    }

    /// Records currently in the slot.
    pub fn persisted(&self) -> Vec<HealthRecord> {
        self.inner.load().ok().flatten().unwrap_or_default()
    }
}

impl RecordStorage for CountingStorage {
    fn load(&self) -> Result<Option<Vec<HealthRecord>>, StoreError> {
        self.inner.load()
    }

    fn save(&self, records: &[HealthRecord]) -> Result<(), StoreError> {
        self.saves.set(self.saves.get() + 1);
        self.inner.save(records)
    }
}

/// Slot whose reads and writes always fail.
#[derive(Clone, Copy, Default)]
pub struct FailingStorage;

impl RecordStorage for FailingStorage {
    fn load(&self) -> Result<Option<Vec<HealthRecord>>, StoreError> {
        Err(StoreError::Unavailable("load disabled".to_string()))
    }

    fn save(&self, _records: &[HealthRecord]) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("save disabled".to_string()))
    }
}
