//! Ordered record collection mirrored to a persistence slot.

use crate::error::StoreError;
use crate::ids::IdGenerator;
use crate::model::{HealthRecord, NewHealthRecord, RecordId};
use crate::storage::RecordStorage;
use log::{debug, info, warn};
use std::collections::HashSet;

/// Attempts at drawing an unused id before giving up.
const MAX_ID_ATTEMPTS: usize = 64;

/// In-memory record collection with injected persistence and id generation.
///
/// Every mutation persists the full collection, whether or not it changed
/// anything. The in-memory change is kept even when persisting fails.
#[derive(Debug)]
pub struct RecordStore<S, G> {
    storage: S,
    ids: G,
    records: Vec<HealthRecord>,
    /// Ids removed during this session.
    retired: HashSet<RecordId>,
}

impl<S: RecordStorage, G: IdGenerator> RecordStore<S, G> {
    /// Open a store, loading whatever the slot holds.
    ///
    /// A missing or unreadable slot starts an empty collection.
    pub fn open(storage: S, mut ids: G) -> Self {
        let loaded = match storage.load() {
            Ok(Some(records)) => records,
            Ok(None) => {
                debug!("no persisted records; starting empty");
                Vec::new()
            }
            Err(err) => {
                warn!("failed to load persisted records; starting empty: {err}");
                Vec::new()
            }
        };

        let mut seen = HashSet::new();
        let mut records = Vec::with_capacity(loaded.len());
        for record in loaded {
            if !seen.insert(record.id.clone()) {
                warn!("duplicate record id ignored on load (id={})", record.id);
                continue;
            }
            ids.observe(&record.id);
            records.push(record);
        }
        info!("record store opened (records={})", records.len());

        Self {
            storage,
            ids,
            records,
            retired: HashSet::new(),
        }
    }

    /// All records in insertion order.
    pub fn list(&self) -> &[HealthRecord] {
        &self.records
    }

    /// Record with the given id.
    pub fn get(&self, id: &RecordId) -> Option<&HealthRecord> {
        self.records.iter().find(|record| &record.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a validated record under a fresh id.
    pub fn add(&mut self, record: NewHealthRecord) -> Result<HealthRecord, StoreError> {
        let id = self.fresh_id()?;
        let stored = record.with_id(id);
        self.records.push(stored.clone());
        debug!("stored health record (id={})", stored.id);
        self.persist()?;
        Ok(stored)
    }

    /// Replace the record with the same id in place.
    ///
    /// Returns `false` when no record has that id.
    pub fn update(&mut self, record: HealthRecord) -> Result<bool, StoreError> {
        let replaced = match self.records.iter_mut().find(|slot| slot.id == record.id) {
            Some(slot) => {
                debug!("updated health record (id={})", record.id);
                *slot = record;
                true
            }
            None => {
                debug!("update ignored; record not found (id={})", record.id);
                false
            }
        };
        self.persist()?;
        Ok(replaced)
    }

    /// Remove the record with the given id.
    ///
    /// Returns `false` when no record has that id.
    pub fn delete(&mut self, id: &RecordId) -> Result<bool, StoreError> {
        let before = self.records.len();
        self.records.retain(|record| &record.id != id);
        let removed = self.records.len() != before;
        if removed {
            self.retired.insert(id.clone());
            debug!("deleted health record (id={id})");
        } else {
            debug!("delete ignored; record not found (id={id})");
        }
        self.persist()?;
        Ok(removed)
    }

    /// Write the full collection to the slot.
    fn persist(&self) -> Result<(), StoreError> {
        self.storage.save(&self.records).inspect_err(|err| {
            warn!(
                "failed to persist records (records={}): {err}",
                self.records.len()
            );
        })
    }

    fn fresh_id(&mut self) -> Result<RecordId, StoreError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.next_id();
            if self.retired.contains(&id) || self.get(&id).is_some() {
                debug!("id generator returned a used id; drawing again (id={id})");
                continue;
            }
            return Ok(id);
        }
        Err(StoreError::IdsExhausted(MAX_ID_ATTEMPTS))
    }
}
