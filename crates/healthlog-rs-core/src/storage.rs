//! Persistence slot implementations for the record collection.
//!
//! A slot holds the entire collection as one flat JSON array. It is read once
//! when a store opens and overwritten wholesale after every mutation.

use crate::error::StoreError;
use crate::model::HealthRecord;
use log::{debug, info};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Default slot name, matching the browser storage key of earlier exports.
pub const DEFAULT_SLOT: &str = "healthRecords";

/// Persistence capability injected into the record store.
pub trait RecordStorage {
    /// Load the persisted collection. `Ok(None)` means nothing was saved yet.
    fn load(&self) -> Result<Option<Vec<HealthRecord>>, StoreError>;

    /// Replace the persisted collection.
    fn save(&self, records: &[HealthRecord]) -> Result<(), StoreError>;
}

impl<T: RecordStorage + ?Sized> RecordStorage for Box<T> {
    fn load(&self) -> Result<Option<Vec<HealthRecord>>, StoreError> {
        (**self).load()
    }

    fn save(&self, records: &[HealthRecord]) -> Result<(), StoreError> {
        (**self).save(records)
    }
}

/// File-backed slot storing `<root>/<slot>.json`.
#[derive(Debug, Clone)]
pub struct FileSlotStorage {
    /// Directory holding slot files.
    root: PathBuf,
    /// Slot name, used as the file stem.
    slot: String,
}

impl FileSlotStorage {
    /// Create a slot under the given root. The directory is created on the
    /// first save, so reading from a missing root leaves the disk untouched.
    pub fn new(root: impl AsRef<Path>, slot: impl Into<String>) -> Result<Self, StoreError> {
        let slot = slot.into();
        validate_slot(&slot)?;
        let root = root.as_ref().to_path_buf();
        info!(
            "initialized file slot storage (root={}, slot={})",
            root.display(),
            slot
        );
        Ok(Self { root, slot })
    }

    /// Path to the slot file.
    pub fn slot_path(&self) -> PathBuf {
        self.root.join(format!("{}.json", self.slot))
    }

    /// Path to the temporary file used for atomic rewrites.
    fn temp_path(&self) -> PathBuf {
        self.root.join(format!("{}.json.tmp", self.slot))
    }
}

impl RecordStorage for FileSlotStorage {
    fn load(&self) -> Result<Option<Vec<HealthRecord>>, StoreError> {
        let path = self.slot_path();
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("slot file missing (path={})", path.display());
                return Ok(None);
            }
            Err(err) => return Err(StoreError::Io(err)),
        };
        let records: Vec<HealthRecord> = serde_json::from_str(&contents)?;
        debug!(
            "loaded slot (path={}, records={})",
            path.display(),
            records.len()
        );
        Ok(Some(records))
    }

    /// Rewrite the slot atomically through a temp file.
    fn save(&self, records: &[HealthRecord]) -> Result<(), StoreError> {
        let path = self.slot_path();
        let temp_path = self.temp_path();
        std::fs::create_dir_all(&self.root)?;
        {
            let mut file = OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(&temp_path)?;
            let payload = serde_json::to_string(records)?;
            file.write_all(payload.as_bytes())?;
            file.flush()?;
        }
        std::fs::rename(&temp_path, &path)?;
        debug!(
            "saved slot (path={}, records={})",
            path.display(),
            records.len()
        );
        Ok(())
    }
}

/// In-memory slot holding the serialized collection.
///
/// Clones share the same slot, so a test can keep a handle and inspect what a
/// store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot prefilled with raw contents, valid or not.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(raw.into()))),
        }
    }

    /// Raw slot contents, if anything was saved.
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl RecordStorage for MemoryStorage {
    fn load(&self) -> Result<Option<Vec<HealthRecord>>, StoreError> {
        let raw = self
            .slot
            .lock()
            .map_err(|err| StoreError::Unavailable(err.to_string()))?
            .clone();
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, records: &[HealthRecord]) -> Result<(), StoreError> {
        let payload = serde_json::to_string(records)?;
        let mut slot = self
            .slot
            .lock()
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        *slot = Some(payload);
        Ok(())
    }
}

/// Reject slot names that would escape the storage root.
fn validate_slot(slot: &str) -> Result<(), StoreError> {
    if slot.trim().is_empty()
        || slot.contains(['/', '\\'])
        || slot == "."
        || slot == ".."
    {
        return Err(StoreError::InvalidSlot(slot.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_SLOT, FileSlotStorage, MemoryStorage, RecordStorage};
    use crate::error::StoreError;
    use crate::model::{Category, HealthRecord, RecordId};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn record(id: &str, date: &str) -> HealthRecord {
        HealthRecord {
            id: RecordId::new(id),
            date: date.to_string(),
            category: Category::General,
            temperature: 36.8,
            blood_pressure: "118/79".to_string(),
            heart_rate: 64,
        }
    }

    #[test]
    fn missing_slot_loads_as_none() {
        let temp = tempdir().expect("tempdir");
        let storage = FileSlotStorage::new(temp.path(), DEFAULT_SLOT).expect("storage");
        assert!(storage.load().expect("load").is_none());
    }

    #[test]
    fn root_is_created_on_first_save() {
        let temp = tempdir().expect("tempdir");
        let root = temp.path().join("nested").join("data");
        let storage = FileSlotStorage::new(&root, DEFAULT_SLOT).expect("storage");

        assert!(storage.load().expect("load").is_none());
        assert!(!root.exists());

        storage.save(&[record("1", "2024-01-01")]).expect("save");
        assert!(root.join("healthRecords.json").exists());
    }

    #[test]
    fn save_overwrites_whole_slot() {
        let temp = tempdir().expect("tempdir");
        let storage = FileSlotStorage::new(temp.path(), DEFAULT_SLOT).expect("storage");
        storage
            .save(&[record("1", "2024-01-01"), record("2", "2024-01-02")])
            .expect("save");
        storage.save(&[record("3", "2024-01-03")]).expect("save");

        let loaded = storage.load().expect("load").expect("records");
        assert_eq!(loaded, vec![record("3", "2024-01-03")]);
        assert!(!temp.path().join("healthRecords.json.tmp").exists());
        assert!(temp.path().join("healthRecords.json").exists());
    }

    #[test]
    fn malformed_slot_is_an_error() {
        let temp = tempdir().expect("tempdir");
        std::fs::write(temp.path().join("healthRecords.json"), "{not json").expect("write");
        let storage = FileSlotStorage::new(temp.path(), DEFAULT_SLOT).expect("storage");
        assert!(matches!(storage.load(), Err(StoreError::Serde(_))));
    }

    #[test]
    fn rejects_slot_names_with_separators() {
        let temp = tempdir().expect("tempdir");
        for slot in ["", "../escape", "a/b", ".."] {
            let err = FileSlotStorage::new(temp.path(), slot).unwrap_err();
            assert!(matches!(err, StoreError::InvalidSlot(_)), "{slot}");
        }
    }

    #[test]
    fn memory_storage_clones_share_the_slot() {
        let storage = MemoryStorage::new();
        let handle = storage.clone();
        storage.save(&[record("1", "2024-01-01")]).expect("save");
        let loaded = handle.load().expect("load").expect("records");
        assert_eq!(loaded.len(), 1);
        assert!(handle.raw().expect("raw").contains("\"bloodPressure\""));
    }
}
