//! Filesystem-backed store.
//!
//! Stores each record as `<data_dir>/<table>/<id>.json`. Writes go to a
//! temporary file in the same directory and are renamed into place, so a
//! reader never observes a half-written record.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use uuid::Uuid;

use super::{MonotonicClock, Page, PageRequest, RecordStore, StoreError, parse_id, summarize};
use crate::models::{NewRecord, RecordPayload, RecordSummary, StoredRecord};

/// One JSON file per record.
pub struct FileStore<T> {
    dir: PathBuf,
    clock: MonotonicClock,
    /// Serializes writers so id assignment, clock and rename stay ordered.
    write_lock: Mutex<()>,
    _kind: PhantomData<fn() -> T>,
}

impl<T: RecordPayload> FileStore<T> {
    /// Open (creating if needed) the table directory for `T` under `data_dir`.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = data_dir.as_ref().join(T::TABLE);
        std::fs::create_dir_all(&dir).map_err(|e| io_error(&dir, e))?;

        let mut store = Self {
            dir,
            clock: MonotonicClock::new(),
            write_lock: Mutex::new(()),
            _kind: PhantomData,
        };
        let newest = store.load_all()?.iter().map(|r| r.created_at).max();
        store.clock = MonotonicClock::starting_after(newest);
        Ok(store)
    }

    /// Directory holding this table's records.
    pub fn path(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    /// Read every record in the table.
    ///
    /// Files that cannot be decoded are skipped with a warning rather than
    /// failing the whole listing.
    fn load_all(&self) -> Result<Vec<StoredRecord<T>>, StoreError> {
        let entries = std::fs::read_dir(&self.dir).map_err(|e| io_error(&self.dir, e))?;
        let mut records = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| io_error(&self.dir, e))?;
            let path = entry.path();
            if !path.extension().is_some_and(|e| e == "json") {
                continue;
            }
            match read_record::<T>(&path) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "skipping unreadable record"
                ),
            }
        }

        Ok(records)
    }
}

impl<T: RecordPayload> RecordStore<T> for FileStore<T> {
    fn create(&self, record: NewRecord<T>) -> Result<StoredRecord<T>, StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let stored = StoredRecord::assign(record, Uuid::new_v4(), self.clock.next());

        let path = self.record_path(stored.id);
        let tmp = self.dir.join(format!(".{}.json.tmp", stored.id));
        let content = serde_json::to_string_pretty(&stored)?;
        std::fs::write(&tmp, content).map_err(|e| io_error(&tmp, e))?;
        if let Err(e) = std::fs::rename(&tmp, &path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(io_error(&path, e));
        }

        tracing::debug!(table = T::TABLE, id = %stored.id, "record written");
        Ok(stored)
    }

    fn get(&self, id: &str) -> Result<StoredRecord<T>, StoreError> {
        let uuid = parse_id(id)?;
        let path = self.record_path(uuid);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(id.to_string()))
            }
            Err(e) => Err(io_error(&path, e)),
        }
    }

    fn list(
        &self,
        language: Option<&str>,
        request: PageRequest,
    ) -> Result<Page<RecordSummary>, StoreError> {
        let records = self.load_all()?;
        Ok(summarize(&records, language, request))
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        let uuid = parse_id(id)?;
        let path = self.record_path(uuid);
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(table = T::TABLE, %id, "record deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(id.to_string()))
            }
            Err(e) => Err(io_error(&path, e)),
        }
    }
}

fn read_record<T: RecordPayload>(path: &Path) -> Result<StoredRecord<T>, StoreError> {
    let content = std::fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    Ok(serde_json::from_str(&content)?)
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}
