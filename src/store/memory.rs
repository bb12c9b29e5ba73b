//! Process-local store.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use super::{MonotonicClock, Page, PageRequest, RecordStore, StoreError, parse_id, summarize};
use crate::models::{NewRecord, RecordPayload, RecordSummary, StoredRecord};

/// Keeps records in a map for the lifetime of the process.
pub struct MemoryStore<T> {
    records: RwLock<HashMap<Uuid, StoredRecord<T>>>,
    clock: MonotonicClock,
}

impl<T> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            clock: MonotonicClock::new(),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<Uuid, StoredRecord<T>>> {
        self.records.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Uuid, StoredRecord<T>>> {
        self.records.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RecordPayload> RecordStore<T> for MemoryStore<T> {
    fn create(&self, record: NewRecord<T>) -> Result<StoredRecord<T>, StoreError> {
        let mut records = self.write();
        let stored = StoredRecord::assign(record, Uuid::new_v4(), self.clock.next());
        records.insert(stored.id, stored.clone());
        tracing::debug!(table = T::TABLE, id = %stored.id, "record created");
        Ok(stored)
    }

    fn get(&self, id: &str) -> Result<StoredRecord<T>, StoreError> {
        let uuid = parse_id(id)?;
        self.read()
            .get(&uuid)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn list(
        &self,
        language: Option<&str>,
        request: PageRequest,
    ) -> Result<Page<RecordSummary>, StoreError> {
        Ok(summarize(self.read().values(), language, request))
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        let uuid = parse_id(id)?;
        match self.write().remove(&uuid) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BackendName, ReviewResult};
    use std::collections::HashSet;
    use std::sync::Arc;

    fn new_review(language: &str, score: f64) -> NewRecord<ReviewResult> {
        NewRecord {
            code: "print('hi')".into(),
            language: language.into(),
            filename: None,
            doc_style: None,
            backend: BackendName::Gemini,
            payload: ReviewResult {
                summary: "ok".into(),
                quality_score: score,
                ..ReviewResult::default()
            },
        }
    }

    #[test]
    fn create_then_get() {
        let store = MemoryStore::new();
        let created = store.create(new_review("python", 8.5)).unwrap();
        let fetched = store.get(&created.id.to_string()).unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.payload.quality_score, 8.5);
    }

    #[test]
    fn ids_and_timestamps_are_unique() {
        let store = MemoryStore::new();
        let a = store.create(new_review("python", 1.0)).unwrap();
        let b = store.create(new_review("python", 2.0)).unwrap();
        assert_ne!(a.id, b.id);
        assert!(b.created_at > a.created_at);
    }

    #[test]
    fn concurrent_creates_get_distinct_ids_and_timestamps() {
        let store: Arc<dyn RecordStore<ReviewResult>> = Arc::new(MemoryStore::new());
        let created: Vec<StoredRecord<ReviewResult>> = std::thread::scope(|s| {
            let workers: Vec<_> = (0..8)
                .map(|_| {
                    let store = Arc::clone(&store);
                    s.spawn(move || {
                        (0..25)
                            .map(|_| store.create(new_review("python", 5.0)).unwrap())
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            workers
                .into_iter()
                .flat_map(|w| w.join().unwrap())
                .collect()
        });

        let ids: HashSet<_> = created.iter().map(|r| r.id).collect();
        let stamps: HashSet<_> = created.iter().map(|r| r.created_at).collect();
        assert_eq!(ids.len(), 200);
        assert_eq!(stamps.len(), 200);
        let page = store.list(None, PageRequest::new(1, 100).unwrap()).unwrap();
        assert_eq!(page.total, 200);
        assert_eq!(page.items.len(), 100);
    }

    #[test]
    fn list_is_newest_first_and_filtered() {
        let store = MemoryStore::new();
        let first = store.create(new_review("python", 1.0)).unwrap();
        store.create(new_review("rust", 2.0)).unwrap();
        let third = store.create(new_review("Python", 3.0)).unwrap();

        let page = store.list(Some("python"), PageRequest::default()).unwrap();
        assert_eq!(page.total, 2);
        let ids: Vec<_> = page.items.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![third.id, first.id]);

        let all = store.list(None, PageRequest::default()).unwrap();
        assert_eq!(all.total, 3);
        assert_eq!(all.items[0].quality_score, Some(3.0));
    }

    #[test]
    fn pages_cover_every_record_once() {
        let store = MemoryStore::new();
        for i in 0..23 {
            store.create(new_review("go", f64::from(i) / 3.0)).unwrap();
        }
        let mut seen = HashSet::new();
        let mut page_no = 1;
        loop {
            let page = store
                .list(None, PageRequest::new(page_no, 5).unwrap())
                .unwrap();
            assert_eq!(page.total, 23);
            assert_eq!(page.page_count, 5);
            if page.items.is_empty() {
                break;
            }
            for item in page.items {
                assert!(seen.insert(item.id));
            }
            page_no += 1;
        }
        assert_eq!(seen.len(), 23);
    }

    #[test]
    fn empty_store_lists_nothing() {
        let store: MemoryStore<ReviewResult> = MemoryStore::new();
        let page = store.list(None, PageRequest::new(4, 10).unwrap()).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
    }

    #[test]
    fn delete_removes_and_second_delete_fails() {
        let store = MemoryStore::new();
        let created = store.create(new_review("python", 5.0)).unwrap();
        let id = created.id.to_string();
        store.delete(&id).unwrap();
        assert!(matches!(store.get(&id), Err(StoreError::NotFound(_))));
        assert!(matches!(store.delete(&id), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let store: MemoryStore<ReviewResult> = MemoryStore::new();
        assert!(matches!(store.get(&Uuid::new_v4().to_string()), Err(StoreError::NotFound(_))));
        assert!(matches!(store.get("not-a-uuid"), Err(StoreError::NotFound(_))));
        assert!(matches!(store.delete("17"), Err(StoreError::NotFound(_))));
    }
}
