//! Persistence for normalized results.
//!
//! One logical table per result kind (`reviews`, `documentation`), each
//! behind the [`RecordStore`] contract. Records are created and deleted but
//! never updated. Listing is newest first with offset pagination.

pub mod file;
pub mod memory;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::config::{StoreBackend, StoreConfig};
use crate::models::{NewRecord, RecordPayload, RecordSummary, StoredRecord};

pub use file::FileStore;
pub use memory::MemoryStore;

/// Page size used when the caller does not choose one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Errors from the result store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),

    #[error("invalid page request: {0}")]
    InvalidPage(String),

    #[error("storage I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to encode or decode a record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A validated page selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// `page` is 1-based; `page_size` must be within `1..=100`.
    pub fn new(page: u32, page_size: u32) -> Result<Self, StoreError> {
        if page < 1 {
            return Err(StoreError::InvalidPage(format!(
                "page must be at least 1, got {page}"
            )));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(StoreError::InvalidPage(format!(
                "page size must be between 1 and {MAX_PAGE_SIZE}, got {page_size}"
            )));
        }
        Ok(Self { page, page_size })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of items skipped before this page.
    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.page_size as usize
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results plus the totals needed to navigate the rest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<S> {
    pub items: Vec<S>,
    pub page: u32,
    pub page_size: u32,
    /// Count of all matching records, independent of the page.
    pub total: usize,
    pub page_count: usize,
}

impl<S> Page<S> {
    /// Cut one page out of an already ordered, already filtered list.
    ///
    /// Pages past the end are empty but still report the real totals.
    pub fn slice(all: Vec<S>, request: PageRequest) -> Self {
        let total = all.len();
        let page_size = request.page_size as usize;
        let items = all
            .into_iter()
            .skip(request.offset())
            .take(page_size)
            .collect();
        Self {
            items,
            page: request.page,
            page_size: request.page_size,
            total,
            page_count: total.div_ceil(page_size),
        }
    }
}

/// Storage contract for one result kind.
///
/// Implementations synchronize internally; a single instance is shared
/// across concurrent requests.
pub trait RecordStore<T: RecordPayload>: Send + Sync {
    /// Persist a new record, assigning its id and creation time.
    fn create(&self, record: NewRecord<T>) -> Result<StoredRecord<T>, StoreError>;

    /// Fetch one record by id.
    fn get(&self, id: &str) -> Result<StoredRecord<T>, StoreError>;

    /// List summaries newest first, optionally filtered by language.
    fn list(
        &self,
        language: Option<&str>,
        request: PageRequest,
    ) -> Result<Page<RecordSummary>, StoreError>;

    /// Remove one record by id.
    fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// Open the configured store for result kind `T`.
pub fn open<T: RecordPayload>(
    config: &StoreConfig,
) -> Result<Arc<dyn RecordStore<T>>, StoreError> {
    match config.backend() {
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::<T>::new())),
        StoreBackend::File => {
            let store = FileStore::<T>::open(config.data_dir())?;
            Ok(Arc::new(store))
        }
    }
}

/// Parse a record id. Anything that is not a UUID cannot name a record.
pub(crate) fn parse_id(id: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(id.trim()).map_err(|_| StoreError::NotFound(id.to_string()))
}

/// Filter by language (case-insensitive), order newest first, and paginate.
pub(crate) fn summarize<'a, T, I>(
    records: I,
    language: Option<&str>,
    request: PageRequest,
) -> Page<RecordSummary>
where
    T: RecordPayload,
    I: IntoIterator<Item = &'a StoredRecord<T>>,
{
    let language = language.map(str::trim).filter(|l| !l.is_empty());
    let mut matching: Vec<RecordSummary> = records
        .into_iter()
        .filter(|r| language.is_none_or(|l| r.language.eq_ignore_ascii_case(l)))
        .map(StoredRecord::summary)
        .collect();
    matching.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
    Page::slice(matching, request)
}

/// Hands out strictly increasing UTC timestamps.
///
/// Two records created within the same clock tick still get distinct,
/// ordered `created_at` values.
#[derive(Debug, Default)]
pub struct MonotonicClock {
    last: Mutex<Option<DateTime<Utc>>>,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start after `floor`, e.g. the newest record already on disk.
    pub fn starting_after(floor: Option<DateTime<Utc>>) -> Self {
        Self {
            last: Mutex::new(floor),
        }
    }

    pub fn next(&self) -> DateTime<Utc> {
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        let now = Utc::now();
        let next = match *last {
            Some(prev) if now <= prev => prev + Duration::microseconds(1),
            _ => now,
        };
        *last = Some(next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_request_validation() {
        assert!(PageRequest::new(1, 1).is_ok());
        assert!(PageRequest::new(3, 100).is_ok());
        assert!(matches!(PageRequest::new(0, 10), Err(StoreError::InvalidPage(_))));
        assert!(matches!(PageRequest::new(1, 0), Err(StoreError::InvalidPage(_))));
        assert!(matches!(PageRequest::new(1, 101), Err(StoreError::InvalidPage(_))));
    }

    #[test]
    fn default_page_request() {
        let req = PageRequest::default();
        assert_eq!((req.page(), req.page_size()), (1, 10));
        assert_eq!(req.offset(), 0);
        assert_eq!(PageRequest::new(3, 20).unwrap().offset(), 40);
    }

    #[test]
    fn slice_sums_to_total_for_all_sizes() {
        for n in 0..=25usize {
            for size in [1u32, 2, 3, 7, 10, 25, 100] {
                let all: Vec<usize> = (0..n).collect();
                let expected_pages = n.div_ceil(size as usize);
                let mut seen = Vec::new();
                for page in 1..=(expected_pages as u32 + 1) {
                    let p = Page::slice(all.clone(), PageRequest::new(page, size).unwrap());
                    assert_eq!(p.total, n);
                    assert_eq!(p.page_count, expected_pages);
                    assert!(p.items.len() <= size as usize);
                    seen.extend(p.items);
                }
                assert_eq!(seen, all, "n={n} size={size}");
            }
        }
    }

    #[test]
    fn page_past_end_is_empty_with_totals() {
        let p = Page::slice(vec![1, 2, 3], PageRequest::new(5, 2).unwrap());
        assert!(p.items.is_empty());
        assert_eq!(p.total, 3);
        assert_eq!(p.page_count, 2);
        assert_eq!(p.page, 5);
    }

    #[test]
    fn empty_list_has_zero_pages() {
        let p: Page<u8> = Page::slice(Vec::new(), PageRequest::default());
        assert_eq!((p.total, p.page_count), (0, 0));
    }

    #[test]
    fn clock_is_strictly_increasing() {
        let clock = MonotonicClock::new();
        let mut prev = clock.next();
        for _ in 0..1000 {
            let next = clock.next();
            assert!(next > prev);
            prev = next;
        }
    }

    #[test]
    fn clock_starts_after_floor() {
        let future = Utc::now() + Duration::hours(1);
        let clock = MonotonicClock::starting_after(Some(future));
        assert!(clock.next() > future);
    }

    #[test]
    fn non_uuid_id_is_not_found() {
        assert!(matches!(parse_id("42"), Err(StoreError::NotFound(ref id)) if id == "42"));
        assert!(parse_id(&Uuid::new_v4().to_string()).is_ok());
    }
}
