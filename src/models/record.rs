//! Persisted record wrapper shared by both result kinds.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{BackendName, DocumentationResult, ReviewResult};
use crate::constants::{DOCUMENTATION_TABLE, REVIEWS_TABLE};

/// A normalized result kind that can be stored.
pub trait RecordPayload: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Logical table (and on-disk directory) holding this kind.
    const TABLE: &'static str;

    /// Headline score shown in list views, if the kind has one.
    fn quality_score(&self) -> Option<f64> {
        None
    }
}

impl RecordPayload for ReviewResult {
    const TABLE: &'static str = REVIEWS_TABLE;

    fn quality_score(&self) -> Option<f64> {
        Some(self.quality_score)
    }
}

impl RecordPayload for DocumentationResult {
    const TABLE: &'static str = DOCUMENTATION_TABLE;
}

/// Caller-supplied fields for a record that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewRecord<T> {
    pub code: String,
    pub language: String,
    pub filename: Option<String>,
    pub doc_style: Option<String>,
    pub backend: BackendName,
    pub payload: T,
}

/// One persisted analyze or document outcome.
///
/// `id` and `created_at` are assigned by the store and never change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord<T> {
    pub id: Uuid,
    pub code: String,
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_style: Option<String>,
    pub backend: BackendName,
    pub payload: T,
    pub created_at: DateTime<Utc>,
}

impl<T> StoredRecord<T> {
    /// Attach store-generated fields to a new record.
    pub fn assign(new: NewRecord<T>, id: Uuid, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            code: new.code,
            language: new.language,
            filename: new.filename,
            doc_style: new.doc_style,
            backend: new.backend,
            payload: new.payload,
            created_at,
        }
    }
}

impl<T: RecordPayload> StoredRecord<T> {
    /// Lightweight list view of this record.
    pub fn summary(&self) -> RecordSummary {
        RecordSummary {
            id: self.id,
            language: self.language.clone(),
            filename: self.filename.clone(),
            backend: self.backend,
            quality_score: self.payload.quality_score(),
            doc_style: self.doc_style.clone(),
            created_at: self.created_at,
        }
    }
}

/// List-view projection of a [`StoredRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSummary {
    pub id: Uuid,
    pub language: String,
    pub filename: Option<String>,
    pub backend: BackendName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_style: Option<String>,
    pub created_at: DateTime<Utc>,
}
