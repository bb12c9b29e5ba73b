//! JSON output renderer.
//!
//! Emits records exactly as stored, so the output can be piped into other
//! tools or re-read later.

use serde::Serialize;

use crate::models::{DocumentationResult, RecordSummary, ReviewResult, StoredRecord};
use crate::output::OutputRenderer;
use crate::providers::BackendInfo;
use crate::store::Page;

/// JSON output renderer.
pub struct JsonRenderer;

fn pretty<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

impl OutputRenderer for JsonRenderer {
    fn review(&self, record: &StoredRecord<ReviewResult>) -> String {
        pretty(record)
    }

    fn documentation(&self, record: &StoredRecord<DocumentationResult>) -> String {
        pretty(record)
    }

    fn records(&self, _kind: &str, page: &Page<RecordSummary>) -> String {
        pretty(page)
    }

    fn providers(&self, backends: &[BackendInfo]) -> String {
        pretty(&serde_json::json!({ "providers": backends }))
    }
}
