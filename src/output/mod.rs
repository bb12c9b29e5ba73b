//! Output renderers: terminal and JSON.

pub mod json;
pub mod terminal;

use crate::models::{DocumentationResult, RecordSummary, ReviewResult, StoredRecord};
use crate::providers::BackendInfo;
use crate::store::Page;

/// Renders stored results, listings and the backend catalog.
pub trait OutputRenderer {
    fn review(&self, record: &StoredRecord<ReviewResult>) -> String;

    fn documentation(&self, record: &StoredRecord<DocumentationResult>) -> String;

    /// Render one page of a listing. `kind` names the table (e.g. "reviews").
    fn records(&self, kind: &str, page: &Page<RecordSummary>) -> String;

    fn providers(&self, backends: &[BackendInfo]) -> String;
}
