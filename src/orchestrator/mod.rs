//! Request pipeline: resolve backend, build prompt, invoke, normalize, persist.
//!
//! Backend failures propagate as errors. Replies that cannot be parsed do
//! not; they are stored as fallback results.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::constants::DEFAULT_TIMEOUT_SECS;
use crate::models::{
    DocumentationResult, NewRecord, RecordPayload, RecordSummary, ReviewResult, StoredRecord,
};
use crate::normalize::{self, Schema};
use crate::prompt::{self, PromptRequest, Task};
use crate::providers::{BackendInfo, ProviderError, ProviderRegistry, invoke_with_timeout};
use crate::store::{Page, PageRequest, RecordStore, StoreError};

/// Errors from the orchestrator.
#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid request: {0}")]
    Validation(String),
}

impl OrchestratorError {
    /// HTTP-style status for the failure.
    ///
    /// 400 for caller mistakes, 404 for missing records, 500 for backend and
    /// storage failures.
    pub fn status_code(&self) -> u16 {
        match self {
            OrchestratorError::Validation(_) => 400,
            OrchestratorError::Provider(ProviderError::Unavailable { .. }) => 400,
            OrchestratorError::Provider(ProviderError::Network(_) | ProviderError::Backend(_)) => {
                500
            }
            OrchestratorError::Store(StoreError::InvalidPage(_)) => 400,
            OrchestratorError::Store(StoreError::NotFound(_)) => 404,
            OrchestratorError::Store(StoreError::Io { .. } | StoreError::Serialize(_)) => 500,
        }
    }
}

/// Input to [`Orchestrator::analyze`].
#[derive(Debug, Clone, Default)]
pub struct AnalyzeRequest {
    pub code: String,
    pub language: String,
    pub filename: Option<String>,
    /// Backend id; `None` selects the configured default.
    pub provider: Option<String>,
}

/// Input to [`Orchestrator::document`].
#[derive(Debug, Clone, Default)]
pub struct DocumentRequest {
    pub code: String,
    pub language: String,
    pub filename: Option<String>,
    /// Docstring style; `None` selects `google`.
    pub doc_style: Option<String>,
    pub provider: Option<String>,
}

/// Coordinates the registry, the prompt builder, the normalizer and the stores.
pub struct Orchestrator {
    registry: Arc<ProviderRegistry>,
    reviews: Arc<dyn RecordStore<ReviewResult>>,
    docs: Arc<dyn RecordStore<DocumentationResult>>,
    timeout: Duration,
}

impl Orchestrator {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        reviews: Arc<dyn RecordStore<ReviewResult>>,
        docs: Arc<dyn RecordStore<DocumentationResult>>,
    ) -> Self {
        Self {
            registry,
            reviews,
            docs,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Bound on each backend round trip.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Review code and store the result.
    pub async fn analyze(
        &self,
        request: AnalyzeRequest,
    ) -> Result<StoredRecord<ReviewResult>, OrchestratorError> {
        validate(&request.code, &request.language)?;
        let pending = Pending {
            code: request.code,
            language: request.language.trim().to_string(),
            filename: request.filename,
        };
        self.run(Task::Analyze, pending, request.provider.as_deref(), self.reviews.as_ref())
            .await
    }

    /// Document code and store the result.
    pub async fn document(
        &self,
        request: DocumentRequest,
    ) -> Result<StoredRecord<DocumentationResult>, OrchestratorError> {
        validate(&request.code, &request.language)?;
        let pending = Pending {
            code: request.code,
            language: request.language.trim().to_string(),
            filename: request.filename,
        };
        let task = Task::document(request.doc_style.as_deref());
        self.run(task, pending, request.provider.as_deref(), self.docs.as_ref())
            .await
    }

    async fn run<T: Schema + RecordPayload>(
        &self,
        task: Task,
        pending: Pending,
        provider: Option<&str>,
        store: &dyn RecordStore<T>,
    ) -> Result<StoredRecord<T>, OrchestratorError> {
        let adapter = self.registry.resolve(provider)?;
        let backend = adapter.backend();

        let doc_style = task.style().map(str::to_string);
        let prompt = prompt::build(&PromptRequest {
            task,
            code: &pending.code,
            language: &pending.language,
            filename: pending.filename.as_deref(),
        });
        tracing::debug!(
            %backend,
            model = adapter.model(),
            table = T::TABLE,
            prompt_len = prompt.len(),
            "invoking backend"
        );

        let raw = invoke_with_timeout(adapter.as_ref(), &prompt, self.timeout).await?;
        let payload: T = normalize::normalize(&raw);

        let record = store.create(NewRecord {
            code: pending.code,
            language: pending.language,
            filename: pending.filename,
            doc_style,
            backend,
            payload,
        })?;
        tracing::debug!(id = %record.id, table = T::TABLE, "result stored");
        Ok(record)
    }

    pub fn get_review(&self, id: &str) -> Result<StoredRecord<ReviewResult>, OrchestratorError> {
        Ok(self.reviews.get(id)?)
    }

    pub fn list_reviews(
        &self,
        language: Option<&str>,
        request: PageRequest,
    ) -> Result<Page<RecordSummary>, OrchestratorError> {
        Ok(self.reviews.list(language, request)?)
    }

    pub fn delete_review(&self, id: &str) -> Result<(), OrchestratorError> {
        Ok(self.reviews.delete(id)?)
    }

    pub fn get_documentation(
        &self,
        id: &str,
    ) -> Result<StoredRecord<DocumentationResult>, OrchestratorError> {
        Ok(self.docs.get(id)?)
    }

    pub fn list_documentation(
        &self,
        language: Option<&str>,
        request: PageRequest,
    ) -> Result<Page<RecordSummary>, OrchestratorError> {
        Ok(self.docs.list(language, request)?)
    }

    pub fn delete_documentation(&self, id: &str) -> Result<(), OrchestratorError> {
        Ok(self.docs.delete(id)?)
    }

    /// Configured backends and their capabilities.
    pub fn providers(&self) -> Vec<BackendInfo> {
        self.registry.list_available()
    }
}

/// Validated request fields awaiting a payload.
struct Pending {
    code: String,
    language: String,
    filename: Option<String>,
}

fn validate(code: &str, language: &str) -> Result<(), OrchestratorError> {
    if code.trim().is_empty() {
        return Err(OrchestratorError::Validation("code must not be empty".into()));
    }
    if language.trim().is_empty() {
        return Err(OrchestratorError::Validation(
            "language must not be empty".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BackendName;
    use crate::providers::ProviderAdapter;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns a canned reply and records the prompts it was sent.
    struct CannedAdapter {
        reply: String,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ProviderAdapter for CannedAdapter {
        fn backend(&self) -> BackendName {
            BackendName::OpenAI
        }

        fn model(&self) -> &str {
            "canned"
        }

        async fn invoke(&self, prompt: &str) -> Result<String, ProviderError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }
    }

    fn orchestrator(reply: &str) -> (Orchestrator, Arc<CannedAdapter>) {
        let adapter = Arc::new(CannedAdapter {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        });
        let registry = ProviderRegistry::with_adapters(
            BackendName::OpenAI,
            [adapter.clone() as Arc<dyn ProviderAdapter>],
        );
        let orch = Orchestrator::new(
            Arc::new(registry),
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
        );
        (orch, adapter)
    }

    #[tokio::test]
    async fn empty_code_is_rejected_before_invoking() {
        let (orch, adapter) = orchestrator("{}");
        let err = orch
            .analyze(AnalyzeRequest {
                code: "  \n".into(),
                language: "python".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, OrchestratorError::Validation(_)));
        assert_eq!(err.status_code(), 400);
        assert!(adapter.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_language_is_rejected() {
        let (orch, _) = orchestrator("{}");
        let err = orch
            .document(DocumentRequest {
                code: "x = 1".into(),
                language: "".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, OrchestratorError::Validation(_)));
    }

    #[tokio::test]
    async fn document_records_default_style() {
        let (orch, adapter) = orchestrator(r#"{"overview": "Adds numbers."}"#);
        let record = orch
            .document(DocumentRequest {
                code: "def add(a, b): return a + b".into(),
                language: "python".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(record.doc_style.as_deref(), Some("google"));
        assert_eq!(record.backend, BackendName::OpenAI);
        assert_eq!(record.payload.overview, "Adds numbers.");
        assert!(adapter.prompts.lock().unwrap()[0].contains("in google style"));
    }

    #[test]
    fn status_codes_follow_error_kind() {
        let cases = [
            (
                OrchestratorError::Provider(ProviderError::Unavailable {
                    name: "x".into(),
                    available: vec![],
                }),
                400,
            ),
            (OrchestratorError::Provider(ProviderError::Network("t".into())), 500),
            (OrchestratorError::Provider(ProviderError::Backend("q".into())), 500),
            (OrchestratorError::Store(StoreError::NotFound("id".into())), 404),
            (OrchestratorError::Store(StoreError::InvalidPage("p".into())), 400),
            (
                OrchestratorError::Store(StoreError::Io {
                    path: "/x".into(),
                    source: std::io::Error::other("disk"),
                }),
                500,
            ),
        ];
        for (err, code) in cases {
            assert_eq!(err.status_code(), code, "{err}");
        }
    }
}
