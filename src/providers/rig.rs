//! rig-core backed adapters, one type per backend.
//!
//! Each adapter owns a rig-core client built once from its credential and
//! builds a lightweight agent per call. Nothing is cached between calls.

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::{CompletionError, Prompt, PromptError};
use rig::providers;

use super::{ProviderAdapter, ProviderError, classify_error};
use crate::models::BackendName;

/// System preamble shared by every backend.
const SYSTEM_PREAMBLE: &str =
    "You are an expert software engineer. Always respond with valid JSON only.";

/// Per-call generation settings.
#[derive(Debug, Clone)]
pub struct CallSettings {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u64,
}

impl CallSettings {
    /// Settings for `backend` using `model`, or the backend's default model.
    pub fn for_backend(backend: BackendName, model: Option<&str>) -> Self {
        let model = model
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(backend.default_model())
            .to_string();
        // Gemini defaults to a low output limit that truncates long reviews.
        let max_tokens = match backend {
            BackendName::Gemini => 8192,
            BackendName::OpenAI | BackendName::Anthropic => 4096,
        };
        Self {
            model,
            temperature: 0.3,
            max_tokens,
        }
    }
}

/// Build a one-shot agent from a rig-core client and prompt it once.
macro_rules! prompt_once {
    ($client:expr, $settings:expr, $prompt:expr, $label:expr) => {{
        let agent = $client
            .agent($settings.model.as_str())
            .preamble(SYSTEM_PREAMBLE)
            .temperature($settings.temperature)
            .max_tokens($settings.max_tokens)
            .build();
        agent
            .prompt($prompt)
            .await
            .map_err(|e| classify_prompt_error($label, &e))
    }};
}

/// Sort a rig prompt failure into a network or backend failure.
///
/// Errors the backend itself reported are never treated as transport
/// failures, whatever their text says. Everything else, including HTTP
/// client errors, falls back to message inspection.
fn classify_prompt_error(label: &str, err: &PromptError) -> ProviderError {
    match err {
        PromptError::CompletionError(
            CompletionError::ProviderError(msg) | CompletionError::ResponseError(msg),
        ) => ProviderError::Backend(format!("{label} API error: {msg}")),
        PromptError::CompletionError(CompletionError::JsonError(e)) => {
            ProviderError::Backend(format!("{label} API error: malformed response: {e}"))
        }
        other => classify_error(label, &other.to_string()),
    }
}

/// Google Gemini.
pub struct GeminiAdapter {
    client: providers::gemini::Client,
    settings: CallSettings,
}

impl GeminiAdapter {
    pub fn new(api_key: &str, settings: CallSettings) -> Result<Self, ProviderError> {
        let client = providers::gemini::Client::new(api_key).map_err(|e| {
            ProviderError::Backend(format!("failed to create Gemini client: {e}"))
        })?;
        Ok(Self { client, settings })
    }
}

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
    fn backend(&self) -> BackendName {
        BackendName::Gemini
    }

    fn model(&self) -> &str {
        &self.settings.model
    }

    async fn invoke(&self, prompt: &str) -> Result<String, ProviderError> {
        tracing::debug!(model = %self.settings.model, "invoking Gemini");
        prompt_once!(self.client, self.settings, prompt, "Gemini")
    }
}

/// OpenAI chat completions, optionally against a compatible base URL.
pub struct OpenAiAdapter {
    client: providers::openai::CompletionsClient,
    settings: CallSettings,
}

impl OpenAiAdapter {
    pub fn new(
        api_key: &str,
        base_url: Option<&str>,
        settings: CallSettings,
    ) -> Result<Self, ProviderError> {
        let mut builder = providers::openai::CompletionsClient::builder().api_key(api_key);
        if let Some(base_url) = base_url {
            builder = builder.base_url(base_url);
        }
        let client: providers::openai::CompletionsClient = builder.build().map_err(|e| {
            ProviderError::Backend(format!("failed to create OpenAI client: {e}"))
        })?;
        Ok(Self { client, settings })
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiAdapter {
    fn backend(&self) -> BackendName {
        BackendName::OpenAI
    }

    fn model(&self) -> &str {
        &self.settings.model
    }

    async fn invoke(&self, prompt: &str) -> Result<String, ProviderError> {
        tracing::debug!(model = %self.settings.model, "invoking OpenAI");
        prompt_once!(self.client, self.settings, prompt, "OpenAI")
    }
}

/// Anthropic Claude.
pub struct AnthropicAdapter {
    client: providers::anthropic::Client,
    settings: CallSettings,
}

impl AnthropicAdapter {
    pub fn new(api_key: &str, settings: CallSettings) -> Result<Self, ProviderError> {
        let client: providers::anthropic::Client = providers::anthropic::Client::builder()
            .api_key(api_key)
            .build()
            .map_err(|e| {
                ProviderError::Backend(format!("failed to create Anthropic client: {e}"))
            })?;
        Ok(Self { client, settings })
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicAdapter {
    fn backend(&self) -> BackendName {
        BackendName::Anthropic
    }

    fn model(&self) -> &str {
        &self.settings.model
    }

    async fn invoke(&self, prompt: &str) -> Result<String, ProviderError> {
        tracing::debug!(model = %self.settings.model, "invoking Anthropic");
        prompt_once!(self.client, self.settings, prompt, "Anthropic")
    }
}
