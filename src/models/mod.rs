//! Shared types used across all modules.
//!
//! This module defines the result schemas returned by backends, the
//! persisted record wrapper, and the backend catalog. Other modules import
//! from here rather than reaching into each other's internals.

pub mod documentation;
pub mod lenient;
pub mod record;
pub mod review;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use documentation::DocumentationResult;
pub use record::{NewRecord, RecordPayload, RecordSummary, StoredRecord};
pub use review::ReviewResult;

/// Supported language-model backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendName {
    #[default]
    Gemini,
    #[serde(rename = "openai")]
    OpenAI,
    Anthropic,
}

impl BackendName {
    /// Every backend, in catalog order.
    pub const ALL: [BackendName; 3] = [
        BackendName::Gemini,
        BackendName::OpenAI,
        BackendName::Anthropic,
    ];

    /// Canonical lowercase identifier.
    pub fn id(self) -> &'static str {
        match self {
            BackendName::Gemini => "gemini",
            BackendName::OpenAI => "openai",
            BackendName::Anthropic => "anthropic",
        }
    }

    /// Human-readable vendor name.
    pub fn display_name(self) -> &'static str {
        match self {
            BackendName::Gemini => "Google Gemini",
            BackendName::OpenAI => "OpenAI GPT",
            BackendName::Anthropic => "Anthropic Claude",
        }
    }

    /// Model families advertised for capability discovery.
    pub fn supported_models(self) -> &'static [&'static str] {
        match self {
            BackendName::Gemini => &["gemini-pro"],
            BackendName::OpenAI => &["gpt-4", "gpt-3.5-turbo"],
            BackendName::Anthropic => &["claude-3-sonnet", "claude-3-opus"],
        }
    }

    /// Model id used when the config does not name one.
    pub fn default_model(self) -> &'static str {
        match self {
            BackendName::Gemini => "gemini-pro",
            BackendName::OpenAI => "gpt-4",
            BackendName::Anthropic => "claude-3-sonnet-20240229",
        }
    }

    /// Provider-specific environment variable holding the API key.
    pub fn api_key_env_var(self) -> &'static str {
        match self {
            BackendName::Gemini => "GEMINI_API_KEY",
            BackendName::OpenAI => "OPENAI_API_KEY",
            BackendName::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

impl fmt::Display for BackendName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for BackendName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" => Ok(BackendName::Gemini),
            "openai" => Ok(BackendName::OpenAI),
            "anthropic" => Ok(BackendName::Anthropic),
            other => Err(format!(
                "unsupported provider: '{other}'. Supported: gemini, openai, anthropic"
            )),
        }
    }
}
